//! Presentation strategies over the shared load → clean → aggregate pipeline.

mod batch;
mod report;

pub use batch::BatchPresenter;
pub use report::format_report;

use anyhow::Result;

use crate::cache::TableCache;
use crate::config::Config;

/// One way of showing the cleaned metadata.
///
/// Each strategy owns how a failed initial load is surfaced: the batch
/// presenter aborts, the dashboard keeps running and shows the error.
pub trait Presenter {
    fn present(self, cache: TableCache, config: &Config) -> Result<()>;
}

/// Build the session cache for the configured file and hand it to `presenter`.
pub fn run<P: Presenter>(presenter: P, config: &Config) -> Result<()> {
    let cache = TableCache::new(&config.metadata_path);
    presenter.present(cache, config)
}
