use anyhow::{Context, Result};

use super::report::format_report;
use super::Presenter;
use crate::cache::TableCache;
use crate::charts;
use crate::config::Config;
use crate::data::aggregate::Aggregates;

/// Render the three charts for the full cleaned table, then stop.
#[derive(Debug, Default)]
pub struct BatchPresenter {
    /// Print the exploration report to stdout before rendering.
    pub print_report: bool,
}

impl BatchPresenter {
    pub fn new() -> Self {
        Self { print_report: true }
    }
}

impl Presenter for BatchPresenter {
    fn present(self, mut cache: TableCache, config: &Config) -> Result<()> {
        let loaded = cache
            .get()
            .with_context(|| format!("loading {}", cache.path().display()))?;

        let aggregates = Aggregates::compute(loaded.table.iter(), config.top_journals);
        log::info!(
            "{} records: {} dated across {} years, {} undated, {} journals in top list",
            loaded.table.len(),
            aggregates.years.dated(),
            aggregates.years.by_year.len(),
            aggregates.years.unknown,
            aggregates.top_journals.len()
        );

        if self.print_report {
            println!("{}", format_report(&loaded, &aggregates, config.preview_rows));
        }

        std::fs::create_dir_all(&config.chart_dir)
            .with_context(|| format!("creating {}", config.chart_dir.display()))?;

        charts::render_publication_trend(&config.publication_trend_path(), &aggregates.years)?;
        charts::render_top_journals(&config.top_journals_path(), &aggregates.top_journals)?;
        charts::render_abstract_lengths(
            &config.abstract_length_path(),
            &aggregates.abstract_lengths,
            config.histogram_bins,
        )?;

        Ok(())
    }
}
