/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  dates, placeholders, drop untitled → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + journals → TableView (indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  years, top journals, abstract lengths
///   └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

use std::path::Path;

pub use clean::{CleaningSummary, Cleaned};
pub use error::DataUnavailable;
pub use model::{RawTable, Record, Table};

/// Read and clean a metadata file in one step.
///
/// Also hands back the raw table's missing-value counts, since those are
/// gone once the placeholders are in.
pub fn load_table(path: &Path) -> Result<LoadedTable, DataUnavailable> {
    let raw = loader::load_file(path)?;
    let missing = raw.missing_counts();
    let Cleaned { table, summary } = clean::clean(raw);
    Ok(LoadedTable {
        table,
        summary,
        missing,
    })
}

/// Output of [`load_table`].
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub summary: CleaningSummary,
    /// Per-column missing counts before cleaning.
    pub missing: Vec<(String, usize)>,
}
