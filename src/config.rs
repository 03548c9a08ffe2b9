use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::{HISTOGRAM_BINS, TOP_JOURNALS};
use crate::data::filter::DefaultJournals;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "cord-explorer.json";

/// File names of the three batch charts.
pub const PUBLICATION_TREND_PNG: &str = "publication_trend.png";
pub const TOP_JOURNALS_PNG: &str = "top_journals.png";
pub const ABSTRACT_LENGTH_PNG: &str = "abstract_length.png";

/// Settings shared by the batch and interactive presenters.
///
/// Every field has a default, so the settings file may set any subset:
///
/// ```json
/// { "metadata_path": "data/metadata.csv", "default_journals": "most_frequent" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Metadata file to load.
    pub metadata_path: PathBuf,
    /// Directory the batch charts are written to and read back from.
    pub chart_dir: PathBuf,
    pub top_journals: usize,
    pub histogram_bins: usize,
    /// Journals selected when the dashboard opens.
    pub default_journal_count: usize,
    pub default_journals: DefaultJournals,
    /// Rows shown in the terminal preview of the batch report.
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("metadata.csv"),
            chart_dir: PathBuf::from("."),
            top_journals: TOP_JOURNALS,
            histogram_bins: HISTOGRAM_BINS,
            default_journal_count: 5,
            default_journals: DefaultJournals::FirstSeen,
            preview_rows: 5,
        }
    }
}

impl Config {
    /// Read [`CONFIG_FILE`] from the working directory, or use defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Read settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn publication_trend_path(&self) -> PathBuf {
        self.chart_dir.join(PUBLICATION_TREND_PNG)
    }

    pub fn top_journals_path(&self) -> PathBuf {
        self.chart_dir.join(TOP_JOURNALS_PNG)
    }

    pub fn abstract_length_path(&self) -> PathBuf {
        self.chart_dir.join(ABSTRACT_LENGTH_PNG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.metadata_path, PathBuf::from("metadata.csv"));
        assert_eq!(config.top_journals, 10);
        assert_eq!(config.histogram_bins, 50);
        assert_eq!(config.default_journals, DefaultJournals::FirstSeen);
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "chart_dir": "out", "default_journals": "most_frequent" }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.top_journals_path(), PathBuf::from("out").join(TOP_JOURNALS_PNG));
        assert_eq!(config.default_journals, DefaultJournals::MostFrequent);
        assert_eq!(config.default_journal_count, 5);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "metadata": "x.csv" }"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
