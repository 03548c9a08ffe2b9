use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::TableCache;
use crate::color::ColorMap;
use crate::config::Config;
use crate::data::aggregate::{top_journals, year_counts, YearCounts};
use crate::data::filter::{filtered_indices, DefaultJournals, FilterState, TableView};
use crate::data::model::DateRange;
use crate::data::LoadedTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Where the dashboard is in handling a control change.
///
/// Every change runs `Idle → Filtering → Rendered` synchronously, and the
/// frame that draws the result returns the state to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Filtering,
    Rendered,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Session cache of the cleaned table.
    pub cache: TableCache,

    /// Table currently on screen (None until a load succeeds).
    pub loaded: Option<Arc<LoadedTable>>,

    /// Load failure shown in place of the dashboard.
    pub load_error: Option<String>,

    /// Current date range and journal selection.
    pub filters: FilterState,

    /// Full date span of the table; the date pickers are clamped to it.
    pub date_bounds: Option<DateRange>,

    /// Distinct journals in first-seen order (multi-select options).
    pub journal_options: Vec<String>,

    /// Text typed into the journal search box.
    pub journal_search: String,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Per-year counts of the visible records.
    pub visible_years: YearCounts,

    /// Visible records per journal, shown beside the journal checkboxes.
    pub visible_journals: HashMap<String, usize>,

    /// Swatch colours matching the top-journals chart.
    pub color_map: ColorMap,

    /// Set when the file on disk changed after it was loaded.
    pub source_changed: bool,

    pub phase: ViewPhase,

    default_journals: DefaultJournals,
    default_journal_count: usize,
    top_n: usize,
}

impl AppState {
    pub fn new(cache: TableCache, config: &Config) -> Self {
        Self {
            cache,
            loaded: None,
            load_error: None,
            filters: FilterState::default(),
            date_bounds: None,
            journal_options: Vec::new(),
            journal_search: String::new(),
            visible_indices: Vec::new(),
            visible_years: YearCounts::default(),
            visible_journals: HashMap::new(),
            color_map: ColorMap::default(),
            source_changed: false,
            phase: ViewPhase::Idle,
            default_journals: config.default_journals,
            default_journal_count: config.default_journal_count,
            top_n: config.top_journals,
        }
    }

    /// Load the table on first use. Later calls reuse the cached table.
    pub fn ensure_loaded(&mut self) {
        if self.loaded.is_some() || self.load_error.is_some() {
            return;
        }
        let result = self.cache.get();
        self.apply_load(result);
    }

    /// Drop the cached table and read the file again.
    pub fn reload(&mut self) {
        let result = self.cache.reload();
        self.apply_load(result);
    }

    /// Switch to another metadata file.
    pub fn open_path(&mut self, path: PathBuf) {
        self.cache.set_path(path);
        let result = self.cache.get();
        self.apply_load(result);
    }

    fn apply_load(&mut self, result: Result<Arc<LoadedTable>, crate::data::DataUnavailable>) {
        self.source_changed = false;
        match result {
            Ok(loaded) => {
                log::info!(
                    "Dashboard showing {} records from {}",
                    loaded.table.len(),
                    self.cache.path().display()
                );
                self.set_table(loaded);
            }
            Err(e) => {
                log::error!("Failed to load metadata: {e}");
                self.loaded = None;
                self.load_error = Some(e.to_string());
                self.visible_indices.clear();
                self.visible_years = YearCounts::default();
                self.visible_journals.clear();
            }
        }
    }

    /// Ingest a newly loaded table, initialise filters and colours.
    pub fn set_table(&mut self, loaded: Arc<LoadedTable>) {
        let table = &loaded.table;
        self.filters = FilterState::initial(table, self.default_journals, self.default_journal_count);
        self.date_bounds = table.date_bounds();
        self.journal_options = table.journals();
        self.color_map = ColorMap::for_journals(&top_journals(table.iter(), self.top_n));
        self.journal_search.clear();

        self.loaded = Some(loaded);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute the visible records after a filter change.
    pub fn refilter(&mut self) {
        self.phase = ViewPhase::Filtering;
        if let Some(loaded) = &self.loaded {
            self.visible_indices = filtered_indices(&loaded.table, &self.filters);
            let view = TableView::borrowed(&loaded.table, &self.visible_indices);
            self.visible_years = year_counts(view.iter());
            self.visible_journals = view
                .journal_counts()
                .into_iter()
                .map(|(journal, n)| (journal.to_string(), n))
                .collect();
            log::debug!("Filter matched {} records", self.visible_indices.len());
        }
        self.phase = ViewPhase::Rendered;
    }

    /// Called once the frame showing the current result has been drawn.
    pub fn finish_frame(&mut self) {
        if self.phase == ViewPhase::Rendered {
            self.phase = ViewPhase::Idle;
        }
    }

    /// The filtered records, borrowing the cached indices.
    pub fn view(&self) -> Option<TableView<'_>> {
        self.loaded
            .as_ref()
            .map(|l| TableView::borrowed(&l.table, &self.visible_indices))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_indices.len()
    }

    fn clamp(&self, date: NaiveDate) -> NaiveDate {
        match self.date_bounds {
            Some(b) => date.clamp(b.start, b.end),
            None => date,
        }
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        let date = self.clamp(date);
        if let Some(range) = &mut self.filters.date_range {
            range.start = date;
        }
        self.refilter();
    }

    pub fn set_end_date(&mut self, date: NaiveDate) {
        let date = self.clamp(date);
        if let Some(range) = &mut self.filters.date_range {
            range.end = date;
        }
        self.refilter();
    }

    /// Toggle a single journal in the selection.
    pub fn toggle_journal(&mut self, journal: &str) {
        if !self.filters.journals.remove(journal) {
            self.filters.journals.insert(journal.to_string());
        }
        self.refilter();
    }

    /// Select every journal (or every one matching the search box).
    pub fn select_all_journals(&mut self) {
        let matching: Vec<String> = self.matching_journals().cloned().collect();
        self.filters.journals.extend(matching);
        self.refilter();
    }

    /// Deselect every journal (or every one matching the search box).
    pub fn select_no_journals(&mut self) {
        let matching: Vec<String> = self.matching_journals().cloned().collect();
        for j in &matching {
            self.filters.journals.remove(j);
        }
        self.refilter();
    }

    /// Journal options filtered by the search box, case-insensitive.
    pub fn matching_journals(&self) -> impl Iterator<Item = &String> + '_ {
        let needle = self.journal_search.to_lowercase();
        self.journal_options
            .iter()
            .filter(move |j| needle.is_empty() || j.to_lowercase().contains(&needle))
    }

    /// Record whether the source file changed since it was loaded.
    pub fn check_source(&mut self) {
        self.source_changed = self.cache.is_stale();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "title,abstract,journal,publish_time\n\
        P1,a,A,2020-01-01\n\
        P2,b,B,2020-06-15\n\
        P3,c,A,2021-03-01\n\
        P4,d,C,\n\
        P5,e,D,2020-02-02\n\
        P6,f,E,2020-02-03\n\
        P7,g,F,2020-02-04\n";

    fn state_with(csv: &str) -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, csv).unwrap();
        let config = Config {
            metadata_path: path.clone(),
            ..Config::default()
        };
        let mut state = AppState::new(TableCache::new(path), &config);
        state.ensure_loaded();
        (dir, state)
    }

    #[test]
    fn defaults_to_first_five_journals_and_full_range() {
        let (_dir, state) = state_with(CSV);
        assert!(state.load_error.is_none());
        assert_eq!(state.filters.journals.len(), 5);
        assert!(!state.filters.journals.contains("F"));
        assert_eq!(state.filters.date_range, state.date_bounds);
        // Every record except the one in journal F.
        assert_eq!(state.visible_count(), 6);
        assert_eq!(state.phase, ViewPhase::Rendered);
    }

    #[test]
    fn phase_returns_to_idle_after_frame() {
        let (_dir, mut state) = state_with(CSV);
        state.toggle_journal("A");
        assert_eq!(state.phase, ViewPhase::Rendered);
        state.finish_frame();
        assert_eq!(state.phase, ViewPhase::Idle);
    }

    #[test]
    fn journal_counts_follow_the_filter() {
        let (_dir, mut state) = state_with(CSV);
        assert_eq!(state.visible_journals.get("A"), Some(&2));
        assert_eq!(state.visible_journals.get("F"), None);

        state.toggle_journal("A");
        assert_eq!(state.visible_journals.get("A"), None);
        assert_eq!(state.visible_journals.values().sum::<usize>(), state.visible_count());

        state.select_no_journals();
        assert!(state.visible_journals.is_empty());
    }

    #[test]
    fn view_reads_the_cached_indices() {
        let (_dir, state) = state_with(CSV);
        let view = state.view().unwrap();
        assert_eq!(view.len(), state.visible_indices.len());
        let titles: Vec<&str> = view.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["P1", "P2", "P3", "P4", "P5", "P6"]);
    }

    #[test]
    fn toggling_journal_refilters() {
        let (_dir, mut state) = state_with(CSV);
        state.toggle_journal("A");
        assert_eq!(state.visible_count(), 4);
        state.toggle_journal("A");
        assert_eq!(state.visible_count(), 6);
    }

    #[test]
    fn start_after_end_shows_nothing() {
        let (_dir, mut state) = state_with(CSV);
        state.set_start_date(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        state.set_end_date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(state.visible_count(), 0);
        assert!(state.view().unwrap().is_empty());
        assert_eq!(state.visible_years.dated(), 0);
    }

    #[test]
    fn dates_are_clamped_to_table_bounds() {
        let (_dir, mut state) = state_with(CSV);
        state.set_start_date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        let bounds = state.date_bounds.unwrap();
        assert_eq!(state.filters.date_range.unwrap().start, bounds.start);
    }

    #[test]
    fn select_none_then_all_with_search() {
        let (_dir, mut state) = state_with(CSV);
        state.select_no_journals();
        assert_eq!(state.visible_count(), 0);

        state.journal_search = "a".into();
        state.select_all_journals();
        assert_eq!(state.filters.journals.len(), 1);
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn load_failure_is_kept_as_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let mut state = AppState::new(TableCache::new(&path), &Config::default());
        state.ensure_loaded();
        assert!(state.loaded.is_none());
        assert!(state.load_error.as_deref().unwrap().contains("not found"));
        assert_eq!(state.visible_count(), 0);
    }

    #[test]
    fn filtering_does_not_touch_cached_table() {
        let (_dir, mut state) = state_with(CSV);
        let before = state.loaded.as_ref().unwrap().table.clone();
        state.select_no_journals();
        state.select_all_journals();
        let cached = state.cache.get().unwrap();
        assert_eq!(cached.table, before);
        assert!(Arc::ptr_eq(&cached, state.loaded.as_ref().unwrap()));
    }
}
