use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use super::model::{DateRange, Record, Table};

// ---------------------------------------------------------------------------
// Filter predicate: date range + selected journals
// ---------------------------------------------------------------------------

/// How the initial journal selection is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultJournals {
    /// The first distinct journals in file order.
    #[default]
    FirstSeen,
    /// The journals with the most records, ties in file order.
    MostFrequent,
}

/// User selection narrowing a [`Table`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// `None` when the table holds no known dates; the date filter is then inactive.
    pub date_range: Option<DateRange>,
    pub journals: BTreeSet<String>,
}

impl FilterState {
    /// Select the full date span and every journal.
    pub fn select_everything(table: &Table) -> Self {
        Self {
            date_range: table.date_bounds(),
            journals: table.iter().map(|r| r.journal.clone()).collect(),
        }
    }

    /// Full date span and `count` journals chosen by `rule`.
    pub fn initial(table: &Table, rule: DefaultJournals, count: usize) -> Self {
        let journals = match rule {
            DefaultJournals::FirstSeen => table.journals().into_iter().take(count).collect(),
            DefaultJournals::MostFrequent => super::aggregate::top_journals(table.iter(), count)
                .into_iter()
                .map(|(journal, _)| journal)
                .collect(),
        };
        Self {
            date_range: table.date_bounds(),
            journals,
        }
    }

    /// Whether a record passes.
    ///
    /// * the journal must be selected
    /// * a known date must fall inside the inclusive range
    /// * an unknown date passes unless the range itself is empty
    pub fn matches(&self, record: &Record) -> bool {
        if !self.journals.contains(&record.journal) {
            return false;
        }
        match self.date_range {
            None => true,
            Some(range) if range.is_empty() => false,
            Some(range) => record.publish_time.date().map_or(true, |d| range.contains(d)),
        }
    }
}

/// Return indices of records that pass the filter.
pub fn filtered_indices(table: &Table, filter: &FilterState) -> Vec<usize> {
    if filter.journals.is_empty() || filter.date_range.is_some_and(|r| r.is_empty()) {
        return Vec::new();
    }
    table
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// TableView – a filtered, borrowed subset
// ---------------------------------------------------------------------------

/// A subset of a table selected by index. The table itself is never touched.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a Table,
    indices: Cow<'a, [usize]>,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a Table, filter: &FilterState) -> Self {
        Self {
            table,
            indices: Cow::Owned(filtered_indices(table, filter)),
        }
    }

    /// View over indices computed elsewhere, without copying them.
    pub fn borrowed(table: &'a Table, indices: &'a [usize]) -> Self {
        Self {
            table,
            indices: Cow::Borrowed(indices),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&'a Record> {
        let table = self.table;
        self.indices.get(row).map(|&i| &table.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + Clone + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }

    pub fn extra_columns(&self) -> &'a [String] {
        &self.table.extra_columns
    }

    /// Record counts per journal in the view.
    pub fn journal_counts(&self) -> HashMap<&'a str, usize> {
        let mut counts = HashMap::new();
        for r in self.iter() {
            *counts.entry(r.journal.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
