use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Placeholder stored in place of a missing abstract.
pub const ABSTRACT_PLACEHOLDER: &str = "No Abstract Provided";

/// Placeholder stored in place of a missing journal.
pub const JOURNAL_PLACEHOLDER: &str = "Unknown";

/// Columns every metadata file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "abstract", "journal", "publish_time"];

// ---------------------------------------------------------------------------
// PublishDate – a parsed publication date or the explicit unknown marker
// ---------------------------------------------------------------------------

/// Publication date of a record.
///
/// `Unknown` sorts before every known date so that tables ordered by date
/// group the undated rows together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PublishDate {
    Unknown,
    Known(NaiveDate),
}

impl PublishDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            PublishDate::Known(d) => Some(*d),
            PublishDate::Unknown => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.date().map(|d| d.year())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, PublishDate::Known(_))
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishDate::Known(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PublishDate::Unknown => write!(f, "<unknown date>"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawRecord / RawTable – rows as read from disk, before cleaning
// ---------------------------------------------------------------------------

/// One source row before cleaning. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub publish_time: Option<String>,
    /// Every other column of the source row.
    pub extra: BTreeMap<String, String>,
}

/// The rows of a metadata file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
    /// Non-required column names in source order.
    pub extra_columns: Vec<String>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Missing-value count per column: required columns first, then extras.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        let mut out = vec![
            ("title".to_string(), self.count_where(|r| r.title.is_none())),
            ("abstract".to_string(), self.count_where(|r| r.abstract_text.is_none())),
            ("journal".to_string(), self.count_where(|r| r.journal.is_none())),
            ("publish_time".to_string(), self.count_where(|r| r.publish_time.is_none())),
        ];
        for col in &self.extra_columns {
            out.push((col.clone(), self.count_where(|r| !r.extra.contains_key(col))));
        }
        out
    }

    fn count_where(&self, pred: impl Fn(&RawRecord) -> bool) -> usize {
        self.records.iter().filter(|r| pred(r)).count()
    }
}

// ---------------------------------------------------------------------------
// Record / Table – the cleaned dataset
// ---------------------------------------------------------------------------

/// One cleaned paper.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub title: String,
    pub abstract_text: String,
    pub journal: String,
    pub publish_time: PublishDate,
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Character length of the abstract, sentinel text included.
    pub fn abstract_length(&self) -> usize {
        self.abstract_text.chars().count()
    }

    /// Express the record as a raw row again, e.g. to feed it back through cleaning.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            title: Some(self.title.clone()),
            abstract_text: Some(self.abstract_text.clone()),
            journal: Some(self.journal.clone()),
            publish_time: self.publish_time.date().map(|d| d.format("%Y-%m-%d").to_string()),
            extra: self.extra.clone(),
        }
    }
}

/// Inclusive range of publication dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// A range whose start lies after its end matches nothing.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// The cleaned dataset. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<Record>,
    pub extra_columns: Vec<String>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Earliest and latest known publication dates.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let mut dates = self.records.iter().filter_map(|r| r.publish_time.date());
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateRange { start, end })
    }

    /// Distinct journals in first-encountered order.
    pub fn journals(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.journal.as_str()))
            .map(|r| r.journal.clone())
            .collect()
    }

    pub fn to_raw(&self) -> RawTable {
        RawTable {
            records: self.records.iter().map(Record::to_raw).collect(),
            extra_columns: self.extra_columns.clone(),
        }
    }
}
