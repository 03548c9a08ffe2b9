use chrono::NaiveDate;

use super::model::{
    PublishDate, RawRecord, RawTable, Record, Table, ABSTRACT_PLACEHOLDER, JOURNAL_PLACEHOLDER,
};

/// What cleaning did to a raw table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningSummary {
    pub raw_rows: usize,
    pub dropped_missing_title: usize,
    pub filled_abstracts: usize,
    pub filled_journals: usize,
    pub unknown_dates: usize,
}

impl CleaningSummary {
    pub fn kept_rows(&self) -> usize {
        self.raw_rows - self.dropped_missing_title
    }
}

/// A cleaned table together with the summary of how it was produced.
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub table: Table,
    pub summary: CleaningSummary,
}

/// Turn raw rows into [`Record`]s.
///
/// Steps, in order:
/// 1. parse `publish_time`, coercing failures to [`PublishDate::Unknown`]
/// 2. fill a missing abstract with [`ABSTRACT_PLACEHOLDER`]
/// 3. drop rows without a title
/// 4. fill a missing journal with [`JOURNAL_PLACEHOLDER`]
///
/// Placeholders are ordinary values on a second pass, so cleaning a table
/// that was already cleaned returns it unchanged.
pub fn clean(raw: RawTable) -> Cleaned {
    let mut summary = CleaningSummary {
        raw_rows: raw.len(),
        ..Default::default()
    };

    let records: Vec<Record> = raw
        .records
        .into_iter()
        .filter_map(|row| clean_record(row, &mut summary))
        .collect();

    log::info!(
        "Cleaned {} rows: {} dropped without title, {} abstracts and {} journals filled, {} unknown dates",
        summary.raw_rows,
        summary.dropped_missing_title,
        summary.filled_abstracts,
        summary.filled_journals,
        summary.unknown_dates
    );

    Cleaned {
        table: Table {
            records,
            extra_columns: raw.extra_columns,
        },
        summary,
    }
}

fn clean_record(row: RawRecord, summary: &mut CleaningSummary) -> Option<Record> {
    let RawRecord {
        title,
        abstract_text,
        journal,
        publish_time,
        extra,
    } = row;
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (title, abstract_text, journal) = (present(title), present(abstract_text), present(journal));

    let publish_time = publish_time
        .as_deref()
        .map_or(PublishDate::Unknown, parse_publish_time);

    let abstract_text = abstract_text.unwrap_or_else(|| {
        summary.filled_abstracts += 1;
        ABSTRACT_PLACEHOLDER.to_string()
    });

    let Some(title) = title else {
        summary.dropped_missing_title += 1;
        return None;
    };

    let journal = journal.unwrap_or_else(|| {
        summary.filled_journals += 1;
        JOURNAL_PLACEHOLDER.to_string()
    });

    if !publish_time.is_known() {
        summary.unknown_dates += 1;
    }

    Some(Record {
        title,
        abstract_text,
        journal,
        publish_time,
        extra,
    })
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const FULL_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y %b %d", "%m/%d/%Y", "%d %b %Y"];

/// Parse a publication date the way the CORD-19 metadata writes them.
///
/// Partial dates (`2020`, `2020-03`, `2020 Mar`) resolve to the first day
/// of the period. Datetimes keep only their date part. Anything else is
/// [`PublishDate::Unknown`].
pub fn parse_publish_time(text: &str) -> PublishDate {
    let text = text.trim();
    if text.is_empty() {
        return PublishDate::Unknown;
    }

    // Datetimes: "2020-03-01T00:00:00Z", "2020-03-01 12:00:00".
    let date_part = match text.find(['T', ' ']) {
        Some(pos) if pos == 10 && text.as_bytes()[4] == b'-' => &text[..pos],
        _ => text,
    };

    for fmt in FULL_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return PublishDate::Known(d);
        }
    }

    // Month precision.
    for (day, fmt) in [("-01", "%Y-%m-%d"), (" 01", "%Y %b %d")] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{date_part}{day}"), fmt) {
            return PublishDate::Known(d);
        }
    }

    // Year precision.
    if date_part.len() == 4 && date_part.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(d) = date_part
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        {
            return PublishDate::Known(d);
        }
    }

    log::debug!("Unparseable publish_time {text:?}");
    PublishDate::Unknown
}
