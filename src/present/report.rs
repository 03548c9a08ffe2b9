use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, Table};

use crate::data::aggregate::{Aggregates, LengthSummary};
use crate::data::LoadedTable;

/// Longest title shown in the preview before it is cut.
const TITLE_WIDTH: usize = 60;

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn cut(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width - 1).collect();
        format!("{head}…")
    }
}

/// Terminal report printed by the batch presenter before charts are drawn:
/// a preview of the first rows, missing values per source column, what
/// cleaning changed, and abstract-length statistics.
pub fn format_report(loaded: &LoadedTable, aggregates: &Aggregates, preview_rows: usize) -> String {
    let mut out = String::new();

    // Preview
    let mut preview = new_table();
    preview.set_header(header(&["#", "title", "journal", "publish_time", "abstract length"]));
    for (i, r) in loaded.table.iter().take(preview_rows).enumerate() {
        preview.add_row(vec![
            Cell::new(i),
            Cell::new(cut(&r.title, TITLE_WIDTH)),
            Cell::new(cut(&r.journal, 30)),
            Cell::new(r.publish_time),
            Cell::new(r.abstract_length()),
        ]);
    }
    let shown = loaded.table.len().min(preview_rows);
    out.push_str(&format!("\nFirst {shown} records:\n{preview}\n"));

    // Missing values
    let raw_rows = loaded.summary.raw_rows;
    let mut missing = new_table();
    missing.set_header(header(&["column", "missing", "%"]));
    for (column, count) in &loaded.missing {
        missing.add_row(vec![
            Cell::new(column),
            Cell::new(count),
            Cell::new(format!("{:.1}", pct(*count, raw_rows))),
        ]);
    }
    out.push_str(&format!("\nMissing values per column (before cleaning):\n{missing}\n"));

    // Cleaning
    let s = &loaded.summary;
    let mut cleaning = new_table();
    cleaning.set_header(header(&["Cleaning", "rows"]));
    cleaning.add_row(vec![Cell::new("Rows read"), Cell::new(s.raw_rows)]);
    cleaning.add_row(vec![
        Cell::new("Dropped (no title)"),
        Cell::new(s.dropped_missing_title),
    ]);
    cleaning.add_row(vec![
        Cell::new("Abstracts filled"),
        Cell::new(s.filled_abstracts),
    ]);
    cleaning.add_row(vec![Cell::new("Journals filled"), Cell::new(s.filled_journals)]);
    cleaning.add_row(vec![Cell::new("Unknown dates"), Cell::new(s.unknown_dates)]);
    cleaning.add_row(vec![
        Cell::new("Rows kept").fg(Color::Green),
        Cell::new(s.kept_rows()).fg(Color::Green),
    ]);
    out.push_str(&format!("\n{cleaning}\n"));

    // Abstract lengths
    if let Some(LengthSummary {
        count,
        min,
        max,
        mean,
        median,
    }) = aggregates.length_summary()
    {
        let mut lengths = new_table();
        lengths.set_header(header(&["abstract length", "value"]));
        lengths.add_row(vec![Cell::new("count"), Cell::new(count)]);
        lengths.add_row(vec![Cell::new("min"), Cell::new(min)]);
        lengths.add_row(vec![Cell::new("mean"), Cell::new(format!("{mean:.1}"))]);
        lengths.add_row(vec![Cell::new("median"), Cell::new(format!("{median:.1}"))]);
        lengths.add_row(vec![Cell::new("max"), Cell::new(max)]);
        out.push_str(&format!("\n{lengths}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::model::{RawRecord, RawTable};

    fn loaded() -> LoadedTable {
        let raw = RawTable {
            records: vec![
                RawRecord {
                    title: Some("A study".into()),
                    abstract_text: None,
                    journal: Some("Lancet".into()),
                    publish_time: Some("2020-04-01".into()),
                    ..Default::default()
                },
                RawRecord::default(),
            ],
            extra_columns: Vec::new(),
        };
        let missing = raw.missing_counts();
        let cleaned = clean(raw);
        LoadedTable {
            table: cleaned.table,
            summary: cleaned.summary,
            missing,
        }
    }

    #[test]
    fn report_mentions_every_section() {
        let loaded = loaded();
        let agg = Aggregates::compute(loaded.table.iter(), 10);
        let text = format_report(&loaded, &agg, 5);
        assert!(text.contains("A study"));
        assert!(text.contains("2020-04-01"));
        assert!(text.contains("publish_time"));
        assert!(text.contains("Dropped (no title)"));
        assert!(text.contains("median"));
    }

    #[test]
    fn preview_heading_counts_rows_shown() {
        let loaded = loaded();
        let agg = Aggregates::compute(loaded.table.iter(), 10);
        assert_eq!(loaded.table.len(), 1);
        assert!(format_report(&loaded, &agg, 5).contains("First 1 records:"));
        assert!(format_report(&loaded, &agg, 0).contains("First 0 records:"));
    }

    #[test]
    fn long_titles_are_cut() {
        let short = cut(&"a".repeat(100), 10);
        assert_eq!(short.chars().count(), 10);
    }
}
