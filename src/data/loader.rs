use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataUnavailable;
use super::model::{RawRecord, RawTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metadata file into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited with a header row (the CORD-19 layout)
/// * `.tsv`     – tab-delimited with a header row
/// * `.json`    – `[{ "title": ..., "abstract": ..., ... }, ...]`
/// * `.parquet` – one column per field, any Arrow type
///
/// Blank cells, JSON nulls and Parquet nulls are all read as missing.
pub fn load_file(path: &Path) -> Result<RawTable, DataUnavailable> {
    if !path.exists() {
        return Err(DataUnavailable::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataUnavailable::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Read {} rows from {} ({} extra columns)",
        table.len(),
        path.display(),
        table.extra_columns.len()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, DataUnavailable> {
    File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataUnavailable::FileNotFound(path.to_path_buf()),
        _ => DataUnavailable::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// A cell counts as missing when it is empty or whitespace only.
fn cell(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Positions of the required columns plus the remaining (index, name) pairs.
struct ColumnLayout {
    title: usize,
    abstract_text: usize,
    journal: usize,
    publish_time: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(path: &Path, headers: &[String]) -> Result<Self, DataUnavailable> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DataUnavailable::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };

        let layout = ColumnLayout {
            title: find("title")?,
            abstract_text: find("abstract")?,
            journal: find("journal")?,
            publish_time: find("publish_time")?,
            extra: headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
                .map(|(i, h)| (i, h.clone()))
                .collect(),
        };
        Ok(layout)
    }

    fn extra_columns(&self) -> Vec<String> {
        self.extra.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Build a raw row from a cell accessor.
    fn record<'a>(&self, get: impl Fn(usize) -> Option<&'a str>) -> RawRecord {
        let field = |idx: usize| get(idx).and_then(cell);
        let extra: BTreeMap<String, String> = self
            .extra
            .iter()
            .filter_map(|(idx, name)| field(*idx).map(|v| (name.clone(), v)))
            .collect();

        RawRecord {
            title: field(self.title),
            abstract_text: field(self.abstract_text),
            journal: field(self.journal),
            publish_time: field(self.publish_time),
            extra,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<RawTable, DataUnavailable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(open(path)?);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataUnavailable::parse(path, format!("reading header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let layout = ColumnLayout::from_headers(path, &headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| DataUnavailable::parse(path, format!("row {row_no}: {e}")))?;
        records.push(layout.record(|idx| row.get(idx)));
    }

    Ok(RawTable {
        records,
        extra_columns: layout.extra_columns(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "...", "abstract": null, "journal": "Lancet", "publish_time": "2020-03-01" },
///   ...
/// ]
/// ```
///
/// Columns are the union of keys across all rows, in first-seen order.
fn load_json(path: &Path) -> Result<RawTable, DataUnavailable> {
    let text = std::fs::read_to_string(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DataUnavailable::parse(path, e))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataUnavailable::parse(path, "expected top-level JSON array"))?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataUnavailable::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }
    let layout = ColumnLayout::from_headers(path, &headers)?;

    let records = objects
        .into_iter()
        .map(|obj| {
            let cells: Vec<Option<String>> = headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_text))
                .collect();
            layout.record(|idx| cells.get(idx).and_then(|c| c.as_deref()))
        })
        .collect();

    Ok(RawTable {
        records,
        extra_columns: layout.extra_columns(),
    })
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or Polars.
///
/// Every column is rendered to text with Arrow's display formatter, so a
/// `Date32` `publish_time` arrives as `YYYY-MM-DD` just like the CSV form.
fn load_parquet(path: &Path) -> Result<RawTable, DataUnavailable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)
        .map_err(|e| DataUnavailable::parse(path, format!("reading parquet metadata: {e}")))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = ColumnLayout::from_headers(path, &headers)?;
    let reader = builder
        .build()
        .map_err(|e| DataUnavailable::parse(path, format!("building parquet reader: {e}")))?;

    let options = FormatOptions::default();
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataUnavailable::parse(path, e))?;
        let columns = batch.columns();
        let formatters = columns
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DataUnavailable::parse(path, e))?;

        for row in 0..batch.num_rows() {
            let cells: Vec<Option<String>> = columns
                .iter()
                .zip(&formatters)
                .map(|(col, fmt)| (!col.is_null(row)).then(|| fmt.value(row).to_string()))
                .collect();
            records.push(layout.record(|idx| cells.get(idx).and_then(|c| c.as_deref())));
        }
    }

    Ok(RawTable {
        records,
        extra_columns: layout.extra_columns(),
    })
}
