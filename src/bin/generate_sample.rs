use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 2000;

/// Output names. Distinct from the default `metadata.csv` so a real
/// dataset in the same directory is never replaced.
const CSV_OUT: &str = "sample_metadata.csv";
const PARQUET_OUT: &str = "sample_metadata.parquet";

const JOURNALS: [&str; 14] = [
    "The Lancet",
    "BMJ",
    "PLoS One",
    "Nature",
    "Science",
    "Journal of Virology",
    "Emerging Infectious Diseases",
    "Clinical Infectious Diseases",
    "Viruses",
    "Vaccine",
    "Journal of Medical Virology",
    "Frontiers in Immunology",
    "Cell",
    "medRxiv",
];

const TOPICS: [&str; 8] = [
    "SARS-CoV-2 transmission",
    "coronavirus spike protein",
    "COVID-19 outcomes",
    "respiratory viral infection",
    "vaccine efficacy",
    "antiviral therapy",
    "epidemic modelling",
    "hospital preparedness",
];

const SOURCES: [&str; 4] = ["PMC", "Medline", "WHO", "Elsevier"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Skewed pick: low indices come up far more often.
    fn skewed(&mut self, n: usize) -> usize {
        let u = self.next_f64();
        ((u * u * u) * n as f64) as usize % n.max(1)
    }
}

struct Row {
    cord_uid: String,
    title: String,
    abstract_text: String,
    journal: String,
    publish_time: String,
    source: String,
}

/// Publication dates written the ways real metadata does: full dates,
/// month only, year only, and the occasional garbage value.
fn publish_time(rng: &mut SimpleRng) -> String {
    // Most papers from 2020 onward, a long tail back to 2000.
    let year = if rng.chance(0.8) {
        2020 + rng.below(3) as i32
    } else {
        2000 + rng.below(20) as i32
    };
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28);
    match rng.below(20) {
        0 => String::new(),
        1 => "not a date".to_string(),
        2 => year.to_string(),
        3 => format!("{year}-{month:02}"),
        4 => format!("{year} {}", ["Jan", "Apr", "Jul", "Oct"][rng.below(4)]),
        _ => format!("{year}-{month:02}-{day:02}"),
    }
}

fn abstract_text(rng: &mut SimpleRng, topic: &str) -> String {
    let sentences = 2 + rng.below(12);
    (0..sentences)
        .map(|i| match i % 3 {
            0 => format!("We investigate {topic} in a cohort of {} patients.", 20 + rng.below(5000)),
            1 => "Results indicate a significant association with clinical severity.".to_string(),
            _ => "Further work is needed to confirm these findings.".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|i| {
            let topic = TOPICS[rng.below(TOPICS.len())];
            let title = if rng.chance(0.02) {
                String::new()
            } else {
                format!("A study of {topic} ({i})")
            };
            let abstract_text = if rng.chance(0.15) {
                String::new()
            } else {
                abstract_text(rng, topic)
            };
            let journal = if rng.chance(0.08) {
                String::new()
            } else {
                JOURNALS[rng.skewed(JOURNALS.len())].to_string()
            };
            Row {
                cord_uid: format!("{:08x}", rng.next_u64() as u32),
                title,
                abstract_text,
                journal,
                publish_time: publish_time(rng),
                source: SOURCES[rng.below(SOURCES.len())].to_string(),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["cord_uid", "title", "abstract", "journal", "publish_time", "source_x"])?;
    for r in rows {
        writer.write_record([
            &r.cord_uid,
            &r.title,
            &r.abstract_text,
            &r.journal,
            &r.publish_time,
            &r.source,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    // Empty strings become nulls, as in exported metadata.
    let column = |get: fn(&Row) -> &str| {
        StringArray::from(
            rows.iter()
                .map(|r| Some(get(r)).filter(|s| !s.is_empty()))
                .collect::<Vec<_>>(),
        )
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("cord_uid", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, true),
        Field::new("abstract", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("publish_time", DataType::Utf8, true),
        Field::new("source_x", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(column(|r| r.cord_uid.as_str())),
            Arc::new(column(|r| r.title.as_str())),
            Arc::new(column(|r| r.abstract_text.as_str())),
            Arc::new(column(|r| r.journal.as_str())),
            Arc::new(column(|r| r.publish_time.as_str())),
            Arc::new(column(|r| r.source.as_str())),
        ],
    )?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write both sample files into `dir`. Refuses to touch existing files.
fn write_samples(rows: &[Row], dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let csv_path = dir.join(CSV_OUT);
    let parquet_path = dir.join(PARQUET_OUT);
    for path in [&csv_path, &parquet_path] {
        if path.exists() {
            bail!("{} already exists; remove it to regenerate", path.display());
        }
    }

    write_csv(rows, &csv_path)?;
    write_parquet(rows, &parquet_path)?;
    Ok((csv_path, parquet_path))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let (csv_path, parquet_path) = write_samples(&rows, Path::new("."))?;
    println!(
        "Wrote {} records to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
