//! Summary views derived from any sequence of records.
//!
//! Every function here is pure and takes an iterator of `&Record`, so the
//! same code serves a full [`Table`](super::model::Table) and a filtered
//! [`TableView`](super::filter::TableView).

use std::collections::{BTreeMap, HashMap};

use super::model::Record;

/// Journals shown in the top-journals chart.
pub const TOP_JOURNALS: usize = 10;

/// Bins of the abstract-length histogram.
pub const HISTOGRAM_BINS: usize = 50;

// ---------------------------------------------------------------------------
// Publications per year
// ---------------------------------------------------------------------------

/// Publication counts per year; undated records are kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearCounts {
    pub by_year: BTreeMap<i32, usize>,
    pub unknown: usize,
}

impl YearCounts {
    /// Records with a known date.
    pub fn dated(&self) -> usize {
        self.by_year.values().sum()
    }

    /// `(year, count)` points in ascending year order, for plotting.
    pub fn points(&self) -> Vec<(i32, usize)> {
        self.by_year.iter().map(|(&y, &c)| (y, c)).collect()
    }
}

pub fn year_counts<'a>(records: impl IntoIterator<Item = &'a Record>) -> YearCounts {
    let mut counts = YearCounts::default();
    for r in records {
        match r.publish_time.year() {
            Some(year) => *counts.by_year.entry(year).or_insert(0) += 1,
            None => counts.unknown += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Top journals
// ---------------------------------------------------------------------------

/// The `n` journals with the most records, descending; ties keep the order
/// in which the journals were first seen.
pub fn top_journals<'a>(records: impl IntoIterator<Item = &'a Record>, n: usize) -> Vec<(String, usize)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for r in records {
        let journal = r.journal.as_str();
        match position.get(journal) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(journal, counts.len());
                counts.push((journal, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(journal, count)| (journal.to_string(), count))
        .collect()
}

// ---------------------------------------------------------------------------
// Abstract lengths
// ---------------------------------------------------------------------------

pub fn abstract_lengths<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<usize> {
    records.into_iter().map(Record::abstract_length).collect()
}

/// Descriptive statistics of abstract lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthSummary {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
}

impl LengthSummary {
    pub fn from_lengths(lengths: &[usize]) -> Option<Self> {
        if lengths.is_empty() {
            return None;
        }
        let mut sorted = lengths.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
        };
        Some(Self {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean: sorted.iter().sum::<usize>() as f64 / n as f64,
            median,
        })
    }
}

/// Equal-width histogram over `[min, max]`.
///
/// Bins are half-open except the last, which also takes the maximum. When
/// every value is equal the range is widened by 0.5 on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_values(values: &[usize], bins: usize) -> Self {
        let bins = bins.max(1);
        let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) else {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        };

        let (lo, hi) = if lo == hi {
            (lo as f64 - 0.5, hi as f64 + 0.5)
        } else {
            (lo as f64, hi as f64)
        };
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v as f64 - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(left edge, right edge, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Gaussian kernel density estimate of `values`, scaled to histogram counts
/// (`density * n * bin_width`) and sampled at `points` positions across the
/// data range.
///
/// Bandwidth follows Scott's rule. Returns nothing for fewer than two
/// values or zero variance.
pub fn density_curve(values: &[usize], bin_width: f64, points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let xs: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mean = xs.iter().sum::<f64>() / n as f64;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    if std <= f64::EPSILON {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (bandwidth * (2.0 * std::f64::consts::PI).sqrt() * n as f64);
    let scale = n as f64 * bin_width;

    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = xs
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// All views at once
// ---------------------------------------------------------------------------

/// The three aggregate views over one set of records.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub years: YearCounts,
    pub top_journals: Vec<(String, usize)>,
    pub abstract_lengths: Vec<usize>,
}

impl Aggregates {
    pub fn compute<'a, I>(records: I, top_n: usize) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();
        Self {
            years: year_counts(records.clone()),
            top_journals: top_journals(records.clone(), top_n),
            abstract_lengths: abstract_lengths(records),
        }
    }

    pub fn histogram(&self, bins: usize) -> Histogram {
        Histogram::from_values(&self.abstract_lengths, bins)
    }

    pub fn length_summary(&self) -> Option<LengthSummary> {
        LengthSummary::from_lengths(&self.abstract_lengths)
    }
}
