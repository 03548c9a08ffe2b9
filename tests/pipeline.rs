use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use cord_explorer::config::Config;
use cord_explorer::data::aggregate::{top_journals, year_counts, Aggregates};
use cord_explorer::data::filter::{FilterState, TableView};
use cord_explorer::data::model::{DateRange, ABSTRACT_PLACEHOLDER, JOURNAL_PLACEHOLDER};
use cord_explorer::data::{load_table, DataUnavailable};
use cord_explorer::images::load_chart_image;
use cord_explorer::present::{self, BatchPresenter};

const METADATA: &str = "\
cord_uid,title,abstract,journal,publish_time,source_x
u1,Spike protein binding,Binding assays.,A,2020-01-01,PMC
u2,Household transmission,,B,2020-06-15,WHO
u3,Ventilator outcomes,Cohort study.,A,2021-03-01,PMC
u4,,Orphan abstract,C,2020-02-02,Medline
u5,Modelling spread,Model.,,not a date,PMC
u6,Serology survey,Survey.,D,2019 Dec,Elsevier
";

fn write_metadata(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("metadata.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn cleaned_table_has_no_missing_fields() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();

    assert_eq!(loaded.summary.raw_rows, 6);
    assert_eq!(loaded.summary.dropped_missing_title, 1);
    assert_eq!(loaded.table.len(), 5);
    for r in loaded.table.iter() {
        assert!(!r.title.is_empty());
        assert!(!r.abstract_text.is_empty());
        assert!(!r.journal.is_empty());
    }

    let household = &loaded.table.records[1];
    assert_eq!(household.abstract_text, ABSTRACT_PLACEHOLDER);
    assert_eq!(household.abstract_length(), ABSTRACT_PLACEHOLDER.chars().count());

    let modelling = &loaded.table.records[3];
    assert_eq!(modelling.journal, JOURNAL_PLACEHOLDER);
    assert!(!modelling.publish_time.is_known());

    // Extra columns ride along untouched.
    assert_eq!(loaded.table.extra_columns, vec!["cord_uid", "source_x"]);
    assert_eq!(modelling.extra.get("source_x").map(String::as_str), Some("PMC"));
}

#[test]
fn missing_counts_describe_raw_file() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();
    let missing: BTreeMap<_, _> = loaded.missing.iter().cloned().collect();
    assert_eq!(missing["title"], 1);
    assert_eq!(missing["abstract"], 1);
    assert_eq!(missing["journal"], 1);
    assert_eq!(missing["publish_time"], 0);
}

#[test]
fn year_counts_sum_to_known_dates() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();
    let years = year_counts(loaded.table.iter());

    let known = loaded.table.iter().filter(|r| r.publish_time.is_known()).count();
    assert_eq!(years.dated(), known);
    assert_eq!(years.unknown, 1);
    assert_eq!(years.by_year.get(&2019), Some(&1));
}

#[test]
fn top_journals_are_bounded_and_descending() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();

    for n in 0..6 {
        let top = top_journals(loaded.table.iter(), n);
        assert!(top.len() <= n);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }
    let top = top_journals(loaded.table.iter(), 2);
    assert_eq!(top[0], ("A".to_string(), 2));
}

#[test]
fn filtered_subset_satisfies_predicate() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();
    let table = &loaded.table;

    let filter = FilterState {
        date_range: Some(DateRange {
            start: date(2020, 1, 1),
            end: date(2020, 12, 31),
        }),
        journals: ["A", "B", JOURNAL_PLACEHOLDER].iter().map(|s| s.to_string()).collect(),
    };
    let view = TableView::new(table, &filter);

    let titles: Vec<&str> = view.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Spike protein binding", "Household transmission", "Modelling spread"]
    );
    for r in view.iter() {
        assert!(filter.journals.contains(&r.journal));
        if let Some(d) = r.publish_time.date() {
            assert!(d >= date(2020, 1, 1) && d <= date(2020, 12, 31));
        }
    }
}

#[test]
fn reversed_range_and_empty_selection_yield_nothing() {
    let dir = TempDir::new().unwrap();
    let loaded = load_table(&write_metadata(&dir, METADATA)).unwrap();
    let table = &loaded.table;

    let mut filter = FilterState::select_everything(table);
    filter.date_range = Some(DateRange {
        start: date(2021, 1, 1),
        end: date(2020, 1, 1),
    });
    let view = TableView::new(table, &filter);
    assert!(view.is_empty());
    assert_eq!(Aggregates::compute(view.iter(), 10).years.dated(), 0);

    let mut filter = FilterState::select_everything(table);
    filter.journals.clear();
    assert!(TableView::new(table, &filter).is_empty());
}

#[test]
fn worked_example() {
    let dir = TempDir::new().unwrap();
    let path = write_metadata(
        &dir,
        "title,abstract,journal,publish_time\n\
         P1,x,A,2020-01-01\n\
         P2,y,B,2020-06-15\n\
         P3,z,A,2021-03-01\n",
    );
    let loaded = load_table(&path).unwrap();

    assert_eq!(
        top_journals(loaded.table.iter(), 2),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
    let years = year_counts(loaded.table.iter());
    assert_eq!(years.by_year, BTreeMap::from([(2020, 2), (2021, 1)]));
}

#[test]
fn missing_file_is_not_found() {
    let err = load_table(Path::new("/definitely/not/here/metadata.csv")).unwrap_err();
    assert!(matches!(err, DataUnavailable::FileNotFound(_)));
}

#[test]
fn batch_fails_on_missing_input() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        metadata_path: dir.path().join("missing.csv"),
        chart_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let err = present::run(BatchPresenter::default(), &config).unwrap_err();
    assert!(format!("{err:#}").contains("not found"));
    assert!(!config.publication_trend_path().exists());
}

#[test]
fn batch_writes_and_overwrites_three_charts() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        metadata_path: write_metadata(&dir, METADATA),
        chart_dir: dir.path().join("charts"),
        ..Config::default()
    };
    let charts = [
        config.publication_trend_path(),
        config.top_journals_path(),
        config.abstract_length_path(),
    ];

    present::run(BatchPresenter::default(), &config).unwrap();
    for path in &charts {
        let img = load_chart_image(path).unwrap();
        assert!(img.size[0] > 0 && img.size[1] > 0);
    }

    // A second run replaces whatever is at the fixed names.
    for path in &charts {
        std::fs::write(path, b"stale").unwrap();
    }
    present::run(BatchPresenter::default(), &config).unwrap();
    for path in &charts {
        assert!(load_chart_image(path).is_ok(), "{} not rewritten", path.display());
    }
}

#[test]
fn batch_renders_table_with_no_titled_rows() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        metadata_path: write_metadata(
            &dir,
            "title,abstract,journal,publish_time\n,x,A,2020-01-01\n,y,B,\n",
        ),
        chart_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    assert!(load_table(&config.metadata_path).unwrap().table.is_empty());

    present::run(BatchPresenter::default(), &config).unwrap();
    assert!(load_chart_image(&config.publication_trend_path()).is_ok());
    assert!(load_chart_image(&config.top_journals_path()).is_ok());
    assert!(load_chart_image(&config.abstract_length_path()).is_ok());
}
