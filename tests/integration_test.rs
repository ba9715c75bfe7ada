// Integration tests for catmatch
use catmatch::prelude::*;
use catmatch::{EmbeddingError, MatchError, TableError};
use catmatch_core::Vector;
use std::collections::HashSet;
use std::sync::Arc;

fn company_a() -> Table {
    Table::new(
        "Company A",
        vec![
            Record::new("Red Shoes", "Comfy running shoes", "Shoes > Running", "$50"),
            Record::new("Blue Hat", "<b>Warm</b> wool hat", "Hats", "$10"),
            Record::new("Leather Wallet", "", "Accessories", "n/a"),
        ],
    )
}

fn company_b() -> Table {
    Table::new(
        "Company B",
        vec![
            Record::new("blue hat", "", "Hats > Winter", "9.99"),
            Record::new("red shoes!!", "", "Footwear > Shoes", "50.00"),
            Record::new("Garden Hose", "", "Garden", "$25"),
        ],
    )
}

#[test]
fn test_end_to_end_scenario() {
    let a = Table::new("A", vec![Record::titled("Red Shoes", "$50")]);
    let b = Table::new(
        "B",
        vec![
            Record::titled("red shoes!!", "50.00"),
            Record::titled("Blue Hat", "$10"),
        ],
    );

    let outcome = Matcher::new(MatchConfig::default().with_threshold(0.5))
        .unwrap()
        .run(&a, &b)
        .unwrap();

    assert_eq!(outcome.assignment.len(), 1);
    let matched = outcome.assignment.get(0).unwrap();
    assert_eq!(matched.b_idx, 0);
    assert_eq!(matched.features.price_diff, Some(0.0));
    assert_eq!(matched.features.fuzz_title, 1.0);
    assert!((matched.features.tfidf_sim - 1.0).abs() < 1e-5);
    assert!((matched.features.emb_sim - 1.0).abs() < 1e-5);
}

#[test]
fn test_cross_product_candidate_count() {
    let matcher = Matcher::new(MatchConfig::default()).unwrap();
    let outcome = matcher.run(&company_a(), &company_b()).unwrap();

    assert_eq!(outcome.summary.candidates, 3 * 3);
    assert_eq!(outcome.summary.a_rows, 3);
    assert_eq!(outcome.summary.b_rows, 3);
    assert_eq!(outcome.summary.unknown_prices_a, 1);
    assert_eq!(outcome.summary.unknown_prices_b, 0);
}

#[test]
fn test_catalog_assignment_is_one_to_one() {
    let matcher = Matcher::new(MatchConfig::default().with_threshold(0.5)).unwrap();
    let assignment = matcher.match_tables(&company_a(), &company_b()).unwrap();

    assert_eq!(assignment.b_for(0), Some(1));
    assert_eq!(assignment.b_for(1), Some(0));

    let a_seen: HashSet<usize> = assignment.iter().map(|r| r.a_idx).collect();
    let b_seen: HashSet<usize> = assignment.iter().map(|r| r.b_idx).collect();
    assert_eq!(a_seen.len(), assignment.len());
    assert_eq!(b_seen.len(), assignment.len());
    assert!(assignment.iter().all(|r| r.features.emb_sim >= 0.5));

    // rows come out by descending emb_sim
    let scores: Vec<f32> = assignment.iter().map(|r| r.features.emb_sim).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_category_overlap_shrinks_candidates() {
    let config = MatchConfig::default()
        .with_threshold(0.5)
        .with_category_overlap(true);
    let outcome = Matcher::new(config).unwrap().run(&company_a(), &company_b()).unwrap();

    // shoes~shoes and hats~hats are the only overlapping category pairs
    assert_eq!(outcome.summary.candidates, 2);
    assert_eq!(outcome.assignment.b_for(0), Some(1));
    assert_eq!(outcome.assignment.b_for(1), Some(0));
}

#[test]
fn test_empty_tables_yield_empty_assignment() {
    let matcher = Matcher::new(MatchConfig::default()).unwrap();
    let empty = Table::new("empty", Vec::new());

    let outcome = matcher.run(&empty, &company_b()).unwrap();
    assert!(outcome.assignment.is_empty());
    assert_eq!(outcome.summary.candidates, 0);

    assert!(matcher.match_tables(&company_a(), &empty).unwrap().is_empty());
}

#[test]
fn test_threshold_above_one_matches_nothing() {
    let matcher = Matcher::new(MatchConfig::default().with_threshold(1.01)).unwrap();
    assert!(matcher.match_tables(&company_a(), &company_b()).unwrap().is_empty());
}

/// Every title embeds to the same vector, so every pair ties at 1.0
struct ConstantModel;

impl EmbeddingModel for ConstantModel {
    fn name(&self) -> &str {
        "constant"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn encode(&self, _text: &str) -> Result<Vector, EmbeddingError> {
        Ok(Vector::new(vec![1.0, 0.0]))
    }
}

#[test]
fn test_injected_model_ties_resolve_by_order() {
    let matcher = Matcher::with_model(MatchConfig::default(), Arc::new(ConstantModel)).unwrap();
    let assignment = matcher.match_tables(&company_a(), &company_b()).unwrap();

    // every A row prefers B0; A0 is first to claim it
    assert_eq!(assignment.len(), 1);
    assert_eq!(assignment.b_for(0), Some(0));
    assert_eq!(assignment.a_for(0), Some(0));
}

#[test]
fn test_unknown_model_is_fatal() {
    let err = Matcher::new(MatchConfig::default().with_model_name("no-such-model")).unwrap_err();
    assert!(matches!(err, MatchError::Embedding(EmbeddingError::UnknownModel(_))));
}

#[test]
fn test_csv_workbook_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let sheets = dir.path().join("catalogs");
    std::fs::create_dir(&sheets).unwrap();
    std::fs::write(
        sheets.join("1_company_a.csv"),
        "Title,Detail,Category,Price\n\
         Red Shoes,Comfy running shoes,Shoes > Running,$50\n\
         Blue Hat,\"Warm, wool\",Hats,$10\n",
    )
    .unwrap();
    std::fs::write(
        sheets.join("2_company_b.csv"),
        "Title,Detail,Category,Price\n\
         Garden Hose,,Garden,$25\n\
         red shoes!!,,Shoes,50.00\n\
         blue hat,,Hats,\n",
    )
    .unwrap();

    let workbook = Workbook::open(&sheets).unwrap();
    let columns = ColumnConfig::default();
    let a = workbook.table(&SheetRef::parse("0"), &columns).unwrap();
    let b = workbook.table(&SheetRef::parse("2_company_b"), &columns).unwrap();
    assert_eq!(a.name, "1_company_a");
    assert_eq!(b.len(), 3);

    let matcher = Matcher::new(MatchConfig::default().with_threshold(0.5)).unwrap();
    let outcome = matcher.run(&a, &b).unwrap();

    let output = dir.path().join("catalogs_matches.csv");
    write_assignment(&output, &outcome.assignment, &a, &b).unwrap();

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["a_idx", "b_idx", "fuzz_title", "tfidf_sim", "emb_sim", "price_diff", "A_Title", "B_Title"]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    let hat = rows.iter().find(|r| &r[6] == "Blue Hat").unwrap();
    assert_eq!(&hat[1], "2");
    assert_eq!(&hat[5], "");
    assert_eq!(&hat[7], "blue hat");
}

#[test]
fn test_json_workbook_with_custom_columns() {
    let workbook = Workbook::from_json_str(
        r#"{
            "A": [{"Name": "Red Shoes", "Info": null, "Cat": "Shoes", "Cost": 50}],
            "B": [{"Name": "red shoes", "Info": "", "Cat": "Shoes", "Cost": "$49.50"}]
        }"#,
    )
    .unwrap();
    let config = CatmatchConfig::from_json(
        r#"{
            "columns": {"title": "Name", "detail": "Info", "category": "Cat", "price": "Cost"},
            "matching": {"EMB_SIM_THRESHOLD": 0.9}
        }"#,
    )
    .unwrap();

    let a = workbook.table(&SheetRef::Index(0), &config.columns).unwrap();
    let b = workbook.table(&SheetRef::Index(1), &config.columns).unwrap();
    let assignment = Matcher::new(config.matching).unwrap().match_tables(&a, &b).unwrap();

    assert_eq!(assignment.len(), 1);
    assert_eq!(assignment.rows()[0].features.price_diff, Some(0.5));
}

#[test]
fn test_missing_column_is_fatal() {
    let workbook = Workbook::from_json_str(r#"{"A": [{"Title": "Red Shoes", "Price": "$50"}]}"#).unwrap();
    let err = workbook
        .table(&SheetRef::Index(0), &ColumnConfig::default())
        .unwrap_err();
    assert!(matches!(err, TableError::MissingColumn { .. }));

    assert!(matches!(
        workbook.table(&SheetRef::Index(3), &ColumnConfig::default()),
        Err(TableError::SheetNotFound(_))
    ));
}
