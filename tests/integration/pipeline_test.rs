use std::fs;

use evidence_harmonizer::{HarmonizeConfig, HarmonizeError, OutputFormat};

use crate::utils::{CATALOG_HEADER, CATALOG_ROWS, Fixture, column, read_output, strings};

#[test]
fn test_default_run_filters_trials_and_renames() {
    let fixture = Fixture::new();
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();

    assert_eq!(summary.record_rows, 2);
    assert_eq!(summary.filtered_rows, 1);
    assert!(summary.outputs.records.ends_with("nis.csv"));

    let nis = read_output(&summary.outputs.records);
    assert_eq!(nis.num_columns(), 22);
    assert_eq!(nis.schema().field(0).name(), "ID");
    assert_eq!(column(&nis, "ID"), strings(&[Some("NIS-001"), Some("NIS-003")]));
    assert_eq!(column(&nis, "SOP"), strings(&[Some("CT24"), Some("RC01")]));
    assert!(!column(&nis, "SOP").contains(&Some("CT02".to_string())));
}

#[test]
fn test_harmonized_values() {
    let fixture = Fixture::new();
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let nis = read_output(&summary.outputs.records);

    assert_eq!(
        column(&nis, "Category"),
        strings(&[Some("Internal Medicine"), Some("Oncology")])
    );
    assert_eq!(
        column(&nis, "Asset Priority"),
        strings(&[Some("Priority"), Some("No Drug")])
    );
    assert_eq!(column(&nis, "PASS"), strings(&[Some("No"), None]));
    assert_eq!(
        column(&nis, "Post Marketing Surveillance"),
        strings(&[Some("No"), None])
    );
    assert_eq!(
        column(&nis, "Group Operationalizing"),
        strings(&[Some("Medical Affairs"), None])
    );
    assert_eq!(
        column(&nis, "Study Country(s)"),
        strings(&[Some("Usa,Korea, Republic Of"), Some("Unknown")])
    );
}

#[test]
fn test_status_join_matches_after_normalization() {
    let fixture = Fixture::new();
    let mut config = HarmonizeConfig::default();
    config.output.apply_pre_filters = false;
    let summary = fixture.run(&config).unwrap();
    let nis = read_output(&summary.outputs.records);

    assert_eq!(
        column(&nis, "Status"),
        strings(&[Some("Ongoing"), None, Some("Ongoing")])
    );
    assert_eq!(
        column(&nis, "Status Detail"),
        strings(&[Some("Approved"), None, Some("Approved")])
    );
}

#[test]
fn test_budget_join() {
    let fixture = Fixture::new();
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let nis = read_output(&summary.outputs.records);

    assert_eq!(
        column(&nis, "Remaining Budget"),
        strings(&[Some("Yes"), Some("Unknown")])
    );
    let totals = column(&nis, "Total");
    let approved: f64 = totals[0].as_deref().unwrap().parse().unwrap();
    assert!((approved - 100.0).abs() < f64::EPSILON);
    assert_eq!(totals[1], None);
    assert_eq!(column(&nis, "Paid")[1], None);
}

#[test]
fn test_budget_error_and_unparseable_amounts() {
    let fixture = Fixture::new();
    fixture.write(
        "Grants Budgets and Payments.csv",
        "GRANT_ID,APPROVED_AMOUNT,TOTAL_PAID\nNIS-001,100,150\nNIS-003,n/a,10\n",
    );
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let nis = read_output(&summary.outputs.records);

    assert_eq!(
        column(&nis, "Remaining Budget"),
        strings(&[Some("Error"), Some("Unknown")])
    );
}

#[test]
fn test_pre_filter_disabled_keeps_trials() {
    let fixture = Fixture::new();
    let mut config = HarmonizeConfig::default();
    config.output.apply_pre_filters = false;
    let summary = fixture.run(&config).unwrap();

    assert_eq!(summary.record_rows, 3);
    assert_eq!(summary.filtered_rows, 0);
    let nis = read_output(&summary.outputs.records);
    assert_eq!(
        column(&nis, "SOP"),
        strings(&[Some("CT24"), Some("CT02"), Some("RC01")])
    );
}

#[test]
fn test_full_column_set_without_subset_or_rename() {
    let fixture = Fixture::new();
    let mut config = HarmonizeConfig::default();
    config.output.subset_columns = false;
    config.output.rename_columns = false;
    let summary = fixture.run(&config).unwrap();
    let nis = read_output(&summary.outputs.records);

    assert_eq!(nis.num_columns(), 27);
    assert_eq!(nis.schema().field(0).name(), "NAME");
    assert_eq!(
        column(&nis, "HARMONIZEDPRIMARYDRUG"),
        strings(&[Some("Eliquis"), None])
    );
}

#[test]
fn test_rerun_is_byte_identical() {
    let fixture = Fixture::new();
    let config = HarmonizeConfig::default();

    let first = fixture.run(&config).unwrap();
    let records = fs::read(&first.outputs.records).unwrap();
    let countries = fs::read(&first.outputs.countries).unwrap();

    let second = fixture.run(&config).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second.outputs.records).unwrap(), records);
    assert_eq!(fs::read(&second.outputs.countries).unwrap(), countries);
}

#[test]
fn test_missing_required_column_writes_nothing() {
    let header = CATALOG_HEADER.replace(",SPONSORINGDIVISION", "");
    let rows: Vec<String> = CATALOG_ROWS
        .iter()
        .map(|row| row.rsplit_once(',').unwrap().0.to_string())
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let fixture = Fixture::with_catalog(&header, &rows);

    let err = fixture.run(&HarmonizeConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        HarmonizeError::MissingColumn { ref column, .. } if column == "SPONSORINGDIVISION"
    ));
    assert_eq!(fs::read_dir(fixture.output.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_source_file_is_fatal() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.data.path().join("country_codes.csv")).unwrap();

    let err = fixture.run(&HarmonizeConfig::default()).unwrap_err();
    assert!(matches!(err, HarmonizeError::Io { .. }));
    assert!(!fixture.output_path("nis.csv").exists());
}

#[test]
fn test_renamed_sources_from_json_config() {
    let fixture = Fixture::new();
    fs::rename(
        fixture.data.path().join("EvidenceCatalog.csv"),
        fixture.data.path().join("catalog_export.csv"),
    )
    .unwrap();

    let config = HarmonizeConfig::from_json_str(
        r#"{"sources": {"evidence_catalog": "catalog_export.csv"}, "output": {"apply_pre_filters": false}}"#,
    )
    .unwrap();
    assert!(config.output.subset_columns);

    let summary = fixture.run(&config).unwrap();
    assert_eq!(summary.record_rows, 3);
}

#[test]
fn test_parquet_output() {
    let fixture = Fixture::new();
    let config = HarmonizeConfig {
        format: OutputFormat::Parquet,
        ..HarmonizeConfig::default()
    };
    let summary = fixture.run(&config).unwrap();

    assert!(summary.outputs.records.ends_with("nis.parquet"));
    assert!(summary.outputs.countries.ends_with("study_countries.parquet"));
    assert!(fs::metadata(&summary.outputs.records).unwrap().len() > 0);
    assert!(!fixture.output_path("nis.csv").exists());
}
