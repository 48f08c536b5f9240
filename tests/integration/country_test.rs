use evidence_harmonizer::HarmonizeConfig;

use crate::utils::{Fixture, column, read_output, strings};

#[test]
fn test_country_expansion_with_codes() {
    let fixture = Fixture::new();
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let countries = read_output(&summary.outputs.countries);

    assert_eq!(summary.country_rows, 4);
    assert_eq!(
        column(&countries, "NAME"),
        strings(&[Some("NIS-001"), Some("NIS-001"), Some("NIS-002"), Some("NIS-003")])
    );
    assert_eq!(
        column(&countries, "COUNTRY"),
        strings(&[
            Some("UNITED STATES"),
            Some("KOREA"),
            Some("UNITED STATES"),
            Some("UNKNOWN"),
        ])
    );
    assert_eq!(
        column(&countries, "Code"),
        strings(&[Some("US"), Some("KR"), Some("US"), None])
    );
}

#[test]
fn test_country_rows_carry_study_fields() {
    let fixture = Fixture::new();
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let countries = read_output(&summary.outputs.countries);

    assert_eq!(
        column(&countries, "STUDYSOP"),
        strings(&[Some("CT24"), Some("CT24"), Some("CT02"), Some("RC01")])
    );
    assert_eq!(
        column(&countries, "UNITEDSTATES"),
        strings(&[Some("Yes"), Some("Yes"), Some("Yes"), Some("No")])
    );
    assert_eq!(
        column(&countries, "STATUS"),
        strings(&[Some("Ongoing"), Some("Ongoing"), None, Some("Ongoing")])
    );
}

#[test]
fn test_duplicate_countries_collapse() {
    let fixture = Fixture::with_catalog(
        crate::utils::CATALOG_HEADER,
        &["NIS-010,Registry,Observational,,,,,,,,,,Approved,\"France|FRANCE|france\",No,No,No,,"],
    );
    let summary = fixture.run(&HarmonizeConfig::default()).unwrap();
    let countries = read_output(&summary.outputs.countries);

    assert_eq!(column(&countries, "COUNTRY"), strings(&[Some("FRANCE")]));
    assert_eq!(column(&countries, "Code"), strings(&[None]));
}
