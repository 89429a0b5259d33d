use std::fs;

use rulebook::assets::{
    default_rules_text, read_verified_or_embedded, write_default_rules, COUNTRIES_TOML,
    COUNTRIES_TOML_NAME, POSITIONS_TOML, POSITIONS_TOML_NAME,
};
use rulebook::{fingerprint, load_rulebook, CountryRuleSet, PositionRuleSet, RulesError};

#[test]
fn embedded_tables_are_valid() {
    let countries = CountryRuleSet::from_toml_str(COUNTRIES_TOML).expect("countries.toml");
    assert!(countries.canonical.iter().any(|c| c == "United States"));
    assert!(countries.aliases.len() > 200);

    let positions = PositionRuleSet::from_toml_str(POSITIONS_TOML).expect("positions.toml");
    assert_eq!(positions.fallback, "Other");
    assert!(!positions.categories.is_empty());
    assert!(!positions.eligibility.is_empty());
}

#[test]
fn known_names_resolve_to_embedded_text() {
    assert_eq!(default_rules_text(COUNTRIES_TOML_NAME), Some(COUNTRIES_TOML));
    assert_eq!(default_rules_text(POSITIONS_TOML_NAME), Some(POSITIONS_TOML));
    assert_eq!(default_rules_text("nope.toml"), None);
}

#[test]
fn write_defaults_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules");

    let mut created = write_default_rules(&rules).unwrap();
    created.sort();
    assert_eq!(created, vec!["countries.toml", "positions.toml"]);

    let again = write_default_rules(&rules).unwrap();
    assert!(again.is_empty());
    assert_eq!(fs::read_to_string(rules.join("countries.toml")).unwrap(), COUNTRIES_TOML);
}

#[test]
fn missing_file_is_seeded_from_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/positions.toml");
    let text = read_verified_or_embedded(&path, POSITIONS_TOML_NAME, true).unwrap();
    assert_eq!(&*text, POSITIONS_TOML);
    assert!(path.exists());
}

#[test]
fn locked_mode_restores_edited_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countries.toml");
    fs::write(&path, "name = \"tampered\"").unwrap();

    let text = read_verified_or_embedded(&path, COUNTRIES_TOML_NAME, true).unwrap();
    assert_eq!(&*text, COUNTRIES_TOML);
    assert_eq!(fs::read_to_string(&path).unwrap(), COUNTRIES_TOML);
}

#[test]
fn unlocked_mode_keeps_local_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countries.toml");
    let edited = COUNTRIES_TOML.replace("\"persia\", \"Iran\"", "\"persia\", \"Turkey\"");
    fs::write(&path, &edited).unwrap();

    let text = read_verified_or_embedded(&path, COUNTRIES_TOML_NAME, false).unwrap();
    assert_eq!(&*text, edited);
    assert_ne!(fingerprint(&text), fingerprint(COUNTRIES_TOML));
}

#[test]
fn unknown_name_reads_file_or_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra.toml");
    assert_eq!(read_verified_or_embedded(&path, "extra.toml", true).unwrap(), "");
    assert!(!path.exists());

    fs::write(&path, "x = 1").unwrap();
    assert_eq!(read_verified_or_embedded(&path, "extra.toml", true).unwrap(), "x = 1");
}

#[test]
fn load_rulebook_builds_all_three() {
    let (countries, classifier, eligibility) =
        load_rulebook(COUNTRIES_TOML, POSITIONS_TOML).unwrap();
    assert_eq!(countries.normalize("West Germany"), "Germany");
    assert_eq!(classifier.classify("Best Director", &[], None), "Director");
    assert_eq!(
        eligibility.eligible_categories("Director", &["Best Picture", "Best Director"]),
        vec![&"Best Director"]
    );
    assert_eq!(countries.fingerprint(), fingerprint(COUNTRIES_TOML));
    assert_eq!(classifier.fingerprint(), fingerprint(POSITIONS_TOML));
}

#[test]
fn malformed_toml_reports_which_table() {
    let err = load_rulebook("not = [valid", POSITIONS_TOML).unwrap_err();
    assert!(matches!(err, RulesError::Parse { table: "country", .. }), "{err}");

    let err = load_rulebook(COUNTRIES_TOML, "fallback = ").unwrap_err();
    assert!(matches!(err, RulesError::Parse { table: "position", .. }), "{err}");
}
