use rulebook::country::{default_normalizer, normalize_country, CountryNormalizer, NormalizeStep};
use rulebook::types::CountryRuleSet;

#[test]
fn canonical_names_are_fixed_points() {
    let n = default_normalizer();
    assert!(n.canonical().len() >= 60);
    for c in n.canonical() {
        assert!(n.is_canonical(c));
        assert_eq!(&n.normalize(c), c, "canonical {c:?} did not map to itself");
    }
}

#[test]
fn us_self_references_collapse() {
    for raw in [
        "U.S.",
        "USA",
        "United States of America",
        "united states",
        "U. S. A.",
        "America",
        "u.s",
    ] {
        assert_eq!(normalize_country(raw), "United States", "{raw:?}");
    }
    let traced = default_normalizer().normalize_traced("USA");
    assert_eq!(traced.step, NormalizeStep::UsSelfReference);
}

#[test]
fn bare_state_or_city_means_united_states() {
    assert_eq!(normalize_country("California"), "United States");
    assert_eq!(normalize_country("Los Angeles, California, U.S."), "United States");
    assert_eq!(normalize_country("Brooklyn, NY"), "United States");
    assert_eq!(normalize_country("Hollywood"), "United States");
    assert_eq!(
        default_normalizer().normalize_traced("Springfield, Illinois").step,
        NormalizeStep::UsPart
    );
}

#[test]
fn historical_germanies_merge() {
    assert_eq!(normalize_country("West Germany"), "Germany");
    assert_eq!(normalize_country("East Germany"), "Germany");
    assert_eq!(normalize_country("Weimar Republic"), "Germany");
    assert_eq!(normalize_country("Munich, Bavaria, West Germany"), "Germany");
}

#[test]
fn annotations_and_noise_are_ignored() {
    assert_eq!(normalize_country("Berlin, Germany [disputed]"), "Germany");
    assert_eq!(normalize_country("U.S.unreliablesource"), "United States");
    assert_eq!(normalize_country("England (both)"), "United Kingdom");
    assert_eq!(normalize_country("  Persia  "), "Iran");
}

#[test]
fn governmental_prefix_is_stripped_for_lookup() {
    let n = default_normalizer();
    let traced = n.normalize_traced("Kingdom of Canada");
    assert_eq!(traced.country, "Canada");
    assert_eq!(traced.step, NormalizeStep::CoreAlias);
    assert_eq!(n.normalize("Republic of Korea"), "South Korea");
    assert_eq!(n.normalize("Republic of China"), "Taiwan");
    assert_eq!(n.normalize("People's Republic of China"), "China");
}

#[test]
fn empire_names_map_to_present_day_countries() {
    assert_eq!(normalize_country("Ottoman Empire"), "Turkey");
    assert_eq!(normalize_country("Austro-Hungarian Empire"), "Austria");
    assert_eq!(normalize_country("Soviet Union"), "Russia");
    assert_eq!(normalize_country("Mand. Palestine"), "Palestine");
}

#[test]
fn scan_is_first_match_in_table_order() {
    let n = default_normalizer();
    let traced = n.normalize_traced("London, England");
    assert_eq!(traced.country, "United Kingdom");
    assert_eq!(traced.step, NormalizeStep::AliasScan);

    // containment is a plain substring test
    let traced = n.normalize_traced("Parisian quarter");
    assert_eq!(traced.country, "France");
    assert_eq!(traced.step, NormalizeStep::AliasScan);
    assert_eq!(n.normalize("Minsk, Belarus"), "United States");
    assert_eq!(n.normalize("Vienna, Austria"), "United States");

    // exact lookups run before the scan
    assert_eq!(n.normalize("Russia"), "Russia");
    assert_eq!(n.normalize("Austria"), "Austria");
}

#[test]
fn us_state_and_city_names_match_inside_words() {
    let n = default_normalizer();
    let traced = n.normalize_traced("Indianapolis");
    assert_eq!(traced.country, "United States");
    assert_eq!(traced.step, NormalizeStep::UsScan);
    assert_eq!(
        n.normalize_traced("Charlottenburg, Germany").step,
        NormalizeStep::UsPart
    );
}

#[test]
fn unknown_values_pass_through_with_casing() {
    let traced = default_normalizer().normalize_traced("Freedonia (fictional)");
    assert_eq!(traced.country, "Freedonia");
    assert_eq!(traced.step, NormalizeStep::PassThrough);
    assert_eq!(normalize_country("Zenda, Ruritania"), "Zenda, Ruritania");
    assert_eq!(normalize_country("Disputed territory"), "Disputed territory");
}

#[test]
fn empty_input_is_total() {
    assert_eq!(normalize_country(""), "");
    assert_eq!(normalize_country("   "), "");
    assert_eq!(normalize_country("(unknown)"), "");
    let traced = default_normalizer().normalize_traced("");
    assert_eq!(traced.step, NormalizeStep::Empty);
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "U.S.",
        "Paris, France",
        "Toronto, Ontario, Canada",
        "Georgia",
        "Prague, Czechoslovakia",
        "Freedonia (fictional)",
        "Minsk, Belarus",
        "Indianapolis",
        "Bombay, British India",
        "Disputed territory",
        "both",
        "",
    ];
    for raw in samples {
        let once = normalize_country(raw);
        assert_eq!(normalize_country(&once), once, "{raw:?}");
    }
}

#[test]
fn custom_table_is_honored() {
    let text = r#"
        name = "tiny"
        version = "0.1"
        us_self_reference = '^(usa)$'
        us_target = "United States"
        canonical = ["United States", "Atlantis"]
        aliases = [["poseidonis", "Atlantis"]]
    "#;
    let n = CountryNormalizer::from_toml_str(text).expect("valid tiny table");
    assert_eq!(n.normalize("Poseidonis"), "Atlantis");
    assert_eq!(n.normalize("usa"), "United States");
    assert_eq!(n.normalize("California"), "California");
    assert_eq!(n.fingerprint(), rulebook::fingerprint(text));
}

#[test]
fn rule_set_can_be_edited_in_code() {
    let mut set = CountryRuleSet::from_toml_str(rulebook::assets::COUNTRIES_TOML).unwrap();
    let unchanged = CountryNormalizer::from_rules(&set).expect("embedded set is valid");
    let serialized = toml::to_string(&set).unwrap();
    assert_eq!(unchanged.fingerprint(), rulebook::fingerprint(&serialized));
    assert_eq!(
        unchanged.fingerprint(),
        CountryNormalizer::from_rules(&set).unwrap().fingerprint()
    );

    set.aliases.insert(0, ("ruritania".into(), "Austria".into()));
    let n = CountryNormalizer::from_rules(&set).expect("edited table is valid");
    assert_eq!(n.normalize("Zenda, Ruritania"), "Austria");
    assert_eq!(n.normalize("West Germany"), "Germany");
    assert_ne!(n.fingerprint(), default_normalizer().fingerprint());

    set.aliases.push(("atlantis".into(), "Atlantis".into()));
    assert!(CountryNormalizer::from_rules(&set).is_err());
}

#[test]
fn alias_to_unknown_country_is_rejected() {
    let text = r#"
        name = "broken"
        version = "0.1"
        us_self_reference = '^(usa)$'
        us_target = "United States"
        canonical = ["United States"]
        aliases = [["poseidonis", "Atlantis"]]
    "#;
    let err = CountryRuleSet::from_toml_str(text).unwrap_err();
    assert!(err.to_string().contains("non-canonical"), "{err}");
}

#[test]
fn bad_pattern_is_rejected() {
    let text = r#"
        name = "broken"
        version = "0.1"
        us_self_reference = '^(usa'
        us_target = "United States"
        canonical = ["United States"]
    "#;
    assert!(CountryNormalizer::from_toml_str(text).is_err());
}
