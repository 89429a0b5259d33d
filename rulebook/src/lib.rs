// Public modules so accolade-core can use them
pub mod assets;
pub mod category;
pub mod country;
pub mod eligibility;
pub mod error;
pub mod normalize;
pub mod types;

pub use assets::{default_rules_text, fingerprint, read_verified_or_embedded, write_default_rules};
pub use category::{
    classify_category, default_classifier, CategoryClassifier, Classification, ClassifyRule,
    PersonIdentity,
};
pub use country::{
    default_normalizer, normalize_country, CountryNormalizer, NormalizeStep, Normalized,
};
pub use eligibility::{default_eligibility, eligible_categories, EligibilityTable, RoleMatch};
pub use error::RulesError;
pub use normalize::for_rules as normalize_for_rules;
pub use types::{CountryRuleSet, PositionRuleSet};

/// --- Pure Rust API over caller-supplied rule text ---
///
/// Build all three lookups from a pair of TOML documents in one go.
pub fn load_rulebook(
    countries_toml: &str,
    positions_toml: &str,
) -> Result<(CountryNormalizer, CategoryClassifier, EligibilityTable), RulesError> {
    let countries = CountryNormalizer::from_toml_str(countries_toml)?;
    let classifier = CategoryClassifier::from_toml_str(positions_toml)?;
    let eligibility = EligibilityTable::from_rules(classifier.rules());
    Ok((countries, classifier, eligibility))
}
