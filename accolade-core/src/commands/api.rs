// src/commands/api.rs
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use rulebook::assets::{read_verified_or_embedded, COUNTRIES_TOML, POSITIONS_TOML};
use rulebook::{
    default_classifier, default_eligibility, default_normalizer, fingerprint, CategoryClassifier,
    Classification, CountryNormalizer, EligibilityTable, Normalized, PersonIdentity,
};

use crate::config::CoreConfig;
use crate::services::{
    country_tally, person_stats, winner_rows, CountryCount, CountryEntry, NormalizationReport,
    PersonPositionRow, PersonRecord, VariantIndex,
};
use crate::utils::logbook::append_log;

/// Read-only facade over one set of rule tables. Cheap to clone and safe to
/// share across threads; every lookup is total.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Arc<CoreConfig>,
    countries: Arc<CountryNormalizer>,
    classifier: Arc<CategoryClassifier>,
    eligibility: Arc<EligibilityTable>,
}

static EMBEDDED: OnceCell<Engine> = OnceCell::new();

impl Engine {
    /// Engine over the built-in tables with default configuration.
    pub fn embedded() -> &'static Engine {
        EMBEDDED.get_or_init(Engine::default)
    }

    /// Load `<root>/accolade.toml` and the rule tables it points at.
    pub fn open(root: &Path) -> Result<Self> {
        let config = CoreConfig::load(root)?;
        Self::from_config(config)
    }

    pub fn from_config(config: CoreConfig) -> Result<Self> {
        let rules = &config.rules;

        let countries_path = rules.countries_path();
        let text = load_rule_text(&countries_path, &rules.countries, COUNTRIES_TOML, rules.locked)?;
        let countries = CountryNormalizer::from_toml_str(&text)
            .with_context(|| format!("loading country rules {}", countries_path.display()))?;

        let positions_path = rules.positions_path();
        let text = load_rule_text(&positions_path, &rules.positions, POSITIONS_TOML, rules.locked)?;
        let classifier = CategoryClassifier::from_toml_str(&text)
            .with_context(|| format!("loading position rules {}", positions_path.display()))?;
        let eligibility = EligibilityTable::from_rules(classifier.rules());

        tracing::info!(
            countries = %countries.fingerprint(),
            positions = %classifier.fingerprint(),
            "rule tables loaded"
        );

        Ok(Self::with_tables(config, countries, classifier, eligibility))
    }

    pub fn with_tables(
        config: CoreConfig,
        countries: CountryNormalizer,
        classifier: CategoryClassifier,
        eligibility: EligibilityTable,
    ) -> Self {
        Self {
            config: Arc::new(config),
            countries: Arc::new(countries),
            classifier: Arc::new(classifier),
            eligibility: Arc::new(eligibility),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn countries(&self) -> &CountryNormalizer {
        &self.countries
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn eligibility(&self) -> &EligibilityTable {
        &self.eligibility
    }

    // ----------- Countries -----------

    pub fn normalize_country(&self, raw: &str) -> String {
        self.normalize_traced(raw).country
    }

    pub fn normalize_traced(&self, raw: &str) -> Normalized {
        let out = self.countries.normalize_traced(raw);
        if out.step == rulebook::NormalizeStep::PassThrough {
            tracing::debug!(raw, country = %out.country, "unmapped country passed through");
        }
        out
    }

    pub fn aggregate_variants<I, S>(&self, raws: I) -> VariantIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        VariantIndex::aggregate(&self.countries, raws)
    }

    pub fn catalog<I, S>(&self, raws: I) -> Vec<CountryEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aggregate_variants(raws).catalog()
    }

    pub fn variants_of(&self, index: &VariantIndex, query: &str) -> Vec<String> {
        index.variants_of(&self.countries, query)
    }

    pub fn normalization_report<I, S>(&self, raws: I) -> NormalizationReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self.aggregate_variants(raws);
        NormalizationReport::from_index(&index, self.countries.fingerprint())
    }

    /// Append a report to the configured JSONL logbook. Returns the line id.
    pub fn log_report(&self, report: &NormalizationReport) -> Result<String> {
        let data = serde_json::to_value(report)?;
        append_log(
            &self.config.logbook.path,
            "normalization_report",
            &report.message,
            &data,
            self.config.logbook.preview_len,
        )
    }

    /// Top countries by summed count; `None` uses `reports.top_countries`.
    pub fn country_tally<I, S>(&self, rows: I, limit: Option<usize>) -> Vec<CountryCount>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let limit = limit.unwrap_or(self.config.reports.top_countries);
        country_tally(&self.countries, rows, limit)
    }

    // ----------- Positions -----------

    pub fn classify(
        &self,
        category_name: &str,
        known_positions: &[String],
        person: Option<&PersonIdentity>,
    ) -> String {
        self.classify_traced(category_name, known_positions, person).position
    }

    pub fn classify_traced(
        &self,
        category_name: &str,
        known_positions: &[String],
        person: Option<&PersonIdentity>,
    ) -> Classification {
        let out = self.classifier.classify_traced(category_name, known_positions, person);
        tracing::debug!(
            category = category_name,
            position = %out.position,
            rule = ?out.rule,
            "classified category"
        );
        out
    }

    pub fn eligible_categories<'a, T: AsRef<str>>(&self, position: &str, all: &'a [T]) -> Vec<&'a T> {
        self.eligibility.eligible_categories(position, all)
    }

    pub fn person_stats(&self, person: &PersonRecord, position_filter: Option<&str>) -> Vec<PersonPositionRow> {
        person_stats(
            &self.classifier,
            person,
            position_filter,
            &self.config.reports.default_position,
        )
    }

    pub fn winner_rows(&self, people: &[PersonRecord]) -> Vec<PersonPositionRow> {
        winner_rows(&self.classifier, people)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_tables(
            CoreConfig::default(),
            default_normalizer().clone(),
            default_classifier().clone(),
            default_eligibility().clone(),
        )
    }
}

fn load_rule_text(
    path: &Path,
    name: &str,
    embedded: &'static str,
    locked: bool,
) -> Result<Cow<'static, str>> {
    let text = read_verified_or_embedded(path, name, locked)
        .with_context(|| format!("reading rules {}", path.display()))?;
    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "rule file missing or empty; using embedded table");
        return Ok(Cow::Borrowed(embedded));
    }
    if fingerprint(&text) != fingerprint(embedded) {
        tracing::warn!(path = %path.display(), "rule file differs from the embedded table");
    }
    Ok(text)
}
