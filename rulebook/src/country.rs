//! Country normalization: raw, scraped origin strings -> one canonical display name.
//!
//! Precedence is fixed and mirrors the order of [`NormalizeStep`]:
//! US self-reference, US state/city parts, US whole-string scan, exact alias
//! (cleaned, then with the governmental prefix stripped), ordered alias scan,
//! and finally pass-through of the annotation-stripped input. Containment
//! checks are plain substring tests over the cleaned, lowercased text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::assets::{fingerprint, COUNTRIES_TOML};
use crate::error::RulesError;
use crate::normalize::{for_rules, strip_annotations};
use crate::types::CountryRuleSet;

/// Which rule produced a normalization result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeStep {
    Empty,
    UsSelfReference,
    UsPart,
    UsScan,
    ExactAlias,
    CoreAlias,
    AliasScan,
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub country: String,
    pub step: NormalizeStep,
}

/// Compiled, read-only form of a [`CountryRuleSet`].
#[derive(Debug, Clone)]
pub struct CountryNormalizer {
    us_self_reference: Regex,
    us_target: String,
    noise: Vec<String>,
    us_states: Vec<String>,
    us_state_codes: HashSet<String>,
    us_cities: Vec<String>,
    prefixes: Vec<String>,
    exact: HashMap<String, String>,
    scan: Vec<(String, String)>,
    canonical: Vec<String>,
    fingerprint: String,
}

static EMBEDDED: Lazy<CountryNormalizer> = Lazy::new(|| {
    CountryNormalizer::from_toml_str(COUNTRIES_TOML)
        .unwrap_or_else(|e| panic!("embedded countries.toml is invalid: {e}"))
});

/// Normalizer over the embedded default table, built on first use.
pub fn default_normalizer() -> &'static CountryNormalizer {
    &EMBEDDED
}

/// Normalize with the embedded default table.
pub fn normalize_country(raw: &str) -> String {
    EMBEDDED.normalize(raw)
}

impl CountryNormalizer {
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let set = CountryRuleSet::from_toml_str(text)?;
        Self::build(&set, fingerprint(text))
    }

    /// Build from an in-memory set. The fingerprint is taken over the set
    /// serialized back to TOML, so it differs from the fingerprint of the
    /// hand-written file the set may have been parsed from.
    pub fn from_rules(set: &CountryRuleSet) -> Result<Self, RulesError> {
        set.validate()?;
        let text = toml::to_string(set).map_err(|source| RulesError::Serialize {
            table: "country",
            source,
        })?;
        Self::build(set, fingerprint(&text))
    }

    fn build(set: &CountryRuleSet, fingerprint: String) -> Result<Self, RulesError> {
        let us_self_reference = Regex::new(&set.us_self_reference)?;

        // Aliases first, then the canonical names themselves; first entry for a key wins.
        let mut exact = HashMap::new();
        let mut scan = Vec::with_capacity(set.aliases.len() + set.canonical.len());
        for (variant, target) in &set.aliases {
            let key = for_rules(variant.trim());
            exact.entry(key.clone()).or_insert_with(|| target.clone());
            scan.push((key, target.clone()));
        }
        for name in &set.canonical {
            let key = for_rules(name.trim());
            exact.entry(key.clone()).or_insert_with(|| name.clone());
            scan.push((key, name.clone()));
        }

        Ok(Self {
            us_self_reference,
            us_target: set.us_target.clone(),
            noise: set.noise.clone(),
            us_states: set.us_states.clone(),
            us_state_codes: set.us_state_codes.iter().cloned().collect(),
            us_cities: set.us_cities.clone(),
            prefixes: set.prefixes.clone(),
            exact,
            scan,
            canonical: set.canonical.clone(),
            fingerprint,
        })
    }

    /// Canonical display names, in table order.
    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.iter().any(|c| c == name)
    }

    /// blake3 of the rule text this normalizer was built from (the serialized
    /// set when built with [`from_rules`](Self::from_rules)).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_traced(raw).country
    }

    pub fn normalize_traced(&self, raw: &str) -> Normalized {
        let stripped = strip_annotations(raw);
        let cleaned = stripped.trim();

        let mut lowered = for_rules(cleaned);
        for token in &self.noise {
            lowered = lowered.replace(token.as_str(), "");
        }
        let lowered = lowered.trim();

        if lowered.is_empty() {
            return Normalized {
                country: cleaned.to_string(),
                step: NormalizeStep::Empty,
            };
        }

        match self.resolve(lowered) {
            Some((country, step)) => Normalized {
                country: country.to_string(),
                step,
            },
            None => Normalized {
                country: cleaned.to_string(),
                step: NormalizeStep::PassThrough,
            },
        }
    }

    fn resolve<'a>(&'a self, lowered: &str) -> Option<(&'a str, NormalizeStep)> {
        if self.us_self_reference.is_match(lowered) {
            return Some((self.us_target.as_str(), NormalizeStep::UsSelfReference));
        }

        let has_us_part = lowered
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .any(|part| self.is_us_part(part));
        if has_us_part {
            return Some((self.us_target.as_str(), NormalizeStep::UsPart));
        }

        let us_scan = self
            .us_states
            .iter()
            .chain(self.us_cities.iter())
            .any(|name| lowered.contains(name.as_str()));
        if us_scan {
            return Some((self.us_target.as_str(), NormalizeStep::UsScan));
        }

        if let Some(country) = self.exact.get(lowered) {
            return Some((country.as_str(), NormalizeStep::ExactAlias));
        }
        let core = self.strip_prefix(lowered);
        if let Some(country) = self.exact.get(core) {
            return Some((country.as_str(), NormalizeStep::CoreAlias));
        }

        self.scan
            .iter()
            .find(|(variant, _)| lowered.contains(variant.as_str()))
            .map(|(_, country)| (country.as_str(), NormalizeStep::AliasScan))
    }

    fn is_us_part(&self, part: &str) -> bool {
        self.us_states.iter().any(|s| s == part)
            || self.us_state_codes.contains(part)
            || self.us_cities.iter().any(|c| part.contains(c.as_str()))
    }

    fn strip_prefix<'s>(&self, lowered: &'s str) -> &'s str {
        for prefix in &self.prefixes {
            if let Some(rest) = lowered.strip_prefix(prefix.as_str()) {
                if let Some(core) = rest.strip_prefix(' ') {
                    return core;
                }
            }
        }
        lowered
    }
}
