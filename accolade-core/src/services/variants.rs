// src/services/variants.rs
//! Raw country strings -> forward (raw -> canonical) and reverse
//! (canonical -> raw variants) indexes, for pickers and per-country lookups.
//!
//! Nothing here writes back to the record store; callers keep querying by
//! the original raw values.

use rulebook::normalize_for_rules;
use rulebook::CountryNormalizer;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Picker row: one canonical country and the raw spellings folded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryEntry {
    pub country: String,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantIndex {
    /// raw -> canonical, only where the two differ
    pub forward: BTreeMap<String, String>,
    /// canonical -> distinct raw strings in first-seen order, canonical excluded
    pub reverse: BTreeMap<String, Vec<String>>,
    // canonicals that were observed verbatim
    #[serde(skip)]
    verbatim: BTreeSet<String>,
}

impl VariantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate<I, S>(normalizer: &CountryNormalizer, raws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for raw in raws {
            index.insert(normalizer, raw.as_ref());
        }
        index
    }

    /// Fold one raw string in. Blank input, and input that normalizes to
    /// nothing, is skipped.
    pub fn insert(&mut self, normalizer: &CountryNormalizer, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let canonical = normalizer.normalize(raw);
        if canonical.is_empty() {
            return;
        }
        self.record(raw, &canonical);
    }

    fn record(&mut self, raw: &str, canonical: &str) {
        let variants = self.reverse.entry(canonical.to_string()).or_default();
        if raw == canonical {
            self.verbatim.insert(canonical.to_string());
            return;
        }
        if !variants.iter().any(|v| v == raw) {
            variants.push(raw.to_string());
        }
        self.forward
            .entry(raw.to_string())
            .or_insert_with(|| canonical.to_string());
    }

    /// Combine two partial indexes. Either merge order yields the same
    /// entries; variant lists keep `self`'s order first.
    pub fn merge(&mut self, other: VariantIndex) {
        for (canonical, variants) in other.reverse {
            if variants.is_empty() {
                self.reverse.entry(canonical).or_default();
                continue;
            }
            for raw in variants {
                self.record(&raw, &canonical);
            }
        }
        self.verbatim.extend(other.verbatim);
    }

    /// Distinct raw strings folded in so far.
    pub fn unique_inputs(&self) -> usize {
        self.forward.len() + self.verbatim.len()
    }

    /// Raw strings that did not already read as their canonical form.
    pub fn normalized_count(&self) -> usize {
        self.forward.len()
    }

    pub fn canonical_count(&self) -> usize {
        self.reverse.len()
    }

    /// One row per canonical country, ordered by name (case-insensitive).
    pub fn catalog(&self) -> Vec<CountryEntry> {
        let mut rows: Vec<CountryEntry> = self
            .reverse
            .iter()
            .map(|(country, variants)| CountryEntry {
                country: country.clone(),
                variants: variants.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            normalize_for_rules(&a.country)
                .cmp(&normalize_for_rules(&b.country))
                .then_with(|| a.country.cmp(&b.country))
        });
        rows
    }

    /// Every observed raw string that lands on the same canonical country
    /// as `query`, the canonical spelling first when it was seen verbatim.
    pub fn variants_of(&self, normalizer: &CountryNormalizer, query: &str) -> Vec<String> {
        let canonical = normalizer.normalize(query);
        if canonical.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        if self.verbatim.contains(&canonical) {
            out.push(canonical.clone());
        }
        if let Some(variants) = self.reverse.get(&canonical) {
            out.extend(variants.iter().cloned());
        }
        out
    }
}

/// Serializable summary of one aggregation pass.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationReport {
    pub message: String,
    pub normalized_countries: BTreeMap<String, String>,
    pub country_variations: BTreeMap<String, Vec<String>>,
    pub unique_countries: usize,
    pub normalized_count: usize,
    pub canonical_count: usize,
    pub rules_fingerprint: String,
}

impl NormalizationReport {
    pub fn from_index(index: &VariantIndex, rules_fingerprint: &str) -> Self {
        let unique = index.unique_inputs();
        let normalized = index.normalized_count();
        Self {
            message: format!(
                "Normalized {normalized} country names out of {unique} unique countries. No records were modified."
            ),
            normalized_countries: index.forward.clone(),
            country_variations: index.reverse.clone(),
            unique_countries: unique,
            normalized_count: normalized,
            canonical_count: index.canonical_count(),
            rules_fingerprint: rules_fingerprint.to_string(),
        }
    }
}
