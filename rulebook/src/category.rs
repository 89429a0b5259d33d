//! Award-category -> crew position classification.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::assets::{fingerprint, POSITIONS_TOML};
use crate::error::RulesError;
use crate::normalize::for_rules;
use crate::types::PositionRuleSet;

/// Who a nomination belongs to, for the identity-keyed override table only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdentity {
    pub first_name: String,
    pub last_name: String,
}

impl PersonIdentity {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    fn is(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.trim().eq_ignore_ascii_case(first_name.trim())
            && self.last_name.trim().eq_ignore_ascii_case(last_name.trim())
    }
}

/// The rule family that settled a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyRule {
    ExactKeyword,
    KeywordScan,
    OnlyKnownPosition,
    Heuristic,
    IdentityOverride,
    KnownRole,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub position: String,
    pub rule: ClassifyRule,
}

/// Compiled, read-only form of the classifying half of a [`PositionRuleSet`].
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: PositionRuleSet,
    exact: HashMap<String, String>,
    fingerprint: String,
}

static EMBEDDED: Lazy<CategoryClassifier> = Lazy::new(|| {
    CategoryClassifier::from_toml_str(POSITIONS_TOML)
        .unwrap_or_else(|e| panic!("embedded positions.toml is invalid: {e}"))
});

/// Classifier over the embedded default table, built on first use.
pub fn default_classifier() -> &'static CategoryClassifier {
    &EMBEDDED
}

/// Classify with the embedded default table.
pub fn classify_category(
    category_name: &str,
    known_positions: &[String],
    person: Option<&PersonIdentity>,
) -> String {
    EMBEDDED.classify(category_name, known_positions, person)
}

impl CategoryClassifier {
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let rules = PositionRuleSet::from_toml_str(text)?;
        Ok(Self::build(rules, fingerprint(text)))
    }

    /// Fingerprinted over `rules` serialized back to TOML.
    pub fn from_rules(rules: PositionRuleSet) -> Result<Self, RulesError> {
        rules.validate()?;
        let text = toml::to_string(&rules).map_err(|source| RulesError::Serialize {
            table: "position",
            source,
        })?;
        Ok(Self::build(rules, fingerprint(&text)))
    }

    fn build(rules: PositionRuleSet, fingerprint: String) -> Self {
        let mut exact = HashMap::new();
        for (keyword, position) in &rules.categories {
            exact
                .entry(keyword.clone())
                .or_insert_with(|| position.clone());
        }
        Self {
            rules,
            exact,
            fingerprint,
        }
    }

    pub fn rules(&self) -> &PositionRuleSet {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.rules.fallback
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn classify(
        &self,
        category_name: &str,
        known_positions: &[String],
        person: Option<&PersonIdentity>,
    ) -> String {
        self.classify_traced(category_name, known_positions, person)
            .position
    }

    /// Same as [`classify`](Self::classify), also reporting which rule decided.
    pub fn classify_traced(
        &self,
        category_name: &str,
        known_positions: &[String],
        person: Option<&PersonIdentity>,
    ) -> Classification {
        let lowered = for_rules(category_name);
        let lowered = lowered.trim();

        // 1) whole-name keyword
        if let Some(position) = self.exact.get(lowered) {
            return hit(position, ClassifyRule::ExactKeyword);
        }

        // 2) keyword contained in the name, table order
        if let Some((_, position)) = self
            .rules
            .categories
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
        {
            return hit(position, ClassifyRule::KeywordScan);
        }

        // 3) a person with a single known role
        if let Some(only) = single_position(known_positions) {
            return hit(only, ClassifyRule::OnlyKnownPosition);
        }

        // 4) broad terms
        if let Some(h) = self.rules.heuristics.iter().find(|h| h.matches(lowered)) {
            return hit(h.resolve(lowered), ClassifyRule::Heuristic);
        }

        // 5) identity patches; a listed person never reaches the role fallbacks
        if let Some(person) = person {
            let mut listed = self
                .rules
                .overrides
                .iter()
                .filter(|o| person.is(&o.first_name, &o.last_name))
                .peekable();
            if listed.peek().is_some() {
                let patched = listed
                    .flat_map(|o| o.rules.iter())
                    .find(|r| r.matches(lowered));
                return match patched {
                    Some(rule) => hit(&rule.position, ClassifyRule::IdentityOverride),
                    None => hit(&self.rules.fallback, ClassifyRule::IdentityOverride),
                };
            }
        }

        // 6-7) roles the person already holds
        if let Some(fb) = self.rules.role_fallbacks.iter().find(|fb| {
            known_positions.iter().any(|p| p == &fb.role)
                && fb.any.iter().any(|k| lowered.contains(k.as_str()))
        }) {
            return hit(&fb.position, ClassifyRule::KnownRole);
        }

        hit(&self.rules.fallback, ClassifyRule::Fallback)
    }
}

fn hit(position: &str, rule: ClassifyRule) -> Classification {
    Classification {
        position: position.to_string(),
        rule,
    }
}

fn single_position(known_positions: &[String]) -> Option<&str> {
    let distinct: HashSet<&str> = known_positions
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if distinct.len() == 1 {
        distinct.into_iter().next()
    } else {
        None
    }
}
