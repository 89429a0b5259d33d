//! Position -> eligible award categories (the inverse of [`crate::category`]).
//!
//! Fail-open: a role that cannot be recognized, or whose patterns match none
//! of the supplied categories, is eligible for every category. A legitimate
//! submission is never blocked by a gap in the table.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::assets::POSITIONS_TOML;
use crate::error::RulesError;
use crate::normalize::for_rules;
use crate::types::{EligibilityRule, PositionRuleSet};

/// How a role was matched against the eligibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatch {
    Exact,
    Partial,
    RoleWord,
    Unrecognized,
}

#[derive(Debug, Clone)]
pub struct EligibilityTable {
    rules: Vec<EligibilityRule>,
    role_words: Vec<String>,
}

static EMBEDDED: Lazy<EligibilityTable> = Lazy::new(|| {
    EligibilityTable::from_toml_str(POSITIONS_TOML)
        .unwrap_or_else(|e| panic!("embedded positions.toml is invalid: {e}"))
});

pub fn default_eligibility() -> &'static EligibilityTable {
    &EMBEDDED
}

/// Eligibility lookup with the embedded default table.
pub fn eligible_categories<'a, T: AsRef<str>>(position: &str, all: &'a [T]) -> Vec<&'a T> {
    EMBEDDED.eligible_categories(position, all)
}

impl EligibilityTable {
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        Ok(Self::from_rules(&PositionRuleSet::from_toml_str(text)?))
    }

    pub fn from_rules(rules: &PositionRuleSet) -> Self {
        Self {
            rules: rules.eligibility.clone(),
            role_words: rules.role_words.iter().map(|w| for_rules(w)).collect(),
        }
    }

    /// Find the table entry for a role: exact, then partial (either side
    /// containing the other), then by a common role word.
    pub fn match_role(&self, position: &str) -> (Option<&EligibilityRule>, RoleMatch) {
        let role = for_rules(position);
        let role = role.trim();
        if role.is_empty() {
            return (None, RoleMatch::Unrecognized);
        }

        if let Some(rule) = self.rules.iter().find(|r| r.role == role) {
            return (Some(rule), RoleMatch::Exact);
        }

        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| role.contains(r.role.as_str()) || r.role.contains(role))
        {
            return (Some(rule), RoleMatch::Partial);
        }

        let by_word = self
            .role_words
            .iter()
            .filter(|w| role.contains(w.as_str()))
            .find_map(|w| self.rules.iter().find(|r| r.role.contains(w.as_str())));
        if let Some(rule) = by_word {
            return (Some(rule), RoleMatch::RoleWord);
        }

        (None, RoleMatch::Unrecognized)
    }

    /// Subset of `all` (input order kept) a holder of `position` may be
    /// nominated in. Returns all of `all` when the role is not recognized.
    pub fn eligible_categories<'a, T: AsRef<str>>(&self, position: &str, all: &'a [T]) -> Vec<&'a T> {
        let (rule, _) = self.match_role(position);
        let Some(rule) = rule else {
            return all.iter().collect();
        };

        let matched: Vec<&T> = all
            .iter()
            .filter(|c| {
                let name = for_rules(c.as_ref());
                rule.patterns.iter().any(|p| name.contains(p.as_str()))
            })
            .collect();

        if matched.is_empty() {
            all.iter().collect()
        } else {
            matched
        }
    }
}
