use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::RulesError;
use crate::normalize::for_rules;

// ----------------- Country rules -----------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountryRuleSet {
    pub name: String,
    pub version: String,

    // Regex over the whole cleaned (lowercased) string
    pub us_self_reference: String,
    pub us_target: String,

    #[serde(default = "CountryRuleSet::default_noise")]
    pub noise: Vec<String>,

    // The closed set of display names every alias must point into
    pub canonical: Vec<String>,

    #[serde(default)]
    pub us_states: Vec<String>,
    #[serde(default)]
    pub us_state_codes: Vec<String>,
    #[serde(default)]
    pub us_cities: Vec<String>,

    // Governmental forms, tried in order, first one wins
    #[serde(default)]
    pub prefixes: Vec<String>,

    // (variant, canonical), order is the substring scan order
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
}

impl CountryRuleSet {
    fn default_noise() -> Vec<String> {
        vec!["unreliablesource".into(), "disputed".into(), "both".into()]
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let set: CountryRuleSet = toml::from_str(text).map_err(|source| RulesError::Parse {
            table: "country",
            source,
        })?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.canonical.is_empty() {
            return Err(RulesError::invalid("country", "canonical list is empty"));
        }
        let canonical: HashSet<&str> = self.canonical.iter().map(String::as_str).collect();
        if !canonical.contains(self.us_target.as_str()) {
            return Err(RulesError::invalid(
                "country",
                format!("us_target {:?} is not canonical", self.us_target),
            ));
        }
        for (variant, target) in &self.aliases {
            if variant.trim().is_empty() {
                return Err(RulesError::invalid("country", "alias with empty variant"));
            }
            if !canonical.contains(target.as_str()) {
                return Err(RulesError::invalid(
                    "country",
                    format!("alias {variant:?} points at non-canonical {target:?}"),
                ));
            }
        }
        let lists = [
            ("us_states", &self.us_states),
            ("us_state_codes", &self.us_state_codes),
            ("us_cities", &self.us_cities),
            ("prefixes", &self.prefixes),
            ("noise", &self.noise),
        ];
        for (label, list) in lists {
            if list.iter().any(|s| s.trim().is_empty()) {
                return Err(RulesError::invalid(
                    "country",
                    format!("{label} contains an empty entry"),
                ));
            }
            if list.iter().any(|s| for_rules(s) != *s) {
                return Err(RulesError::invalid(
                    "country",
                    format!("{label} entries must be lowercase"),
                ));
            }
        }
        Ok(())
    }
}

// ----------------- Position rules -----------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PositionRuleSet {
    pub name: String,
    pub version: String,

    // Sentinel returned when nothing resolves
    #[serde(default = "PositionRuleSet::default_fallback")]
    pub fallback: String,

    // (category keyword, position)
    #[serde(default)]
    pub categories: Vec<(String, String)>,

    #[serde(default)]
    pub heuristics: Vec<HeuristicRule>,

    #[serde(default)]
    pub overrides: Vec<IdentityOverride>,

    #[serde(default)]
    pub role_fallbacks: Vec<RoleFallback>,

    #[serde(default)]
    pub eligibility: Vec<EligibilityRule>,

    #[serde(default)]
    pub role_words: Vec<String>,
}

/// Broad-term rule: matches when any alternative has all of its terms present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeuristicRule {
    pub when: Vec<Vec<String>>,
    pub position: String,

    // (marker, position): swap the position when the marker occurs too
    #[serde(default)]
    pub feminine: Option<(String, String)>,
}

impl HeuristicRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.when.iter().any(|terms| {
            !terms.is_empty() && terms.iter().all(|t| lowered.contains(t.as_str()))
        })
    }

    pub fn resolve(&self, lowered: &str) -> &str {
        match &self.feminine {
            Some((marker, position)) if lowered.contains(marker.as_str()) => position,
            _ => &self.position,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityOverride {
    pub first_name: String,
    pub last_name: String,
    pub rules: Vec<KeywordRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordRule {
    pub any: Vec<String>,
    pub position: String,
}

impl KeywordRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.any.iter().any(|k| !k.is_empty() && lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoleFallback {
    pub role: String,
    pub any: Vec<String>,
    pub position: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EligibilityRule {
    pub role: String,
    pub patterns: Vec<String>,
}

impl PositionRuleSet {
    fn default_fallback() -> String {
        "Other".to_string()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let set: PositionRuleSet = toml::from_str(text).map_err(|source| RulesError::Parse {
            table: "position",
            source,
        })?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.fallback.trim().is_empty() {
            return Err(RulesError::invalid("position", "fallback is empty"));
        }
        for (keyword, position) in &self.categories {
            if keyword.trim().is_empty() || position.trim().is_empty() {
                return Err(RulesError::invalid(
                    "position",
                    format!("category entry {keyword:?} -> {position:?} has an empty side"),
                ));
            }
            if for_rules(keyword) != *keyword {
                return Err(RulesError::invalid(
                    "position",
                    format!("category keyword {keyword:?} must be lowercase"),
                ));
            }
        }
        for h in &self.heuristics {
            if h.position.trim().is_empty() || h.when.iter().all(|alt| alt.is_empty()) {
                return Err(RulesError::invalid(
                    "position",
                    format!("heuristic for {:?} has no terms or no position", h.position),
                ));
            }
        }
        for o in &self.overrides {
            if o.first_name.trim().is_empty() && o.last_name.trim().is_empty() {
                return Err(RulesError::invalid("position", "override without identity"));
            }
        }
        for e in &self.eligibility {
            if e.role.trim().is_empty() {
                return Err(RulesError::invalid("position", "eligibility rule without role"));
            }
            if for_rules(&e.role) != e.role {
                return Err(RulesError::invalid(
                    "position",
                    format!("eligibility role {:?} must be lowercase", e.role),
                ));
            }
        }
        Ok(())
    }
}
