use thiserror::Error;

/// Failures while turning rule text into a usable table.
///
/// Only loading can fail. Once a table is built, every lookup is total.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to parse {table} rules: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize {table} rules: {source}")]
    Serialize {
        table: &'static str,
        #[source]
        source: toml::ser::Error,
    },

    #[error("invalid {table} rules: {reason}")]
    Invalid { table: &'static str, reason: String },

    #[error("invalid US self-reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl RulesError {
    pub(crate) fn invalid(table: &'static str, reason: impl Into<String>) -> Self {
        RulesError::Invalid {
            table,
            reason: reason.into(),
        }
    }
}
