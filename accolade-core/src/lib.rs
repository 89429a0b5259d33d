//! accolade-core: rule loading, variant indexes, position statistics and
//! reports on top of the pure `rulebook` lookups.

pub mod commands;
pub mod config;
pub mod services;
pub mod utils;

pub use commands::{Engine, InitReport, ensure_initialized};
pub use config::CoreConfig;
pub use services::{
    ClassifiedNomination, CountryCount, CountryEntry, NominationRecord, NormalizationReport,
    PersonPositionRow, PersonRecord, PositionStats, StatsAggregator, VariantIndex,
};

// Re-export the lookup types callers need alongside the engine
pub use rulebook::{Classification, ClassifyRule, NormalizeStep, Normalized, PersonIdentity};
