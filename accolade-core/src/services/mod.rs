// src/services/mod.rs

pub mod countries;    // raw-keyed rows -> per-country tallies
pub mod stats;        // classified nominations -> per-position counters and rows
pub mod variants;     // raw strings -> forward/reverse variant indexes

// Public API
pub use countries::{country_tally, CountryCount};
pub use stats::{
    classify_nominations, person_stats, position_stats, winner_rows, ClassifiedNomination,
    NominationRecord, PersonPositionRow, PersonRecord, PositionStats, StatsAggregator,
};
pub use variants::{CountryEntry, NormalizationReport, VariantIndex};
