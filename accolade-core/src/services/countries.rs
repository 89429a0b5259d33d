// src/services/countries.rs
//! Per-country tallies over rows still keyed by raw country strings.

use rulebook::CountryNormalizer;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Sum `(raw country, count)` rows per canonical country, largest first,
/// ties by name, cut to `limit`.
pub fn country_tally<I, S>(normalizer: &CountryNormalizer, rows: I, limit: usize) -> Vec<CountryCount>
where
    I: IntoIterator<Item = (S, u64)>,
    S: AsRef<str>,
{
    let mut sums: BTreeMap<String, u64> = BTreeMap::new();
    for (raw, count) in rows {
        let raw = raw.as_ref();
        let country = normalizer.normalize(raw);
        if country.is_empty() {
            continue;
        }
        if country != raw {
            tracing::debug!(raw, country = %country, "tally folded variant");
        }
        *sums.entry(country).or_default() += count;
    }

    let mut out: Vec<CountryCount> = sums
        .into_iter()
        .map(|(country, count)| CountryCount { country, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    out.truncate(limit);
    out
}
