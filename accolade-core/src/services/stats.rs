// src/services/stats.rs
//! Per-position nomination/win counters and the statistics rows built on them.

use rulebook::{CategoryClassifier, ClassifyRule, PersonIdentity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing;

// ----------- Input records -----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominationRecord {
    pub category_name: String,
    #[serde(default)]
    pub won: bool,
}

/// A person with the crew positions they are credited with and their nominations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub nominations: Vec<NominationRecord>,
}

impl PersonRecord {
    /// First, middle and last name joined by single spaces, blanks skipped.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.middle_name.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ]
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn identity(&self) -> PersonIdentity {
        PersonIdentity::new(self.first_name.clone(), self.last_name.clone())
    }

    pub fn has_win(&self) -> bool {
        self.nominations.iter().any(|n| n.won)
    }
}

// ----------- Classified output -----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedNomination {
    pub person_id: i64,
    pub category_name: String,
    pub position: String,
    pub rule: ClassifyRule,
    pub won: bool,
}

/// Classify every nomination of `person` against its known positions.
pub fn classify_nominations(
    classifier: &CategoryClassifier,
    person: &PersonRecord,
) -> Vec<ClassifiedNomination> {
    let identity = person.identity();
    person
        .nominations
        .iter()
        .map(|nom| {
            let c = classifier.classify_traced(&nom.category_name, &person.positions, Some(&identity));
            tracing::debug!(
                person_id = person.id,
                category = %nom.category_name,
                position = %c.position,
                rule = ?c.rule,
                "classified nomination"
            );
            ClassifiedNomination {
                person_id: person.id,
                category_name: nom.category_name.clone(),
                position: c.position,
                rule: c.rule,
                won: nom.won,
            }
        })
        .collect()
}

// ----------- Aggregation -----------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub nominations_count: u32,
    pub oscars_won: u32,
}

impl PositionStats {
    pub fn record(&mut self, won: bool) {
        self.nominations_count += 1;
        if won {
            self.oscars_won += 1;
        }
    }

    pub fn merge(&mut self, other: PositionStats) {
        self.nominations_count += other.nominations_count;
        self.oscars_won += other.oscars_won;
    }
}

/// Position -> counters. Keyed in a sorted map so any input order folds
/// and serializes identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsAggregator {
    by_position: BTreeMap<String, PositionStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold<'a, I>(nominations: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedNomination>,
    {
        let mut agg = Self::new();
        for nom in nominations {
            agg.record(&nom.position, nom.won);
        }
        agg
    }

    /// Ensure a zero row exists for `position`.
    pub fn seed(&mut self, position: &str) {
        self.by_position.entry(position.to_string()).or_default();
    }

    pub fn record(&mut self, position: &str, won: bool) {
        self.by_position
            .entry(position.to_string())
            .or_default()
            .record(won);
    }

    pub fn merge(&mut self, other: StatsAggregator) {
        for (position, stats) in other.by_position {
            self.by_position.entry(position).or_default().merge(stats);
        }
    }

    pub fn get(&self, position: &str) -> Option<&PositionStats> {
        self.by_position.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PositionStats)> {
        self.by_position.iter().map(|(p, s)| (p.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, PositionStats> {
        self.by_position
    }
}

// ----------- Report rows -----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPositionRow {
    pub person_id: i64,
    pub full_name: String,
    pub position: String,
    pub nominations_count: u32,
    pub oscars_won: u32,
}

impl PersonPositionRow {
    fn new(person: &PersonRecord, full_name: &str, position: &str, stats: PositionStats) -> Self {
        Self {
            person_id: person.id,
            full_name: full_name.to_string(),
            position: position.to_string(),
            nominations_count: stats.nominations_count,
            oscars_won: stats.oscars_won,
        }
    }
}

/// Most wins first, then most nominations, then by name for a stable order.
fn by_rank(a: &PersonPositionRow, b: &PersonPositionRow) -> Ordering {
    b.oscars_won
        .cmp(&a.oscars_won)
        .then_with(|| b.nominations_count.cmp(&a.nominations_count))
        .then_with(|| a.full_name.cmp(&b.full_name))
        .then_with(|| a.person_id.cmp(&b.person_id))
        .then_with(|| a.position.cmp(&b.position))
}

/// Known positions seeded at zero, plus every classified nomination.
pub fn position_stats(classifier: &CategoryClassifier, person: &PersonRecord) -> StatsAggregator {
    let mut agg = StatsAggregator::fold(&classify_nominations(classifier, person));
    for pos in person.positions.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        agg.seed(pos);
    }
    agg
}

/// Rows for one person. With `position_filter` only that position is
/// returned, as a zero row when the person has nothing for it. Never empty.
pub fn person_stats(
    classifier: &CategoryClassifier,
    person: &PersonRecord,
    position_filter: Option<&str>,
    default_position: &str,
) -> Vec<PersonPositionRow> {
    let agg = position_stats(classifier, person);
    let full_name = person.full_name();

    let mut rows: Vec<PersonPositionRow> = match position_filter {
        Some(position) => {
            let stats = agg.get(position).copied().unwrap_or_default();
            vec![PersonPositionRow::new(person, &full_name, position, stats)]
        }
        None => agg
            .iter()
            .map(|(position, stats)| PersonPositionRow::new(person, &full_name, position, *stats))
            .collect(),
    };
    rows.sort_by(by_rank);

    if rows.is_empty() {
        rows.push(PersonPositionRow::new(
            person,
            &full_name,
            default_position,
            PositionStats::default(),
        ));
    }
    rows
}

/// Rows across everyone with at least one win, keeping only positions
/// with nominations.
pub fn winner_rows(classifier: &CategoryClassifier, people: &[PersonRecord]) -> Vec<PersonPositionRow> {
    let mut rows = Vec::new();
    for person in people.iter().filter(|p| p.has_win()) {
        let full_name = person.full_name();
        let agg = position_stats(classifier, person);
        rows.extend(
            agg.iter()
                .filter(|(_, stats)| stats.nominations_count > 0)
                .map(|(position, stats)| PersonPositionRow::new(person, &full_name, position, *stats)),
        );
    }
    rows.sort_by(by_rank);
    rows
}
