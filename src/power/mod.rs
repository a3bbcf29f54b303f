//! Cross-team weekly ranking (power index).
//!
//! For one scoring period, every team is compared against every other team
//! in every scored stat category; each comparison contributes +1, 0 or -1
//! from the team's perspective, and the sum over all opponents and
//! categories is the team's power index. Pure computation, no I/O.

pub mod categories;

pub use categories::{CategoryTable, Polarity, StatCategory};

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use yahoo_fantasy_api::{StatValue, Team};

/// One team's raw stat readings for one league scoring period.
#[derive(Debug, Clone)]
pub struct TeamPeriodStats {
    pub team: Team,
    pub league_key: String,
    pub week: u16,
    pub year: u16,
    pub stats: BTreeMap<String, StatValue>,
}

/// Contribution of a single opponent to a team's index: the sum of that
/// team's category comparisons against this opponent.
#[derive(Debug, Clone, Serialize)]
pub struct OpponentScore {
    pub opponent_key: String,
    pub opponent_name: String,
    pub score: i64,
}

/// Ranking entry for one team: the stats it was ranked on, the computed
/// index, and the per-opponent breakdown that summed to it (always exactly
/// N-1 entries for a league of N teams).
#[derive(Debug, Clone)]
pub struct PowerIndexResult {
    pub team_stats: TeamPeriodStats,
    pub index: i64,
    pub breakdown: Vec<OpponentScore>,
}

impl PowerIndexResult {
    pub fn team(&self) -> &Team {
        &self.team_stats.team
    }
}

/// The ranking engine: an immutable category table plus the all-pairs
/// comparison algorithm.
#[derive(Debug, Clone)]
pub struct PowerIndexEngine {
    table: CategoryTable,
}

impl PowerIndexEngine {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Single-category comparison from A's perspective: +1 / 0 / -1.
    /// Absent or non-numeric readings on either side compare as 0: missing
    /// data earns no credit and no penalty. Neutral categories always 0.
    pub fn compare(&self, stat_id: &str, a: Option<f64>, b: Option<f64>) -> i64 {
        match self.table.polarity_of(stat_id) {
            Polarity::Neutral => 0,
            polarity => compare_values(polarity, a, b),
        }
    }

    /// Rank every team in a period against every other.
    ///
    /// Fewer than two teams is a degenerate input with no meaningful
    /// ranking; it returns an empty result set rather than a single
    /// zero-index row. Each team is scored over its own category list, so a
    /// category an opponent lacks contributes 0 for that pair.
    ///
    /// Sorted descending by index; the sort is stable, so equal indices
    /// keep their input order.
    pub fn compute_ranking(&self, teams: &[TeamPeriodStats]) -> Vec<PowerIndexResult> {
        if teams.len() < 2 {
            return Vec::new();
        }

        let mut results: Vec<PowerIndexResult> = teams
            .iter()
            .enumerate()
            .map(|(i, team)| {
                let mut index = 0;
                let mut breakdown = Vec::with_capacity(teams.len() - 1);

                for (j, opponent) in teams.iter().enumerate() {
                    if i == j {
                        continue;
                    }

                    let mut score = 0;
                    for (stat_id, value) in &team.stats {
                        match self.table.polarity_of(stat_id) {
                            Polarity::Neutral => continue,
                            polarity => {
                                let a = value.as_number();
                                let b = opponent
                                    .stats
                                    .get(stat_id)
                                    .and_then(StatValue::as_number);
                                score += compare_values(polarity, a, b);
                            }
                        }
                    }

                    index += score;
                    breakdown.push(OpponentScore {
                        opponent_key: opponent.team.key.clone(),
                        opponent_name: opponent.team.name.clone(),
                        score,
                    });
                }

                PowerIndexResult { team_stats: team.clone(), index, breakdown }
            })
            .collect();

        results.sort_by(|a, b| b.index.cmp(&a.index));
        results
    }
}

/// Pure pairwise comparison. Antisymmetric over numeric inputs:
/// `compare_values(p, a, b) == -compare_values(p, b, a)`.
fn compare_values(polarity: Polarity, a: Option<f64>, b: Option<f64>) -> i64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0;
    };
    let ordering = match a.partial_cmp(&b) {
        Some(ord) => ord,
        None => return 0,
    };
    let raw = match ordering {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    };
    match polarity {
        Polarity::HigherIsBetter => raw,
        Polarity::LowerIsBetter => -raw,
        Polarity::Neutral => 0,
    }
}
