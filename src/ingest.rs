//! Stat Ingestion Adapter: concurrent per-team stat fetch for one league
//! week. One upstream request per team, fanned out and joined; a single
//! team's failure is flagged on its entry instead of aborting the batch.
//! The exception is an expired token, which poisons every request; that
//! aborts immediately so the caller can re-authenticate.

use crate::power::TeamPeriodStats;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use yahoo_fantasy_api::client::{ApiError, YahooApi};
use yahoo_fantasy_api::{StatValue, Team};

/// Outcome of one team's weekly stat fetch.
#[derive(Debug, Clone)]
pub struct TeamFetch {
    pub team: Team,
    pub stats: BTreeMap<String, StatValue>,
    pub error: Option<String>,
}

impl TeamFetch {
    /// A fetch is usable for ranking when it succeeded and produced at
    /// least one stat reading.
    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.stats.is_empty()
    }
}

/// Fetch weekly stats for every team, concurrently. Per-team failures are
/// returned as flagged entries with empty stat maps; auth failures abort.
pub async fn fetch_week_stats(
    api: &YahooApi,
    teams: Vec<Team>,
    week: u16,
) -> Result<Vec<TeamFetch>, ApiError> {
    debug!(teams = teams.len(), week, "fanning out weekly stat fetches");

    let fetches = teams.into_iter().map(|team| async move {
        let outcome = api.fetch_team_week_stats(&team.key, week).await;
        (team, outcome)
    });
    let outcomes = join_all(fetches).await;

    let mut results = Vec::with_capacity(outcomes.len());
    for (team, outcome) in outcomes {
        match outcome {
            Ok(week_stats) => results.push(TeamFetch {
                team,
                stats: week_stats.stats,
                error: None,
            }),
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => {
                warn!(team = %team.key, error = %err, "weekly stat fetch failed");
                results.push(TeamFetch {
                    team,
                    stats: BTreeMap::new(),
                    error: Some(err.to_string()),
                });
            }
        }
    }
    Ok(results)
}

/// Keep only the usable fetches and shape them for the engine, preserving
/// fetch order (which is also the ranking tie-break order).
pub fn usable_period_stats(
    fetches: &[TeamFetch],
    league_key: &str,
    week: u16,
    year: u16,
) -> Vec<TeamPeriodStats> {
    fetches
        .iter()
        .filter(|f| f.is_usable())
        .map(|f| TeamPeriodStats {
            team: f.team.clone(),
            league_key: league_key.to_owned(),
            week,
            year,
            stats: f.stats.clone(),
        })
        .collect()
}
