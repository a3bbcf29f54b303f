//! Yahoo Fantasy Sports raw wire types — serde shapes for the `fantasy_content`
//! envelope as it arrives after the upstream XML-to-JSON translation.
//! These map to our clean domain types via the mapping fns in client.rs.
//!
//! Yahoo collections are duck-typed: a sub-resource with one element is a bare
//! object, the same sub-resource with several is an array. `OneOrMany` absorbs
//! that here so nothing downstream ever branches on shape.

use serde::Deserialize;
use serde_json::Value;

/// A Yahoo collection value: a single object or an array of them.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FantasyResponse {
    pub fantasy_content: Option<FantasyContent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FantasyContent {
    pub users: Option<WireUsers>,
    pub league: Option<WireLeague>,
    pub team: Option<WireTeam>,
    pub game: Option<WireGame>,
}

// ---------------------------------------------------------------------------
// Users → games → leagues  (league discovery)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireUsers {
    #[serde(default)]
    pub user: OneOrMany<WireUser>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireUser {
    pub guid: Option<String>,
    pub games: Option<WireGames>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireGames {
    #[serde(default)]
    pub game: OneOrMany<WireGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireGame {
    pub game_key: Option<String>,
    pub code: Option<String>,
    pub season: Option<String>,
    pub leagues: Option<WireLeagues>,
    pub stat_categories: Option<WireStatCategories>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLeagues {
    #[serde(default)]
    pub league: OneOrMany<WireLeague>,
}

// ---------------------------------------------------------------------------
// League + teams
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLeague {
    pub league_key: Option<String>,
    pub league_id: Option<String>,
    pub name: Option<String>,
    pub season: Option<String>,
    pub num_teams: Option<String>,
    pub scoring_type: Option<String>,
    pub current_week: Option<String>,
    pub teams: Option<WireTeams>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeams {
    #[serde(default)]
    pub team: OneOrMany<WireTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub team_key: Option<String>,
    pub team_id: Option<String>,
    pub name: Option<String>,
    pub managers: Option<WireManagers>,
    pub team_logos: Option<WireTeamLogos>,
    pub team_stats: Option<WireTeamStats>,
    pub roster: Option<WireRoster>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireManagers {
    #[serde(default)]
    pub manager: OneOrMany<WireManager>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireManager {
    pub manager_id: Option<String>,
    pub nickname: Option<String>,
    pub guid: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamLogos {
    #[serde(default)]
    pub team_logo: OneOrMany<WireTeamLogo>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamLogo {
    pub size: Option<String>,
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Weekly team stats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamStats {
    pub coverage_type: Option<String>,
    pub week: Option<String>,
    pub stats: Option<WireStats>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStats {
    #[serde(default)]
    pub stat: OneOrMany<WireStat>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStat {
    pub stat_id: Option<Value>, // string in XML-translated payloads, number otherwise
    pub value: Option<Value>,
}

// ---------------------------------------------------------------------------
// Game stat-category settings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStatCategories {
    pub stats: Option<WireCategoryStats>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCategoryStats {
    #[serde(default)]
    pub stat: OneOrMany<WireCategoryStat>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCategoryStat {
    pub stat_id: Option<Value>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    /// "1" = higher values rank first, "0" = lower values rank first.
    pub sort_order: Option<Value>,
    pub is_only_display_stat: Option<Value>,
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireRoster {
    pub coverage_type: Option<String>,
    pub week: Option<String>,
    pub players: Option<WirePlayers>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayers {
    #[serde(default)]
    pub player: OneOrMany<WirePlayer>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayer {
    pub player_key: Option<String>,
    pub name: Option<WirePlayerName>,
    pub display_position: Option<String>,
    pub selected_position: Option<WireSelectedPosition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayerName {
    pub full: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireSelectedPosition {
    pub position: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_accepts_single_object() {
        let json = r#"{"team": {"team_key": "431.l.1.t.1", "name": "Solo"}}"#;
        let teams: WireTeams = serde_json::from_str(json).unwrap();
        let teams = teams.team.into_vec();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_key.as_deref(), Some("431.l.1.t.1"));
    }

    #[test]
    fn one_or_many_accepts_array() {
        let json = r#"{"team": [{"team_key": "431.l.1.t.1"}, {"team_key": "431.l.1.t.2"}]}"#;
        let teams: WireTeams = serde_json::from_str(json).unwrap();
        assert_eq!(teams.team.into_vec().len(), 2);
    }

    #[test]
    fn missing_collection_defaults_to_empty() {
        let teams: WireTeams = serde_json::from_str("{}").unwrap();
        assert!(teams.team.into_vec().is_empty());
    }

    #[test]
    fn stat_values_survive_both_string_and_number_payloads() {
        let json = r#"{"stat": [{"stat_id": "7", "value": "35"}, {"stat_id": 26, "value": 3.86}]}"#;
        let stats: WireStats = serde_json::from_str(json).unwrap();
        let stats = stats.stat.into_vec();
        assert_eq!(stats.len(), 2);
        assert!(stats[0].stat_id.as_ref().unwrap().is_string());
        assert!(stats[1].value.as_ref().unwrap().is_number());
    }
}
