use crate::wire::{
    FantasyResponse, WireCategoryStat, WireLeague, WirePlayer, WireTeam, WireTeamStats,
};
use crate::{League, RosterSlot, StatCategoryMeta, StatValue, Team, TeamWeekStats};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const YAHOO_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

/// Yahoo Fantasy Sports API client. Carries a ready OAuth2 access token;
/// acquiring or refreshing that token is the caller's concern.
#[derive(Debug, Clone)]
pub struct YahooApi {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// 401 from Yahoo: the access token is expired or revoked. Surfaced as
    /// its own variant so batch callers can abort early instead of flagging
    /// every team fetch with the same doomed failure.
    TokenExpired,
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::TokenExpired => write!(f, "Yahoo access token expired"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::TokenExpired)
    }
}

impl YahooApi {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("powerdex/0.1 (fantasy power index)")
                .build()
                .unwrap_or_default(),
            base_url: YAHOO_BASE_URL.to_owned(),
            token: access_token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point the client at a different base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the MLB leagues the logged-in user belongs to.
    pub async fn fetch_user_leagues(&self) -> ApiResult<Vec<League>> {
        let raw: FantasyResponse = self
            .get("/users;use_login=1/games;game_codes=mlb/leagues")
            .await?;
        let users = raw
            .fantasy_content
            .unwrap_or_default()
            .users
            .unwrap_or_default();

        let mut leagues = Vec::new();
        for user in users.user.into_vec() {
            let games = user.games.unwrap_or_default().game.into_vec();
            for game in games {
                let entries = game.leagues.unwrap_or_default().league.into_vec();
                leagues.extend(entries.into_iter().filter_map(map_league));
            }
        }
        Ok(leagues)
    }

    /// Fetch one league's metadata (name, season, team count).
    pub async fn fetch_league(&self, league_key: &str) -> ApiResult<League> {
        let raw: FantasyResponse = self
            .get(&format!("/league/{league_key}/metadata"))
            .await?;
        raw.fantasy_content
            .unwrap_or_default()
            .league
            .and_then(map_league)
            .ok_or_else(|| ApiError::NotFound(format!("league {league_key}")))
    }

    /// Fetch all teams in a league.
    pub async fn fetch_league_teams(&self, league_key: &str) -> ApiResult<Vec<Team>> {
        let raw: FantasyResponse = self.get(&format!("/league/{league_key}/teams")).await?;
        let teams = raw
            .fantasy_content
            .unwrap_or_default()
            .league
            .unwrap_or_default()
            .teams
            .unwrap_or_default()
            .team
            .into_vec();
        Ok(teams.into_iter().filter_map(map_team).collect())
    }

    /// Fetch one team's raw stat readings for a scoring week.
    pub async fn fetch_team_week_stats(
        &self,
        team_key: &str,
        week: u16,
    ) -> ApiResult<TeamWeekStats> {
        let raw: FantasyResponse = self
            .get(&format!("/team/{team_key}/stats;type=week;week={week}"))
            .await?;
        let team = raw
            .fantasy_content
            .unwrap_or_default()
            .team
            .ok_or_else(|| ApiError::NotFound(format!("team {team_key}")))?;
        Ok(map_team_week_stats(team_key, week, team))
    }

    /// Fetch the game's stat-category scoring settings.
    pub async fn fetch_stat_categories(&self, game_code: &str) -> ApiResult<Vec<StatCategoryMeta>> {
        let raw: FantasyResponse = self
            .get(&format!("/game/{game_code}/stat_categories"))
            .await?;
        let stats = raw
            .fantasy_content
            .unwrap_or_default()
            .game
            .unwrap_or_default()
            .stat_categories
            .unwrap_or_default()
            .stats
            .unwrap_or_default()
            .stat
            .into_vec();
        Ok(stats.into_iter().filter_map(map_stat_category).collect())
    }

    /// Fetch a team's roster, optionally for a specific week.
    pub async fn fetch_roster(
        &self,
        team_key: &str,
        week: Option<u16>,
    ) -> ApiResult<Vec<RosterSlot>> {
        let week_param = week.map(|w| format!(";week={w}")).unwrap_or_default();
        let raw: FantasyResponse = self
            .get(&format!("/team/{team_key}/roster{week_param}"))
            .await?;
        let players = raw
            .fantasy_content
            .unwrap_or_default()
            .team
            .unwrap_or_default()
            .roster
            .unwrap_or_default()
            .players
            .unwrap_or_default()
            .player
            .into_vec();
        Ok(players.into_iter().filter_map(map_roster_slot).collect())
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::TokenExpired);
        }

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: Yahoo wire types → clean domain types
// ---------------------------------------------------------------------------

/// Yahoo ids/flags arrive as strings in XML-translated payloads and as
/// numbers from the native JSON endpoint; normalise both to a string key.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag_is_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn map_league(raw: WireLeague) -> Option<League> {
    let key = raw.league_key?;
    Some(League {
        key,
        name: raw.name.unwrap_or_default(),
        season: raw.season.and_then(|s| s.parse().ok()),
        num_teams: raw.num_teams.and_then(|n| n.parse().ok()),
        scoring_type: raw.scoring_type,
        current_week: raw.current_week.and_then(|w| w.parse().ok()),
    })
}

fn map_team(raw: WireTeam) -> Option<Team> {
    let key = raw.team_key?;

    let manager = raw
        .managers
        .unwrap_or_default()
        .manager
        .into_vec()
        .into_iter()
        .find_map(|m| m.nickname)
        .unwrap_or_else(|| "N/A".to_owned());

    let logos = raw.team_logos.unwrap_or_default().team_logo.into_vec();
    let logo_url = logos
        .iter()
        .find(|l| l.size.as_deref() == Some("large"))
        .and_then(|l| l.url.clone())
        .or_else(|| logos.into_iter().find_map(|l| l.url));

    Some(Team {
        key,
        id: raw.team_id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        manager,
        logo_url,
    })
}

/// Build the stat-id → value map for one team-week. Readings with no id are
/// dropped; readings whose value is null are treated as absent rather than
/// zero, so a missing number never wins or loses a comparison downstream.
fn map_team_week_stats(team_key: &str, week: u16, raw: WireTeam) -> TeamWeekStats {
    let team_stats: WireTeamStats = raw.team_stats.unwrap_or_default();
    let week = team_stats
        .week
        .as_deref()
        .and_then(|w| w.parse().ok())
        .unwrap_or(week);

    let mut stats = BTreeMap::new();
    for stat in team_stats.stats.unwrap_or_default().stat.into_vec() {
        let Some(id) = stat.stat_id.as_ref().and_then(value_to_string) else {
            continue;
        };
        let Some(value) = stat.value.as_ref().and_then(parse_stat_value) else {
            continue;
        };
        stats.insert(id, value);
    }

    TeamWeekStats {
        team_key: raw.team_key.unwrap_or_else(|| team_key.to_owned()),
        week,
        stats,
    }
}

fn parse_stat_value(value: &Value) -> Option<StatValue> {
    match value {
        Value::String(s) => Some(StatValue::parse(s)),
        Value::Number(n) => {
            let n = n.as_f64()?;
            n.is_finite().then_some(StatValue::Number(n))
        }
        _ => None,
    }
}

fn map_stat_category(raw: WireCategoryStat) -> Option<StatCategoryMeta> {
    let id = raw.stat_id.as_ref().and_then(value_to_string)?;
    let name = raw.name.unwrap_or_default();
    let display_name = raw.display_name.unwrap_or_else(|| name.clone());
    Some(StatCategoryMeta {
        id,
        name,
        display_name,
        higher_ranks_first: flag_is_set(raw.sort_order.as_ref()),
        display_only: flag_is_set(raw.is_only_display_stat.as_ref()),
    })
}

fn map_roster_slot(raw: WirePlayer) -> Option<RosterSlot> {
    let player_key = raw.player_key?;
    let name = raw
        .name
        .and_then(|n| n.full)
        .unwrap_or_else(|| "Unknown".to_owned());
    Some(RosterSlot {
        player_key,
        name,
        position: raw.display_position.unwrap_or_default(),
        selected_position: raw.selected_position.and_then(|p| p.position),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{
        OneOrMany, WireManager, WireManagers, WireStat, WireStats, WireTeamLogo, WireTeamLogos,
    };
    use serde_json::json;

    fn wire_team(key: &str) -> WireTeam {
        WireTeam {
            team_key: Some(key.to_owned()),
            team_id: Some("3".to_owned()),
            name: Some("Bash Brothers".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn map_team_defaults_missing_manager_to_na() {
        let team = map_team(wire_team("431.l.1.t.3")).unwrap();
        assert_eq!(team.manager, "N/A");
        assert_eq!(team.name, "Bash Brothers");
    }

    #[test]
    fn map_team_takes_first_manager_nickname() {
        let mut raw = wire_team("431.l.1.t.3");
        raw.managers = Some(WireManagers {
            manager: OneOrMany::Many(vec![
                WireManager { nickname: None, ..Default::default() },
                WireManager { nickname: Some("Sam".to_owned()), ..Default::default() },
            ]),
        });
        assert_eq!(map_team(raw).unwrap().manager, "Sam");
    }

    #[test]
    fn map_team_prefers_large_logo() {
        let mut raw = wire_team("431.l.1.t.3");
        raw.team_logos = Some(WireTeamLogos {
            team_logo: OneOrMany::Many(vec![
                WireTeamLogo { size: Some("small".into()), url: Some("s.png".into()) },
                WireTeamLogo { size: Some("large".into()), url: Some("l.png".into()) },
            ]),
        });
        assert_eq!(map_team(raw).unwrap().logo_url.as_deref(), Some("l.png"));
    }

    #[test]
    fn map_team_without_key_is_dropped() {
        assert!(map_team(WireTeam::default()).is_none());
    }

    #[test]
    fn week_stats_parse_mixed_values() {
        let mut raw = wire_team("431.l.1.t.3");
        raw.team_stats = Some(WireTeamStats {
            coverage_type: Some("week".into()),
            week: Some("5".into()),
            stats: Some(WireStats {
                stat: OneOrMany::Many(vec![
                    WireStat { stat_id: Some(json!("7")), value: Some(json!("35")) },
                    WireStat { stat_id: Some(json!(26)), value: Some(json!(3.86)) },
                    WireStat { stat_id: Some(json!("3")), value: Some(json!("-")) },
                    WireStat { stat_id: Some(json!("27")), value: Some(json!(null)) },
                    WireStat { stat_id: None, value: Some(json!("9")) },
                ]),
            }),
        });

        let stats = map_team_week_stats("431.l.1.t.3", 1, raw);
        assert_eq!(stats.week, 5, "week from payload wins over the fallback");
        assert_eq!(stats.stats.get("7"), Some(&StatValue::Number(35.0)));
        assert_eq!(stats.stats.get("26"), Some(&StatValue::Number(3.86)));
        assert_eq!(stats.stats.get("3"), Some(&StatValue::Text("-".into())));
        assert!(!stats.stats.contains_key("27"), "null readings are absent, not zero");
        assert_eq!(stats.stats.len(), 3);
    }

    #[test]
    fn stat_category_sort_order_maps_to_direction() {
        let higher = map_stat_category(WireCategoryStat {
            stat_id: Some(json!("12")),
            name: Some("Home Runs".into()),
            display_name: Some("HR".into()),
            sort_order: Some(json!("1")),
            is_only_display_stat: None,
        })
        .unwrap();
        assert!(higher.higher_ranks_first);
        assert!(!higher.display_only);

        let lower = map_stat_category(WireCategoryStat {
            stat_id: Some(json!(26)),
            name: Some("Earned Run Average".into()),
            display_name: None,
            sort_order: Some(json!(0)),
            is_only_display_stat: Some(json!("1")),
        })
        .unwrap();
        assert!(!lower.higher_ranks_first);
        assert!(lower.display_only);
        assert_eq!(lower.display_name, "Earned Run Average");
    }

    // -----------------------------------------------------------------------
    // HTTP round trips against a local mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_league_teams_handles_single_team_object() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "fantasy_content": {
                "league": {
                    "league_key": "431.l.1",
                    "name": "Tiny League",
                    "teams": {
                        "count": "1",
                        "team": {
                            "team_key": "431.l.1.t.1",
                            "team_id": "1",
                            "name": "Lone Wolves",
                            "managers": { "manager": { "nickname": "Ana" } }
                        }
                    }
                }
            }
        });
        let mock = server
            .mock("GET", "/league/431.l.1/teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = YahooApi::new("token").with_base_url(server.url());
        let teams = api.fetch_league_teams("431.l.1").await.unwrap();
        mock.assert_async().await;

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].key, "431.l.1.t.1");
        assert_eq!(teams[0].manager, "Ana");
    }

    #[tokio::test]
    async fn fetch_team_week_stats_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "fantasy_content": {
                "team": {
                    "team_key": "431.l.1.t.2",
                    "name": "Night Owls",
                    "team_stats": {
                        "coverage_type": "week",
                        "week": "7",
                        "stats": {
                            "stat": [
                                { "stat_id": "12", "value": "9" },
                                { "stat_id": "26", "value": "4.25" }
                            ]
                        }
                    }
                }
            }
        });
        let mock = server
            .mock("GET", "/team/431.l.1.t.2/stats;type=week;week=7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = YahooApi::new("token").with_base_url(server.url());
        let stats = api.fetch_team_week_stats("431.l.1.t.2", 7).await.unwrap();
        mock.assert_async().await;

        assert_eq!(stats.team_key, "431.l.1.t.2");
        assert_eq!(stats.week, 7);
        assert_eq!(stats.stats.get("12"), Some(&StatValue::Number(9.0)));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_token_expired() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/431.l.1/teams")
            .with_status(401)
            .with_body(r#"{"error":{"description":"token_expired"}}"#)
            .create_async()
            .await;

        let api = YahooApi::new("stale").with_base_url(server.url());
        let err = api.fetch_league_teams("431.l.1").await.unwrap_err();
        assert!(err.is_auth(), "401 must surface as TokenExpired, got {err}");
    }

    #[tokio::test]
    async fn fetch_stat_categories_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "fantasy_content": {
                "game": {
                    "game_key": "mlb",
                    "stat_categories": {
                        "stats": {
                            "stat": [
                                { "stat_id": "12", "name": "Home Runs", "display_name": "HR", "sort_order": "1" },
                                { "stat_id": "26", "name": "Earned Run Average", "display_name": "ERA", "sort_order": "0" },
                                { "stat_id": "50", "name": "Innings Pitched", "display_name": "IP", "sort_order": "1", "is_only_display_stat": "1" }
                            ]
                        }
                    }
                }
            }
        });
        let _mock = server
            .mock("GET", "/game/mlb/stat_categories")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = YahooApi::new("token").with_base_url(server.url());
        let categories = api.fetch_stat_categories("mlb").await.unwrap();
        assert_eq!(categories.len(), 3);
        assert!(categories[0].higher_ranks_first);
        assert!(!categories[1].higher_ranks_first);
        assert!(categories[2].display_only);
    }
}
