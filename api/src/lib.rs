pub mod client;
pub mod wire;

use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Yahoo wire format
// ---------------------------------------------------------------------------

/// One fantasy league the authenticated user belongs to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct League {
    pub key: String, // e.g. "431.l.12345"
    pub name: String,
    pub season: Option<u16>,
    pub num_teams: Option<u32>,
    pub scoring_type: Option<String>,
    pub current_week: Option<u16>,
}

/// One team in a league, with its manager identity for display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Team {
    pub key: String, // e.g. "431.l.12345.t.3"
    pub id: String,
    pub name: String,
    pub manager: String,
    pub logo_url: Option<String>,
}

/// A raw statistic reading. Yahoo reports values as strings; readings that
/// parse as numbers are kept numeric, everything else ("-", "INF", "N/A")
/// is kept verbatim so callers can still display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => StatValue::Number(n),
            _ => StatValue::Text(trimmed.to_owned()),
        }
    }

    /// Numeric view; `None` for text readings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One team's raw stat readings for one scoring period, keyed by stat id.
#[derive(Debug, Clone, Default)]
pub struct TeamWeekStats {
    pub team_key: String,
    pub week: u16,
    pub stats: BTreeMap<String, StatValue>,
}

/// Stat-category metadata from the game's scoring settings.
#[derive(Debug, Clone, Default)]
pub struct StatCategoryMeta {
    pub id: String,
    pub name: String,
    pub display_name: String,
    /// true = higher values rank first (Yahoo sort_order "1").
    pub higher_ranks_first: bool,
    /// Informational stats (e.g. innings pitched) that never score.
    pub display_only: bool,
}

/// One roster slot for a team in a given week.
#[derive(Debug, Clone, Default)]
pub struct RosterSlot {
    pub player_key: String,
    pub name: String,
    pub position: String,
    pub selected_position: Option<String>,
}
