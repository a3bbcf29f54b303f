use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use yahoo_fantasy_api::StatCategoryMeta;

/// Whether higher or lower raw values are favorable for a stat category.
/// `Neutral` marks informational categories (innings pitched, H/AB) that are
/// excluded from scoring entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

/// One scored (or display-only) statistic category.
#[derive(Debug, Clone)]
pub struct StatCategory {
    pub id: String,
    pub name: String,
    pub polarity: Polarity,
}

impl StatCategory {
    pub fn new(id: &str, name: &str, polarity: Polarity) -> Self {
        Self { id: id.to_owned(), name: name.to_owned(), polarity }
    }
}

/// Immutable stat-id → category lookup, injected into the engine at
/// construction. One table per league settings; never mutated mid-ranking.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    by_id: BTreeMap<String, StatCategory>,
}

impl CategoryTable {
    pub fn new(categories: impl IntoIterator<Item = StatCategory>) -> Self {
        Self {
            by_id: categories
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        }
    }

    /// Built-in table for Yahoo MLB head-to-head categories.
    pub fn mlb_default() -> Self {
        Self::new([
            StatCategory::new("3", "AVG", Polarity::HigherIsBetter),
            StatCategory::new("7", "R", Polarity::HigherIsBetter),
            StatCategory::new("12", "HR", Polarity::HigherIsBetter),
            StatCategory::new("13", "RBI", Polarity::HigherIsBetter),
            StatCategory::new("16", "SB", Polarity::HigherIsBetter),
            StatCategory::new("18", "BB", Polarity::HigherIsBetter),
            StatCategory::new("26", "ERA", Polarity::LowerIsBetter),
            StatCategory::new("27", "WHIP", Polarity::LowerIsBetter),
            StatCategory::new("39", "BBI", Polarity::LowerIsBetter),
            StatCategory::new("50", "IP", Polarity::Neutral),
            StatCategory::new("60", "H/AB", Polarity::Neutral),
        ])
    }

    /// Build a table from the game's fetched stat-category settings:
    /// display-only stats score as `Neutral`, otherwise Yahoo's sort order
    /// decides the direction.
    pub fn from_settings(settings: &[StatCategoryMeta]) -> Self {
        Self::new(settings.iter().map(|meta| {
            let polarity = if meta.display_only {
                Polarity::Neutral
            } else if meta.higher_ranks_first {
                Polarity::HigherIsBetter
            } else {
                Polarity::LowerIsBetter
            };
            StatCategory::new(&meta.id, &meta.display_name, polarity)
        }))
    }

    /// Polarity for a stat id. Unknown ids default to `HigherIsBetter`:
    /// leagues occasionally score custom categories the table has never
    /// heard of, and counting stats outnumber rate stats in every supported
    /// scoring settings list.
    pub fn polarity_of(&self, stat_id: &str) -> Polarity {
        self.by_id
            .get(stat_id)
            .map(|c| c.polarity)
            .unwrap_or(Polarity::HigherIsBetter)
    }

    /// Display name for a stat id, falling back to "Stat {id}".
    pub fn display_name(&self, stat_id: &str) -> String {
        self.by_id
            .get(stat_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Stat {stat_id}"))
    }

    pub fn get(&self, stat_id: &str) -> Option<&StatCategory> {
        self.by_id.get(stat_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
