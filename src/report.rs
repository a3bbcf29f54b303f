//! Result Formatter: the two external shapes built from a computed ranking.
//! A JSON-serializable row list for API-style output, and a row-oriented
//! table (rank, team, manager, index, one column per stat category) for the
//! spreadsheet-style CSV export. Column ordering and number formatting only;
//! no scoring logic lives here.

use crate::power::{CategoryTable, PowerIndexResult};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use yahoo_fantasy_api::StatValue;

/// One ranked entry in API shape.
#[derive(Debug, Clone, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub team: String,
    pub manager: String,
    pub index: i64,
}

/// Row-oriented report: headers plus one row of display strings per team.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// JSON rows for an already-sorted ranking. Rank is 1-based position.
pub fn ranking_rows(results: &[PowerIndexResult]) -> Vec<RankingRow> {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| RankingRow {
            rank: i + 1,
            team: r.team().name.clone(),
            manager: r.team().manager.clone(),
            index: r.index,
        })
        .collect()
}

/// Build the tabular report. Stat columns are the union of every team's
/// categories, ordered by numeric id, so a category one team lacks still
/// gets its column (shown as "-").
pub fn report_table(
    results: &[PowerIndexResult],
    table: &CategoryTable,
    league_name: &str,
    week: u16,
    year: u16,
) -> ReportTable {
    let stat_ids = stat_columns(results);

    let mut headers = vec![
        "Rank".to_owned(),
        "Team Name".to_owned(),
        "Manager".to_owned(),
        "Power Index".to_owned(),
    ];
    headers.extend(stat_ids.iter().map(|id| table.display_name(id)));

    let rows = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let mut row = vec![
                (i + 1).to_string(),
                result.team().name.clone(),
                result.team().manager.clone(),
                format!("{:.2}", result.index as f64),
            ];
            row.extend(
                stat_ids
                    .iter()
                    .map(|id| format_stat(result.team_stats.stats.get(id))),
            );
            row
        })
        .collect();

    ReportTable {
        title: format!("{league_name} - Week {week}, {year} Power Index Report"),
        headers,
        rows,
    }
}

/// Write the report as CSV: header row then one row per team.
pub fn write_csv<W: Write>(writer: W, report: &ReportTable) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&report.headers)?;
    for row in &report.rows {
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Union of stat ids across all results, ordered by numeric id where
/// possible (string ids sort after numeric ones).
fn stat_columns(results: &[PowerIndexResult]) -> Vec<String> {
    let ids: BTreeSet<&str> = results
        .iter()
        .flat_map(|r| r.team_stats.stats.keys().map(String::as_str))
        .collect();
    let mut ids: Vec<String> = ids.into_iter().map(str::to_owned).collect();
    ids.sort_by_key(|id| (id.parse::<u32>().map_err(|_| id.clone()), id.clone()));
    ids
}

fn format_stat(value: Option<&StatValue>) -> String {
    match value {
        None => "-".to_owned(),
        Some(StatValue::Text(s)) => s.clone(),
        Some(StatValue::Number(n)) => {
            if n.fract() == 0.0 {
                format!("{n:.0}")
            } else {
                format!("{n:.2}")
            }
        }
    }
}
