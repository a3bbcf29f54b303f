mod ingest;
mod power;
mod report;

use crate::power::{CategoryTable, PowerIndexEngine, PowerIndexResult};
use anyhow::{Context, Result, bail};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yahoo_fantasy_api::client::{ApiError, YahooApi};

#[derive(Parser)]
#[command(
    name = "powerdex",
    version,
    about = "Weekly power index rankings for Yahoo fantasy baseball leagues"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the logged-in user's MLB leagues
    Leagues,
    /// List a league's teams
    Teams {
        /// League key, e.g. 431.l.12345
        #[arg(long)]
        league: String,
    },
    /// Show a team's roster
    Roster {
        /// Team key, e.g. 431.l.12345.t.3
        #[arg(long)]
        team: String,
        #[arg(long)]
        week: Option<u16>,
    },
    /// Compute the weekly power index ranking for a league
    Rank {
        #[arg(long)]
        league: String,
        /// Scoring week; defaults to the league's current week
        #[arg(long)]
        week: Option<u16>,
        /// Season year; defaults to the league's season
        #[arg(long)]
        year: Option<u16>,
        /// Emit the ranking as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Also write the full report (one column per stat category) as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let token = std::env::var("YAHOO_ACCESS_TOKEN")
        .context("YAHOO_ACCESS_TOKEN is not set; export a valid Yahoo OAuth2 access token")?;
    let api = YahooApi::new(token);

    let outcome = match cli.command {
        Command::Leagues => list_leagues(&api).await,
        Command::Teams { league } => list_teams(&api, &league).await,
        Command::Roster { team, week } => show_roster(&api, &team, week).await,
        Command::Rank { league, week, year, json, csv } => {
            rank(&api, &league, week, year, json, csv.as_deref()).await
        }
    };
    outcome.map_err(with_auth_hint)
}

/// Token expiry is an operator problem, not a data problem; say so.
fn with_auth_hint(err: anyhow::Error) -> anyhow::Error {
    if err
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_auth)
    {
        err.context("Yahoo session expired; re-authenticate and update YAHOO_ACCESS_TOKEN")
    } else {
        err
    }
}

async fn list_leagues(api: &YahooApi) -> Result<()> {
    let leagues = api.fetch_user_leagues().await?;
    if leagues.is_empty() {
        println!("No MLB leagues found for this account.");
        return Ok(());
    }
    for league in leagues {
        let season = league
            .season
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_owned());
        let teams = league
            .num_teams
            .map(|n| format!("{n} teams"))
            .unwrap_or_default();
        println!(
            "{:<16} {:<32} season {season}  {} {}",
            league.key,
            league.name,
            teams,
            league.scoring_type.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn list_teams(api: &YahooApi, league_key: &str) -> Result<()> {
    let teams = api.fetch_league_teams(league_key).await?;
    if teams.is_empty() {
        bail!("league {league_key} has no teams");
    }
    for team in teams {
        println!("{:<20} {:<28} {}", team.key, team.name, team.manager);
    }
    Ok(())
}

async fn show_roster(api: &YahooApi, team_key: &str, week: Option<u16>) -> Result<()> {
    let roster = api.fetch_roster(team_key, week).await?;
    if roster.is_empty() {
        println!("No roster data for {team_key}.");
        return Ok(());
    }
    for slot in roster {
        let pos = slot.selected_position.unwrap_or_else(|| slot.position.clone());
        println!("{:<4} {}", pos, slot.name);
    }
    Ok(())
}

async fn rank(
    api: &YahooApi,
    league_key: &str,
    week: Option<u16>,
    year: Option<u16>,
    json: bool,
    csv_path: Option<&Path>,
) -> Result<()> {
    let league = api.fetch_league(league_key).await?;
    let week = week
        .or(league.current_week)
        .context("league has no current week; pass --week")?;
    let year = year
        .or(league.season)
        .unwrap_or_else(|| Utc::now().year() as u16);

    let teams = api.fetch_league_teams(league_key).await?;
    if teams.is_empty() {
        bail!("league {league_key} has no teams");
    }

    let fetches = ingest::fetch_week_stats(api, teams, week).await?;
    // "no data retrievable" is an error; "ranking empty" below is not.
    if fetches.iter().all(|f| f.error.is_some()) {
        bail!("could not retrieve stats for any team in {league_key}, week {week}");
    }

    let table = load_category_table(api).await?;
    let engine = PowerIndexEngine::new(table);

    let period_stats = ingest::usable_period_stats(&fetches, &league.key, week, year);
    let results = engine.compute_ranking(&period_stats);

    if results.is_empty() {
        println!(
            "No ranking available for {} week {week}: need at least two teams with usable stats.",
            league.name
        );
        return Ok(());
    }

    if json {
        let rows = report::ranking_rows(&results);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_ranking(&results);
    }

    if let Some(path) = csv_path {
        let report = report::report_table(&results, engine.table(), &league.name, week, year);
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        report::write_csv(file, &report)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

/// Prefer the game's own scoring settings for polarity; fall back to the
/// built-in MLB table when the settings endpoint is unavailable.
async fn load_category_table(api: &YahooApi) -> Result<CategoryTable> {
    match api.fetch_stat_categories("mlb").await {
        Ok(settings) if !settings.is_empty() => Ok(CategoryTable::from_settings(&settings)),
        Ok(_) => Ok(CategoryTable::mlb_default()),
        Err(err) if err.is_auth() => Err(err.into()),
        Err(err) => {
            warn!(error = %err, "stat category settings unavailable, using built-in MLB table");
            Ok(CategoryTable::mlb_default())
        }
    }
}

fn print_ranking(results: &[PowerIndexResult]) {
    println!(
        "{:>4}  {:<28} {:<20} {:>11}",
        "Rank", "Team", "Manager", "Power Index"
    );
    for (i, result) in results.iter().enumerate() {
        println!(
            "{:>4}  {:<28} {:<20} {:>11.2}",
            i + 1,
            result.team().name,
            result.team().manager,
            result.index as f64
        );
    }
}
