//! touchline: pull flat tabular datasets from the api-football API
//!
//! Usage:
//!   # Teams for every season of the Premier League, to stdout
//!   API_FOOTBALL_KEY=... touchline --league 39 --dataset teams
//!
//!   # Starting lineups for every fixture, to a file
//!   API_FOOTBALL_KEY=... touchline --league 39 --dataset lineups-start-xi -o starters.jsonl
//!
//!   # Transfer history for specific players
//!   API_FOOTBALL_KEY=... touchline --league 39 --dataset transfers --ids 7,1100,2295

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use touchline::{ApiFootballClient, FetchOutcome, LeagueScraper, ScrapeConfig, Table, TableWriter};

#[derive(Parser, Debug)]
#[command(name = "touchline")]
#[command(about = "Pull flat tabular datasets from the api-football API", long_about = None)]
struct Args {
    /// League id to scrape (e.g. 39 for the Premier League)
    #[arg(long)]
    league: u32,

    /// Dataset to build
    #[arg(long, value_enum)]
    dataset: Dataset,

    /// Output file for JSON Lines (stdout if omitted)
    #[arg(long, short = 'o')]
    out: Option<String>,

    /// Comma-separated player ids (transfers, sidelined) or coach ids (coaches)
    #[arg(long)]
    ids: Option<String>,

    /// Maximum ids per bulk request (default: 20)
    #[arg(long, default_value_t = 20)]
    chunk_size: usize,

    /// Maximum simultaneous in-flight requests (default: 5)
    #[arg(long, default_value_t = 5)]
    concurrency: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Dataset {
    Seasons,
    Countries,
    Teams,
    Fixtures,
    FixtureStats,
    LineupsGeneral,
    LineupsStartXi,
    LineupsSubstitutes,
    Injuries,
    Players,
    Transfers,
    Sidelined,
    Coaches,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let api_key = std::env::var("API_FOOTBALL_KEY")
        .context("API_FOOTBALL_KEY environment variable is not set")?;
    let client = ApiFootballClient::new(api_key);
    let config = ScrapeConfig {
        chunk_size: args.chunk_size,
        max_concurrency: args.concurrency,
    };

    let scraper = LeagueScraper::bootstrap(client, args.league, config)
        .context("Failed to bootstrap league metadata")?;

    let table = match args.dataset {
        Dataset::Seasons => scraper.seasons()?,
        Dataset::Countries => scraper.countries()?,
        Dataset::Teams => report(scraper.teams()?)?,
        Dataset::Fixtures => report(scraper.fixtures()?)?,
        Dataset::FixtureStats => report(scraper.fixture_stats_raw()?)?,
        Dataset::LineupsGeneral => report(scraper.lineups_general()?)?,
        Dataset::LineupsStartXi => report(scraper.lineups_start_xi()?)?,
        Dataset::LineupsSubstitutes => report(scraper.lineups_substitutes()?)?,
        Dataset::Injuries => report(scraper.injuries()?)?,
        Dataset::Players => report(scraper.players()?)?,
        Dataset::Transfers => report(scraper.transfers(&required_ids(&args)?)?)?,
        Dataset::Sidelined => report(scraper.sidelined(&required_ids(&args)?)?)?,
        Dataset::Coaches => report(scraper.coaches(&required_ids(&args)?)?)?,
    };

    write_table(&table, args.out.as_deref())
}

/// Surface the per-unit failure report, failing hard only when nothing
/// succeeded at all.
fn report(outcome: FetchOutcome) -> Result<Table> {
    for failure in &outcome.failures {
        warn!(unit = %failure.unit, error = %failure.error, "fetch unit failed");
    }
    if outcome.is_total_failure() {
        bail!("every fetch unit failed ({} failures)", outcome.failures.len());
    }
    Ok(outcome.table)
}

fn required_ids(args: &Args) -> Result<Vec<u64>> {
    let raw = args
        .ids
        .as_deref()
        .context("--ids is required for this dataset")?;
    raw.split(',')
        .map(|id| {
            id.trim()
                .parse::<u64>()
                .with_context(|| format!("invalid id '{}'", id))
        })
        .collect()
}

fn write_table(table: &Table, out: Option<&str>) -> Result<()> {
    if let Some(path) = out {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
        let mut writer = TableWriter::new(file);
        writer.write_table(table)?;
        writer.flush()?;
    } else {
        let stdout = std::io::stdout();
        let mut writer = TableWriter::new(stdout.lock());
        writer.write_table(table)?;
        writer.flush()?;
    }
    Ok(())
}
