//! Resource-specific dataset assemblers.
//!
//! Each dataset is thin glue over the core: chunk ids, fan the units out
//! through the bounded fetch pool, flatten, then decompose whichever nested
//! list the resource carries. Failures inside any concurrent dataset surface
//! in the returned [`FetchOutcome::failures`] — never silently dropped.

use std::fmt;

use serde_json::{json, Value};
use tracing::info;

use crate::client::ResourceClient;
use crate::error::Result;
use crate::fetch::{chunk_ids, fetch_all, FetchOutcome};
use crate::table::{decompose, flatten, Table};

/// Columns kept from the bulk fixtures payload; everything else on that
/// endpoint is noise for the downstream lineup/event/stat decompositions.
const RAW_STAT_COLUMNS: &[&str] = &[
    "fixture_id",
    "fixture_date",
    "events",
    "lineups",
    "statistics",
    "players",
];

/// Carry set for the second-level lineup decompositions (startXI and
/// substitutes).
const LINEUP_CARRY: &[&str] = &["fixture_id", "fixture_date", "formation", "team_id", "team_name"];

/// Tuning knobs for bulk retrieval.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Maximum ids per bulk request.
    pub chunk_size: usize,

    /// Hard cap on simultaneous in-flight requests.
    pub max_concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            chunk_size: 20,
            max_concurrency: 5,
        }
    }
}

/// One page of a paginated, per-season endpoint.
struct PageUnit {
    season: u32,
    page: u32,
}

impl fmt::Display for PageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season {} page {}", self.season, self.page)
    }
}

/// Pulls bulk historical data for one league and flattens it into tabular
/// datasets: seasons, teams, fixtures, lineups, injuries, transfers,
/// players, sidelined, coaches.
pub struct LeagueScraper<C: ResourceClient> {
    client: C,
    league_id: u32,
    config: ScrapeConfig,
    seasons: Vec<u32>,
    fixture_ids: Vec<u64>,
}

impl<C: ResourceClient> LeagueScraper<C> {
    /// Discover the league's seasons and fixture ids up front, then hand
    /// back a scraper ready to build datasets.
    ///
    /// Bootstrap is strict: a failure while discovering seasons or fixtures
    /// is an error, since every later dataset depends on them.
    pub fn bootstrap(client: C, league_id: u32, config: ScrapeConfig) -> Result<Self> {
        let seasons_table = Self::league_seasons(&client, league_id)?;
        let seasons: Vec<u32> = seasons_table
            .rows()
            .iter()
            .filter_map(|row| row.get("year").and_then(Value::as_u64))
            .map(|year| year as u32)
            .collect();
        info!(league_id, seasons = seasons.len(), "discovered seasons");

        let mut scraper = LeagueScraper {
            client,
            league_id,
            config,
            seasons,
            fixture_ids: Vec::new(),
        };

        let fixtures = scraper.fixtures()?.into_table()?;
        scraper.fixture_ids = fixtures
            .rows()
            .iter()
            .filter_map(|row| row.get("fixture_id").and_then(Value::as_u64))
            .collect();
        info!(fixtures = scraper.fixture_ids.len(), "discovered fixtures");

        Ok(scraper)
    }

    pub fn season_years(&self) -> &[u32] {
        &self.seasons
    }

    pub fn fixture_ids(&self) -> &[u64] {
        &self.fixture_ids
    }

    fn league_seasons(client: &C, league_id: u32) -> Result<Table> {
        let records = client.fetch("leagues", &[("id", league_id.to_string())])?;
        let table = flatten(&records)?;
        decompose::<&str>(&table, &[], "seasons")
    }

    /// One row per season the league has played.
    pub fn seasons(&self) -> Result<Table> {
        Self::league_seasons(&self.client, self.league_id)
    }

    /// Every country the API covers. Single unpaginated call.
    pub fn countries(&self) -> Result<Table> {
        let records = self.client.fetch("countries", &[])?;
        flatten(&records)
    }

    /// One fetch unit per season against a `league`+`season` endpoint, rows
    /// tagged with leading `league_id` and `season` provenance columns.
    fn per_season(&self, endpoint: &'static str) -> Result<FetchOutcome> {
        let outcome = fetch_all(
            self.seasons.clone(),
            |season| {
                let query = [
                    ("league", self.league_id.to_string()),
                    ("season", season.to_string()),
                ];
                let records = self.client.fetch(endpoint, &query)?;
                Ok(flatten(&records)?.with_provenance(&[
                    ("league_id", json!(self.league_id)),
                    ("season", json!(*season)),
                ]))
            },
            self.config.max_concurrency,
        )?;
        info!(endpoint, rows = outcome.table.len(), failed = outcome.failures.len(), "dataset fetched");
        Ok(outcome)
    }

    /// One row per team per season.
    pub fn teams(&self) -> Result<FetchOutcome> {
        self.per_season("teams")
    }

    /// One row per fixture per season.
    pub fn fixtures(&self) -> Result<FetchOutcome> {
        self.per_season("fixtures")
    }

    /// One row per injury report per season.
    pub fn injuries(&self) -> Result<FetchOutcome> {
        self.per_season("injuries")
    }

    /// Bulk per-fixture detail: fixture ids chunked onto the `ids=a-b-c`
    /// endpoint, reduced to the columns the lineup/event/stat datasets
    /// decompose.
    pub fn fixture_stats_raw(&self) -> Result<FetchOutcome> {
        let batches = chunk_ids(&self.fixture_ids, self.config.chunk_size)?;
        let outcome = fetch_all(
            batches,
            |batch| {
                let query = [("ids", batch.join())];
                let records = self.client.fetch("fixtures", &query)?;
                Ok(flatten(&records)?.select_columns(RAW_STAT_COLUMNS))
            },
            self.config.max_concurrency,
        )?;
        info!(rows = outcome.table.len(), failed = outcome.failures.len(), "raw fixture stats fetched");
        Ok(outcome)
    }

    /// One row per team per fixture: formation, coach, team metadata. The
    /// startXI/substitutes lists are dropped here; the dedicated datasets
    /// expand them.
    pub fn lineups_general(&self) -> Result<FetchOutcome> {
        let mut outcome = self.fixture_stats_raw()?;
        let lineups = decompose(&outcome.table, &["fixture_id", "fixture_date"], "lineups")?;
        outcome.table = lineups.drop_columns(&["startXI", "substitutes"]);
        Ok(outcome)
    }

    /// One row per starting player per team per fixture.
    pub fn lineups_start_xi(&self) -> Result<FetchOutcome> {
        self.lineup_players("startXI")
    }

    /// One row per substitute per team per fixture.
    pub fn lineups_substitutes(&self) -> Result<FetchOutcome> {
        self.lineup_players("substitutes")
    }

    fn lineup_players(&self, list_column: &str) -> Result<FetchOutcome> {
        let mut outcome = self.fixture_stats_raw()?;
        let lineups = decompose(&outcome.table, &["fixture_id", "fixture_date"], "lineups")?;
        outcome.table = decompose(&lineups, LINEUP_CARRY, list_column)?;
        Ok(outcome)
    }

    /// One row per player per season, statistics expanded: a player with
    /// stats for two clubs in one season yields two rows.
    pub fn players(&self) -> Result<FetchOutcome> {
        let mut combined = FetchOutcome::default();

        for season in &self.seasons {
            let first_page = [
                ("league", self.league_id.to_string()),
                ("season", season.to_string()),
                ("page", "1".to_string()),
            ];
            let total = self.client.total_pages("players", &first_page)?;

            let units: Vec<PageUnit> = (1..=total)
                .map(|page| PageUnit { season: *season, page })
                .collect();

            let outcome = fetch_all(
                units,
                |unit| {
                    let query = [
                        ("league", self.league_id.to_string()),
                        ("season", unit.season.to_string()),
                        ("page", unit.page.to_string()),
                    ];
                    let records = self.client.fetch("players", &query)?;
                    let table = flatten(&records)?;
                    let carry: Vec<String> = table
                        .columns()
                        .into_iter()
                        .filter(|column| column != "statistics")
                        .collect();
                    let expanded = decompose(&table, &carry, "statistics")?;
                    Ok(expanded.with_provenance(&[("season", json!(unit.season))]))
                },
                self.config.max_concurrency,
            )?;

            combined.table.append(outcome.table);
            combined.failures.extend(outcome.failures);
        }

        info!(rows = combined.table.len(), failed = combined.failures.len(), "players fetched");
        Ok(combined)
    }

    /// One row per transfer per player.
    pub fn transfers(&self, player_ids: &[u64]) -> Result<FetchOutcome> {
        let outcome = fetch_all(
            player_ids.to_vec(),
            |player| {
                let query = [("player", player.to_string())];
                let records = self.client.fetch("transfers", &query)?;
                let table = flatten(&records)?;
                decompose(&table, &["player_id", "player_name"], "transfers")
            },
            self.config.max_concurrency,
        )?;
        info!(rows = outcome.table.len(), failed = outcome.failures.len(), "transfers fetched");
        Ok(outcome)
    }

    /// One row per sidelined spell per player, tagged with the requested
    /// player id.
    pub fn sidelined(&self, player_ids: &[u64]) -> Result<FetchOutcome> {
        let outcome = fetch_all(
            player_ids.to_vec(),
            |player| {
                let query = [("player", player.to_string())];
                let records = self.client.fetch("sidelined", &query)?;
                Ok(flatten(&records)?.with_provenance(&[("player_id", json!(*player))]))
            },
            self.config.max_concurrency,
        )?;
        info!(rows = outcome.table.len(), failed = outcome.failures.len(), "sidelined fetched");
        Ok(outcome)
    }

    /// One row per career stop per coach. Career team columns land as
    /// `career_team_*` next to the coach's current `team_*` columns.
    pub fn coaches(&self, coach_ids: &[u64]) -> Result<FetchOutcome> {
        let outcome = fetch_all(
            coach_ids.to_vec(),
            |coach| {
                let query = [("id", coach.to_string())];
                let records = self.client.fetch("coachs", &query)?;
                let table = flatten(&records)?;
                let carry: Vec<String> = table
                    .columns()
                    .into_iter()
                    .filter(|column| column != "career")
                    .collect();
                decompose(&table, &carry, "career")
            },
            self.config.max_concurrency,
        )?;
        info!(rows = outcome.table.len(), failed = outcome.failures.len(), "coaches fetched");
        Ok(outcome)
    }
}
