//! # Touchline - bulk fetch-and-flatten for football statistics
//!
//! A library for pulling paginated, deeply nested JSON resources from a
//! sports-statistics API and flattening them into flat tabular datasets
//! suitable for analysis: seasons, teams, fixtures, lineups, injuries,
//! transfers, players, coaches.
//!
//! ## Modules
//!
//! - **table**: flat tables, eager object flattening, deferred list
//!   decomposition
//! - **fetch**: id chunking and the bounded concurrent fetch pool
//! - **client**: the `ResourceClient` transport boundary and its reqwest
//!   implementation
//! - **datasets**: resource-specific assemblers gluing the core together
//!
//! ## Quick Start
//!
//! ```rust
//! use touchline::{decompose, flatten};
//! use serde_json::json;
//!
//! # fn main() -> touchline::Result<()> {
//! let records = vec![json!({
//!     "fixture": {"id": 100, "date": "2020-09-12"},
//!     "lineups": [
//!         {"team": {"id": 42}, "formation": "4-3-3"},
//!         {"team": {"id": 50}, "formation": "4-2-3-1"}
//!     ]
//! })];
//!
//! // Nested objects flatten eagerly; the lineups list stays raw
//! let table = flatten(&records)?;
//!
//! // One row per lineup, fixture columns replicated onto each
//! let lineups = decompose(&table, &["fixture_id", "fixture_date"], "lineups")?;
//! assert_eq!(lineups.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod table;

// Re-export commonly used types for convenience
pub use client::{ApiFootballClient, ResourceClient};
pub use datasets::{LeagueScraper, ScrapeConfig};
pub use error::{Error, Result};
pub use fetch::{chunk_ids, fetch_all, Batch, FetchOutcome, UnitFailure};
pub use table::{decompose, flatten, Row, Table, TableWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_then_decompose() {
        let records = vec![json!({
            "player": {"id": 7, "name": "Sterling"},
            "transfers": [
                {"date": "2022-07-28"},
                {"date": "2015-07-14"}
            ]
        })];

        let table = flatten(&records).unwrap();
        let moves = decompose(&table, &["player_id", "player_name"], "transfers").unwrap();

        assert_eq!(moves.len(), 2);
        assert_eq!(moves.rows()[0].get("player_id").unwrap(), 7);
        assert_eq!(moves.rows()[1].get("date").unwrap(), "2015-07-14");
    }
}
