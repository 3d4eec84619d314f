use std::fmt;

use crossbeam::channel;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::table::Table;

/// One work unit's recorded failure: the unit's display form plus the error
/// that terminated it. No retry, no backoff — a failed unit is terminal.
#[derive(Debug)]
pub struct UnitFailure {
    pub unit: String,
    pub error: Error,
}

/// Result of a concurrent fetch: the merged table plus a per-unit failure
/// report.
///
/// The failure policy here is collect-and-report: failed units never vanish
/// silently, they land in `failures` alongside whatever partial table the
/// surviving units produced. An empty table with a non-empty report is
/// therefore distinguishable from "legitimately no data" (both empty).
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub table: Table,
    pub failures: Vec<UnitFailure>,
}

impl FetchOutcome {
    /// True when nothing succeeded and at least one unit failed.
    pub fn is_total_failure(&self) -> bool {
        self.table.is_empty() && !self.failures.is_empty()
    }

    /// Collapse into a plain table, failing if any unit failed.
    pub fn into_table(self) -> Result<Table> {
        if let Some(first) = self.failures.first() {
            return Err(Error::transport(format!(
                "{} fetch unit(s) failed, first: {}: {}",
                self.failures.len(),
                first.unit,
                first.error
            )));
        }
        Ok(self.table)
    }
}

/// Run `fetch_one` over every unit across a bounded worker pool and merge
/// the resulting tables by column-union concatenation.
///
/// At most `max_concurrency` invocations are in flight at any instant; the
/// pool size is a hard cap. Results merge in completion order, so row order
/// across units is not stable — callers recover logical grouping through
/// provenance columns. Within one unit's own table the source payload order
/// is preserved.
///
/// Each worker's partial table stays private until the single collector
/// thread merges it: fan-out over a work channel, fan-in over a results
/// channel, no shared mutable accumulator.
pub fn fetch_all<U, F>(units: Vec<U>, fetch_one: F, max_concurrency: usize) -> Result<FetchOutcome>
where
    U: fmt::Display + Send,
    F: Fn(&U) -> Result<Table> + Send + Sync,
{
    if max_concurrency == 0 {
        return Err(Error::Config("max concurrency must be greater than zero".to_string()));
    }
    if units.is_empty() {
        return Ok(FetchOutcome::default());
    }

    let workers = max_concurrency.min(units.len());
    debug!(units = units.len(), workers, "starting fetch pool");

    let (work_tx, work_rx) = channel::unbounded::<U>();
    for unit in units {
        // Receiver is alive for the whole scope; send cannot fail here
        let _ = work_tx.send(unit);
    }
    drop(work_tx);

    let (result_tx, result_rx) = channel::unbounded::<(String, Result<Table>)>();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let fetch_one = &fetch_one;
            scope.spawn(move || {
                while let Ok(unit) = work_rx.recv() {
                    let label = unit.to_string();
                    let result = fetch_one(&unit);
                    if result_tx.send((label, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        // Single collecting path: merge in completion order
        let mut outcome = FetchOutcome::default();
        for (unit, result) in result_rx.iter() {
            match result {
                Ok(table) => outcome.table.append(table),
                Err(error) => {
                    warn!(unit = %unit, error = %error, "fetch unit failed");
                    outcome.failures.push(UnitFailure { unit, error });
                }
            }
        }
        Ok(outcome)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::flatten;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn one_row(unit: u32) -> Result<Table> {
        flatten(&[json!({ "unit": unit })])
    }

    #[test]
    fn test_merges_every_unit() {
        let outcome = fetch_all((1u32..=8).collect(), |u| one_row(*u), 3).unwrap();

        assert_eq!(outcome.table.len(), 8);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_concurrency_cap_is_hard() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let outcome = fetch_all(
            (1u32..=20).collect(),
            |u| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(10));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                one_row(*u)
            },
            5,
        )
        .unwrap();

        assert_eq!(outcome.table.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 5);
    }

    #[test]
    fn test_failed_unit_is_reported_not_dropped() {
        let outcome = fetch_all(
            vec![1u32, 2, 3],
            |u| {
                if *u == 2 {
                    Err(Error::transport("connection reset"))
                } else {
                    one_row(*u)
                }
            },
            3,
        )
        .unwrap();

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].unit, "2");
        assert!(matches!(outcome.failures[0].error, Error::Transport(_)));
        assert!(!outcome.is_total_failure());
    }

    #[test]
    fn test_total_failure_is_distinguishable_from_no_data() {
        let all_failed = fetch_all(
            vec![1u32, 2],
            |_| -> Result<Table> { Err(Error::transport("down")) },
            2,
        )
        .unwrap();
        assert!(all_failed.is_total_failure());
        assert!(all_failed.into_table().is_err());

        let no_units = fetch_all(Vec::<u32>::new(), |u| one_row(*u), 2).unwrap();
        assert!(!no_units.is_total_failure());
        assert!(no_units.into_table().unwrap().is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_config_error() {
        let err = fetch_all(vec![1u32], |u| one_row(*u), 0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_column_union_across_units() {
        let outcome = fetch_all(
            vec![1u32, 2],
            |u| {
                if *u == 1 {
                    flatten(&[json!({"a": 1, "b": 2})])
                } else {
                    flatten(&[json!({"b": 3, "c": 4})])
                }
            },
            2,
        )
        .unwrap();

        let mut columns = outcome.table.columns();
        columns.sort();
        assert_eq!(columns, vec!["a", "b", "c"]);
        assert_eq!(outcome.table.len(), 2);
    }
}
