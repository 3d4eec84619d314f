//! Concurrent, chunked retrieval.
//!
//! Turns an unbounded list of record identifiers into a bounded number of
//! network requests: [`chunk_ids`] groups ids into fixed-size batches for
//! bulk endpoints, and [`fetch_all`] runs one fetch per work unit across a
//! bounded worker pool, merging results by column-union concatenation.

pub mod chunk;
pub mod pool;

pub use chunk::{chunk_ids, Batch};
pub use pool::{fetch_all, FetchOutcome, UnitFailure};
