//! Flat tables built from nested JSON records.
//!
//! A [`Table`] is the system's primary output shape: an ordered sequence of
//! rows, each a mapping from column name to value. Rows need not share
//! identical column sets; concatenation reconciles them by column union.
//!
//! Building a dataset is a two-step affair by design:
//!
//! 1. [`flatten`] walks nested *object* values eagerly and joins their key
//!    paths into flat column names, but leaves list values untouched.
//! 2. [`decompose`] expands one list-valued column into one row per element,
//!    replicating carried parent columns — paid only when and where the
//!    caller chooses.

pub mod decompose;
pub mod flatten;
pub mod types;
pub mod writer;

pub use decompose::decompose;
pub use flatten::flatten;
pub use types::{Row, Table};
pub use writer::TableWriter;
