use std::fmt;

use crate::error::{Error, Result};

/// Join separator the bulk fixtures endpoint expects between ids.
const ID_JOIN: &str = "-";

/// An ordered, bounded-size group of identifiers destined for one bulk
/// request.
///
/// The serialized form (ids joined with `-`) is an output format contract:
/// the remote endpoint requires it verbatim in its `ids` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    ids: Vec<String>,
}

impl Batch {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The bulk-endpoint wire form, e.g. `"101-102-103"`.
    pub fn join(&self) -> String {
        self.ids.join(ID_JOIN)
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ids {}", self.join())
    }
}

/// Partition ids into contiguous batches of at most `size`, preserving
/// order. The last batch may be smaller. A zero `size` is a configuration
/// error.
pub fn chunk_ids<T: ToString>(ids: &[T], size: usize) -> Result<Vec<Batch>> {
    if size == 0 {
        return Err(Error::Config("chunk size must be greater than zero".to_string()));
    }

    Ok(ids
        .chunks(size)
        .map(|group| Batch {
            ids: group.iter().map(|id| id.to_string()).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coverage() {
        let ids: Vec<u64> = (1..=47).collect();
        let batches = chunk_ids(&ids, 20).unwrap();

        // ceil(47 / 20) batches, all but the last full
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 20);
        assert_eq!(batches[1].len(), 20);
        assert_eq!(batches[2].len(), 7);

        // Concatenating all batches reconstructs the original list
        let rejoined: Vec<String> = batches.iter().flat_map(|b| b.ids().to_vec()).collect();
        let expected: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn test_join_format() {
        let batches = chunk_ids(&[101u64, 102, 103], 20).unwrap();
        assert_eq!(batches[0].join(), "101-102-103");
    }

    #[test]
    fn test_zero_size_is_config_error() {
        let err = chunk_ids(&[1u64, 2], 0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_ids_yield_no_batches() {
        let batches = chunk_ids::<u64>(&[], 20).unwrap();
        assert!(batches.is_empty());
    }
}
