//! The store interface consumed by the engine.
//!
//! A [`Store`] is an ordered-set database reached over some transport:
//! each key holds a set of unique raw members tagged with a numeric
//! score, the store can delete and query members by inclusive score
//! range, and it can expire a whole key at an absolute timestamp.
//!
//! Mutations are submitted as one non-transactional batch per
//! [`Store::apply`] call: the backend executes the operations in
//! submission order within a single round trip, but individual
//! operations are not rolled back if a later one fails. The engine's
//! write ordering is arranged so that every prefix of a batch leaves
//! the data in a usable state, which is what makes this contract
//! sufficient.
//!
//! All score bounds in this interface are **inclusive** and expressed
//! in whole unix seconds. The engine's one-tick threshold offsets are
//! derived from exactly these conventions; a backend with exclusive or
//! half-open range semantics, or a finer clock, must re-derive those
//! offsets rather than reuse them.

use crate::error::Result;
use crate::types::RawValue;

/// A single mutation inside a write batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Expire the whole key at `deadline` (absolute unix seconds).
    ///
    /// A no-op if the key does not exist at execution time.
    ExpireAt {
        /// The store key.
        key: String,
        /// Absolute expiration timestamp, unix seconds.
        deadline: u64,
    },

    /// Insert or update `(member, score)` pairs in the key's ordered
    /// set. Re-inserting an existing member replaces its score.
    Insert {
        /// The store key.
        key: String,
        /// Members with their scores.
        members: Vec<(RawValue, u64)>,
    },

    /// Delete every member whose score lies in `min..=max`.
    RemoveRange {
        /// The store key.
        key: String,
        /// Inclusive lower score bound.
        min: u64,
        /// Inclusive upper score bound.
        max: u64,
    },
}

/// A score-range query against one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// The store key.
    pub key: String,
    /// Inclusive lower score bound.
    pub min: u64,
    /// Inclusive upper score bound; `None` means unbounded.
    pub max: Option<u64>,
}

/// An ordered-set store with whole-key expiration.
///
/// Implementations must honor the ordered-set semantics the engine
/// relies on: members are unique per key, a duplicate insert replaces
/// the member's score, range bounds are inclusive, query results come
/// back ordered by score and then by raw member representation, and a
/// key vanishes once its expire-at deadline passes or its set becomes
/// empty.
pub trait Store {
    /// Submits `ops` as one non-transactional, non-blocking batch.
    ///
    /// Operations execute in submission order. Partial completion is
    /// possible and not reported per-operation: the call either
    /// returns `Ok(())` or fails as a whole.
    fn apply(&self, ops: &[WriteOp]) -> Result<()>;

    /// Submits `queries` as one batch and returns each query's
    /// members, in submission order.
    fn fetch(&self, queries: &[RangeQuery]) -> Result<Vec<Vec<RawValue>>>;

    /// Deletes whole keys in one call, returning how many existed.
    ///
    /// Missing keys are not an error.
    fn remove(&self, keys: &[String]) -> Result<u64>;
}

impl<S: Store + ?Sized> Store for &S {
    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        (**self).apply(ops)
    }

    fn fetch(&self, queries: &[RangeQuery]) -> Result<Vec<Vec<RawValue>>> {
        (**self).fetch(queries)
    }

    fn remove(&self, keys: &[String]) -> Result<u64> {
        (**self).remove(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_op_equality() {
        let a = WriteOp::ExpireAt {
            key: "k".into(),
            deadline: 10,
        };
        let b = WriteOp::ExpireAt {
            key: "k".into(),
            deadline: 10,
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_range_query_unbounded() {
        let q = RangeQuery {
            key: "k".into(),
            min: 5,
            max: None,
        };
        assert_eq!(q.max, None);
    }
}
