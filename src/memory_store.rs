//! In-process [`Store`] implementation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::clock;
use crate::error::Result;
use crate::store::{RangeQuery, Store, WriteOp};
use crate::types::RawValue;

#[derive(Debug, Default)]
struct KeyEntry {
    /// member -> score; a duplicate insert replaces the score.
    members: HashMap<RawValue, u64>,
    /// Absolute whole-key expiration, unix seconds.
    deadline: Option<u64>,
}

/// An in-memory ordered-set store with the same observable semantics
/// as [`RedisStore`](crate::RedisStore): duplicate-member score
/// replacement, inclusive score ranges, results ordered by score then
/// raw member, expire-at that ignores missing keys, lazy eviction of
/// keys past their deadline, and removal of keys whose set drains
/// empty.
///
/// Useful for tests, benchmarks, and local development where no Redis
/// server is available. Not a cache for production use: everything
/// lives on the heap of the current process.
///
/// # Example
///
/// ```rust
/// use redimap::{MemoryStore, MultiMap};
///
/// let map = MultiMap::new(MemoryStore::new(), "sessions")?;
/// map.add("alice", &[1, 2, 3])?;
/// # Ok::<(), redimap::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: Mutex<HashMap<String, KeyEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops `key` if its whole-key deadline has passed, mirroring the
    /// lazy expiration a real server performs on access.
    fn evict_if_due(keys: &mut HashMap<String, KeyEntry>, key: &str, now: u64) {
        if let Some(entry) = keys.get(key) {
            if entry.deadline.is_some_and(|deadline| now >= deadline) {
                keys.remove(key);
            }
        }
    }
}

impl Store for MemoryStore {
    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock::unix_now();

        for op in ops {
            match op {
                WriteOp::ExpireAt { key, deadline } => {
                    Self::evict_if_due(&mut keys, key, now);
                    // Like EXPIREAT: only an existing key takes a deadline.
                    if let Some(entry) = keys.get_mut(key) {
                        entry.deadline = Some(*deadline);
                    }
                }
                WriteOp::Insert { key, members } => {
                    Self::evict_if_due(&mut keys, key, now);
                    let entry = keys.entry(key.clone()).or_default();
                    for (member, score) in members {
                        entry.members.insert(member.clone(), *score);
                    }
                }
                WriteOp::RemoveRange { key, min, max } => {
                    Self::evict_if_due(&mut keys, key, now);
                    if let Some(entry) = keys.get_mut(key) {
                        entry
                            .members
                            .retain(|_, score| *score < *min || *score > *max);
                        if entry.members.is_empty() {
                            keys.remove(key);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn fetch(&self, queries: &[RangeQuery]) -> Result<Vec<Vec<RawValue>>> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock::unix_now();

        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            Self::evict_if_due(&mut keys, &query.key, now);

            let mut members: Vec<(u64, RawValue)> = keys
                .get(&query.key)
                .map(|entry| {
                    entry
                        .members
                        .iter()
                        .filter(|(_, score)| {
                            **score >= query.min && query.max.is_none_or(|max| **score <= max)
                        })
                        .map(|(member, score)| (*score, member.clone()))
                        .collect()
                })
                .unwrap_or_default();

            members.sort();
            results.push(members.into_iter().map(|(_, member)| member).collect());
        }

        Ok(results)
    }

    fn remove(&self, names: &[String]) -> Result<u64> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock::unix_now();

        let mut removed = 0;
        for key in names {
            Self::evict_if_due(&mut keys, key, now);
            if keys.remove(key).is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
