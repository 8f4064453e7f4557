//! The multimap engine.

use tracing::debug;

use crate::clock;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{RangeQuery, Store, WriteOp};
use crate::types::{CastFn, RawValue, ToMember, Values, parse_int};

/// Separator between the configured prefix and a key name.
const KEY_SEPARATOR: char = ':';

/// A multimap with per-value expiration, backed by an ordered-set
/// [`Store`].
///
/// Each key holds a set of values, and every value carries the
/// timestamp after which it expires as its sorted-set score
/// (write time + ttl). Reads return only members whose score is still
/// in the future; writes purge members whose score has passed and
/// refresh the whole-key expiration, so stale data ages out without
/// any background sweeper.
///
/// Values are encoded on write via [`ToMember`] and decoded on read by
/// the configured cast function (default: parse as `i64`). Inserting a
/// value that is already present refreshes its expiration instead of
/// duplicating it.
///
/// # Example
///
/// ```rust
/// use redimap::{MemoryStore, MultiMap};
///
/// let map = MultiMap::new(MemoryStore::new(), "logins")?;
///
/// map.add("alice", &[1, 2, 3])?;
/// let values: redimap::Result<Vec<i64>> = map.get("alice")?.collect();
/// let mut values = values?;
/// values.sort();
/// assert_eq!(values, vec![1, 2, 3]);
/// # Ok::<(), redimap::Error>(())
/// ```
///
/// With a Redis backend:
///
/// ```rust,no_run
/// use redimap::{MultiMap, RedisStore};
///
/// let store = RedisStore::connect("redis://127.0.0.1:6379")?;
/// let map = MultiMap::new(store, "logins")?;
/// map.add("alice", &[1])?;
/// # Ok::<(), redimap::Error>(())
/// ```
pub struct MultiMap<S, T = i64> {
    store: S,
    config: Config,
    cast: Box<CastFn<T>>,
}

impl<S: Store> MultiMap<S, i64> {
    /// Creates a multimap over `store` with the given key prefix and
    /// default settings (one-hour ttl, integer values).
    pub fn new(store: S, key_prefix: impl Into<String>) -> Result<Self> {
        Self::with_config(store, Config::new(key_prefix))
    }

    /// Creates a multimap with custom configuration and the default
    /// integer cast.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{Config, MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::with_config(MemoryStore::new(), Config::new("seen").ttl(60))?;
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn with_config(store: S, config: Config) -> Result<Self> {
        Self::with_cast(store, config, parse_int)
    }
}

impl<S: Store, T> MultiMap<S, T> {
    /// Creates a multimap that decodes stored members with `cast`.
    ///
    /// The cast function receives each raw stored member during
    /// iteration of a read result; its errors propagate to the caller
    /// unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{Config, MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::with_cast(MemoryStore::new(), Config::new("tags"), |raw: &[u8]| {
    ///     String::from_utf8(raw.to_vec()).map_err(|e| redimap::Error::Decode {
    ///         reason: e.to_string(),
    ///     })
    /// })?;
    ///
    /// map.add("post", &["rust", "redis"])?;
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn with_cast<F>(store: S, config: Config, cast: F) -> Result<Self>
    where
        F: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            store,
            config,
            cast: Box::new(cast),
        })
    }

    /// Returns `name` namespaced with the configured key prefix, so
    /// every key this map touches starts the same way.
    fn key_for(&self, name: &str) -> String {
        format!("{}{}{}", self.config.key_prefix, KEY_SEPARATOR, name)
    }

    // ==================== Write Path ====================

    /// Inserts `values` at `name`, each expiring ttl seconds from now.
    ///
    /// An empty `values` slice is a valid call: nothing is inserted,
    /// but the key's expiration is still refreshed and already-expired
    /// members are still purged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::new(MemoryStore::new(), "logins")?;
    /// map.add("alice", &[1, 2])?;
    /// map.add("alice", &[2])?; // refreshes 2, no duplicate
    /// assert_eq!(map.get("alice")?.len(), 2);
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn add<V: ToMember>(&self, name: &str, values: &[V]) -> Result<()> {
        self.add_many(&[(name, values)])
    }

    /// Bulk insert: one `(name, values)` pair per key.
    ///
    /// Every value across the entire call is stamped with the same
    /// write-time expiration, captured once at entry, so the batch is
    /// internally consistent even if the call itself takes a while.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::new(MemoryStore::new(), "logins")?;
    /// map.add_many(&[("b", [4, 5, 6].as_slice()), ("c", &[7, 8, 9])])?;
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn add_many<V: ToMember>(&self, data: &[(&str, &[V])]) -> Result<()> {
        let now = clock::unix_now();
        let write_score = now + self.config.ttl;

        let mut batch = Vec::with_capacity(data.len());
        for (name, values) in data {
            let members = values
                .iter()
                .map(|value| Ok((value.to_member()?, write_score)))
                .collect::<Result<Vec<_>>>()?;
            batch.push((self.key_for(name), members));
        }

        self.write_batch(batch, now)
    }

    /// Bulk insert with a precomputed absolute expiration per value.
    ///
    /// Each entry is a `(value, expire_at)` pair, where `expire_at` is
    /// the unix second after which the value stops being visible. Meant
    /// for imports where the expiration is known per value rather than
    /// uniform; [`add_many`](Self::add_many) covers the uniform case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::new(MemoryStore::new(), "logins")?;
    /// map.add_many_at(&[("a", [(1, 1759165312), (2, 1759165400)].as_slice())])?;
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn add_many_at<V: ToMember>(&self, data: &[(&str, &[(V, u64)])]) -> Result<()> {
        let now = clock::unix_now();

        let mut batch = Vec::with_capacity(data.len());
        for (name, entries) in data {
            let members = entries
                .iter()
                .map(|(value, expire_at)| Ok((value.to_member()?, *expire_at)))
                .collect::<Result<Vec<_>>>()?;
            batch.push((self.key_for(name), members));
        }

        self.write_batch(batch, now)
    }

    /// Queues the per-key write operations and submits them as one
    /// non-transactional batch.
    ///
    /// The per-key order is deliberate: expire-at first, then the
    /// member insert, then the purge of scores `<= now`. Any prefix of
    /// this sequence leaves the key in a usable state, so a batch that
    /// only partially executes never corrupts the structure: a key that
    /// got its expiry refresh but not its values just stays alive a
    /// little longer, and a key whose purge did not run keeps stale
    /// members that the read threshold hides and the next write
    /// removes. Reordering these steps breaks that argument.
    ///
    /// Note the expire-at lands before the key's first insert ever
    /// runs, where the store treats it as a no-op; the key carries no
    /// whole-key deadline until its second write, and the read
    /// threshold alone hides its members once they lapse.
    fn write_batch(&self, batch: Vec<(String, Vec<(RawValue, u64)>)>, now: u64) -> Result<()> {
        let deadline = now + self.config.ttl + 1;

        let mut ops = Vec::with_capacity(batch.len() * 3);
        for (key, members) in batch {
            ops.push(WriteOp::ExpireAt {
                key: key.clone(),
                deadline,
            });
            if !members.is_empty() {
                ops.push(WriteOp::Insert {
                    key: key.clone(),
                    members,
                });
            }
            ops.push(WriteOp::RemoveRange {
                key,
                min: 0,
                max: now,
            });
        }

        debug!(ops = ops.len(), "submitting write batch");
        self.store.apply(&ops)
    }

    // ==================== Read Path ====================

    /// Returns the live values stored at `name`.
    ///
    /// Members whose expiration has passed are filtered out even when
    /// the store still physically holds them. A name that was never
    /// written and a name whose values all expired both yield an empty
    /// sequence; the two cases are indistinguishable.
    ///
    /// Iteration order follows the store's native ordering (score,
    /// then raw representation), not insertion order.
    pub fn get(&self, name: &str) -> Result<Values<'_, T>> {
        self.get_many(&[name])?
            .pop()
            .ok_or_else(|| Error::Store("no result returned for range query".into()))
    }

    /// Returns the live values for each of `names`, in input order.
    ///
    /// All lookups travel in one batched round trip. Each name yields
    /// its own independent sequence, empty when the name holds nothing
    /// live.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::new(MemoryStore::new(), "logins")?;
    /// map.add("a", &[1])?;
    ///
    /// let results = map.get_many(&["a", "missing"])?;
    /// assert_eq!(results.len(), 2);
    /// assert_eq!(results[0].len(), 1);
    /// assert!(results[1].is_empty());
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn get_many(&self, names: &[&str]) -> Result<Vec<Values<'_, T>>> {
        // Strictly-future scores only: a member expiring this very
        // second is already dead.
        let threshold = clock::unix_now() + 1;

        let queries: Vec<RangeQuery> = names
            .iter()
            .map(|name| RangeQuery {
                key: self.key_for(name),
                min: threshold,
                max: None,
            })
            .collect();

        debug!(keys = queries.len(), "submitting read batch");
        let results = self.store.fetch(&queries)?;
        Ok(results
            .into_iter()
            .map(|raw| Values::new(raw, &*self.cast))
            .collect())
    }

    // ==================== Deletion Path ====================

    /// Deletes `names` outright, returning how many existed.
    ///
    /// Missing names are not an error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::{MemoryStore, MultiMap};
    ///
    /// let map = MultiMap::new(MemoryStore::new(), "logins")?;
    /// map.add("a", &[1])?;
    /// map.delete(&["a", "never-written"])?;
    /// assert!(map.get("a")?.is_empty());
    /// # Ok::<(), redimap::Error>(())
    /// ```
    pub fn delete(&self, names: &[&str]) -> Result<u64> {
        if names.is_empty() {
            return Ok(0);
        }

        let keys: Vec<String> = names.iter().map(|name| self.key_for(name)).collect();
        self.store.remove(&keys)
    }

    // ==================== Accessors ====================

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
