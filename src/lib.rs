//! # redimap - Expiring Multimap on Redis Sorted Sets
//!
//! A multimap (one key, many values) where every inserted value
//! carries an expiration, backed by Redis sorted sets. Values fall out
//! of reads the moment their time-to-live passes, and an idle key
//! disappears entirely once its newest value has expired — all without
//! a background cleanup job.
//!
//! ## Features
//!
//! - **Per-value expiration**: each value is scored with the timestamp
//!   after which it expires; reads only ever return live values
//! - **No sweeper process**: expired values are purged opportunistically
//!   on every write, and the key itself rides Redis's native TTL
//! - **Batched I/O**: multi-key reads and writes travel as one
//!   pipelined, non-transactional round trip
//! - **Pluggable store**: the engine drives anything implementing the
//!   [`Store`] trait; [`RedisStore`] for production, [`MemoryStore`]
//!   for tests and local development
//! - **Typed values**: integers by default, anything else via a custom
//!   cast function, JSON via the optional `serde` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redimap::{MultiMap, RedisStore};
//!
//! let store = RedisStore::connect("redis://127.0.0.1:6379")?;
//! let map = MultiMap::new(store, "recent_logins")?;
//!
//! // One key, many values
//! map.add("alice", &[101, 102])?;
//! map.add_many(&[("bob", [201].as_slice()), ("carol", &[301, 302])])?;
//!
//! // Only values younger than the ttl come back
//! for value in map.get("alice")? {
//!     println!("device: {}", value?);
//! }
//!
//! // Multi-key read in one round trip, results in input order
//! let all = map.get_many(&["alice", "bob", "carol"])?;
//!
//! map.delete(&["alice"])?;
//! # Ok::<(), redimap::Error>(())
//! ```
//!
//! ## How It Works
//!
//! Values live in one sorted set per key:
//!
//! ```text
//! prefix:key1 -> { (score1, value1), (score2, value2), ... }
//! prefix:key2 -> { (score3, value3), ... }
//! ```
//!
//! A value's score is the unix second after which it is expired
//! (write time + ttl), so the read path asks the store for scores
//! strictly beyond now, and the write path deletes scores up through
//! now while refreshing the whole key's expiration one tick past the
//! newest score. Re-adding a value that is already present bumps its
//! score instead of duplicating it, which is precisely the sorted-set
//! update rule.
//!
//! Each write submits its steps in one non-transactional pipeline,
//! ordered so that a partially applied batch still leaves the key
//! usable. There is deliberately no distinction between a key that
//! never existed and one whose values all expired: both read as empty.
//!
//! ## Custom Value Types
//!
//! ```rust
//! use redimap::{Config, MemoryStore, MultiMap};
//!
//! let map = MultiMap::with_cast(MemoryStore::new(), Config::new("tags"), |raw: &[u8]| {
//!     String::from_utf8(raw.to_vec()).map_err(|e| redimap::Error::Decode {
//!         reason: e.to_string(),
//!     })
//! })?;
//!
//! map.add("post:7", &["rust", "redis"])?;
//! # Ok::<(), redimap::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

mod clock;
mod config;
mod error;
mod memory_store;
mod multimap;
mod redis_store;
mod store;
mod types;

#[cfg(feature = "serde")]
mod serde_support;

pub use config::{Config, DEFAULT_TTL_SECS};
pub use error::{Error, Result};
pub use memory_store::MemoryStore;
pub use multimap::MultiMap;
pub use redis_store::RedisStore;
pub use store::{RangeQuery, Store, WriteOp};
pub use types::{CastFn, RawValue, ToMember, Values};

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use serde_support::{Json, json_cast};

/// Prelude module for convenient imports.
///
/// ```rust,no_run
/// use redimap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, DEFAULT_TTL_SECS};
    pub use crate::error::{Error, Result};
    pub use crate::memory_store::MemoryStore;
    pub use crate::multimap::MultiMap;
    pub use crate::redis_store::RedisStore;
    pub use crate::store::{RangeQuery, Store, WriteOp};
    pub use crate::types::{CastFn, RawValue, ToMember, Values};

    #[cfg(feature = "serde")]
    pub use crate::serde_support::{Json, json_cast};
}
