//! Redis-backed [`Store`] implementation.

use std::cell::RefCell;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::store::{RangeQuery, Store, WriteOp};
use crate::types::RawValue;

/// An ordered-set store backed by Redis sorted sets.
///
/// Write batches map to EXPIREAT / ZADD / ZREMRANGEBYSCORE commands in
/// one pipeline without MULTI/EXEC, read batches to ZRANGEBYSCORE
/// pipelines, and key removal to a single DEL. All command shapes stay
/// inside this type; the engine only sees the [`Store`] interface.
///
/// Uses interior mutability to provide a clean API with `&self`
/// methods while still allowing commands on the underlying connection.
///
/// # Thread Safety
///
/// `RedisStore` is `!Sync` due to the use of `RefCell`. For
/// multi-threaded access, use one `RedisStore` per thread or wrap it
/// in a `Mutex`.
///
/// # Example
///
/// ```rust,no_run
/// use redimap::RedisStore;
///
/// let store = RedisStore::connect("redis://127.0.0.1:6379")?;
/// # Ok::<(), redimap::Error>(())
/// ```
pub struct RedisStore {
    conn: RefCell<redis::Connection>,
}

impl RedisStore {
    /// Connects to Redis at the given URL.
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| Error::Connection(e.to_string()))?;
        let conn = client
            .get_connection()
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!("connected to redis store");
        Ok(Self::new(conn))
    }

    /// Wraps an already-established connection.
    pub fn new(conn: redis::Connection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl Store for RedisStore {
    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for op in ops {
            match op {
                WriteOp::ExpireAt { key, deadline } => {
                    pipe.cmd("EXPIREAT").arg(key).arg(*deadline).ignore();
                }
                WriteOp::Insert { key, members } => {
                    pipe.cmd("ZADD").arg(key);
                    for (member, score) in members {
                        pipe.arg(*score).arg(member.as_slice());
                    }
                    pipe.ignore();
                }
                WriteOp::RemoveRange { key, min, max } => {
                    pipe.cmd("ZREMRANGEBYSCORE")
                        .arg(key)
                        .arg(*min)
                        .arg(*max)
                        .ignore();
                }
            }
        }

        trace!(ops = ops.len(), "submitting write pipeline");
        let mut conn = self.conn.borrow_mut();
        pipe.query::<()>(&mut *conn)?;
        Ok(())
    }

    fn fetch(&self, queries: &[RangeQuery]) -> Result<Vec<Vec<RawValue>>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for query in queries {
            pipe.cmd("ZRANGEBYSCORE").arg(&query.key).arg(query.min);
            match query.max {
                Some(max) => pipe.arg(max),
                None => pipe.arg("+inf"),
            };
        }

        trace!(queries = queries.len(), "submitting read pipeline");
        let mut conn = self.conn.borrow_mut();
        let results: Vec<Vec<RawValue>> = pipe.query(&mut *conn)?;
        Ok(results)
    }

    fn remove(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.borrow_mut();
        let count: u64 = redis::cmd("DEL").arg(keys).query(&mut *conn)?;
        Ok(count)
    }
}
