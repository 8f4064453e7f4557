//! Configuration types for redimap.

use crate::{Error, Result};

/// Default time-to-live for new members, in seconds (one hour).
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Configuration options for a [`MultiMap`](crate::MultiMap).
///
/// # Example
///
/// ```rust
/// use redimap::Config;
///
/// let config = Config::new("sessions").ttl(600);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix used to namespace every key in the store.
    pub(crate) key_prefix: String,

    /// Seconds after which a member stops being visible. The key
    /// itself expires once this long passes without a new write.
    pub(crate) ttl: u64,
}

impl Config {
    /// Creates a new configuration with the given key prefix.
    ///
    /// All store keys produced under this configuration have the form
    /// `"{key_prefix}:{name}"`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redimap::Config;
    ///
    /// let config = Config::new("recent_logins");
    /// ```
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ttl: DEFAULT_TTL_SECS,
        }
    }

    /// Sets the time-to-live, in seconds, for inserted members.
    ///
    /// Default: [`DEFAULT_TTL_SECS`] (one hour)
    pub fn ttl(mut self, secs: u64) -> Self {
        self.ttl = secs;
        self
    }

    /// Validates the configuration.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(Error::Config("key prefix cannot be empty".into()));
        }

        if self.ttl == 0 {
            return Err(Error::Config("ttl must be at least 1 second".into()));
        }

        Ok(())
    }
}
