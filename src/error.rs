//! Error types for redimap operations.

use std::fmt;

/// Result type alias for redimap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during redimap operations.
#[derive(Debug)]
pub enum Error {
    /// A store connection error occurred.
    Connection(String),

    /// The store rejected or failed a command.
    Store(String),

    /// A stored member could not be decoded by the cast function.
    Decode {
        /// The reason decoding failed.
        reason: String,
    },

    /// Configuration error.
    Config(String),

    /// Serialization/deserialization error (with serde feature).
    #[cfg(feature = "serde")]
    Serialization(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(msg) => write!(f, "connection error: {}", msg),
            Error::Store(msg) => write!(f, "store error: {}", msg),
            Error::Decode { reason } => write!(f, "decode error: {}", reason),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            #[cfg(feature = "serde")]
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() {
            Error::Connection(err.to_string())
        } else {
            Error::Store(err.to_string())
        }
    }
}

impl Error {
    /// Returns `true` if this error is a connection error.
    #[inline]
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Returns `true` if this error came from decoding a stored member.
    #[inline]
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }

    /// Returns `true` if this error is recoverable (can retry).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection error: refused");

        let err = Error::Decode {
            reason: "not an integer".to_string(),
        };
        assert!(err.to_string().contains("decode"));

        let err = Error::Config("ttl must be at least 1".to_string());
        assert!(err.to_string().contains("configuration"));
    }

    #[test]
    fn test_error_predicates() {
        let conn = Error::Connection("lost".to_string());
        assert!(conn.is_connection());
        assert!(!conn.is_decode());
        assert!(conn.is_recoverable());

        let decode = Error::Decode {
            reason: "bad".to_string(),
        };
        assert!(decode.is_decode());
        assert!(!decode.is_recoverable());

        let store = Error::Store("wrong type".to_string());
        assert!(!store.is_connection());
        assert!(!store.is_recoverable());
    }
}
