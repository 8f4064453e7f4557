//! Serde support for JSON-encoded members.
//!
//! This module is only available when the `serde` feature is enabled.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};
use crate::types::{RawValue, ToMember};

/// Wrapper that stores a value as its JSON encoding.
///
/// Because the store deduplicates members by their raw bytes, two
/// values collapse into one entry exactly when their JSON encodings
/// are byte-identical.
///
/// # Example
///
/// ```rust
/// use redimap::{Config, Json, MemoryStore, MultiMap, json_cast};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Device {
///     id: u32,
///     kind: String,
/// }
///
/// let map = MultiMap::with_cast(
///     MemoryStore::new(),
///     Config::new("devices"),
///     json_cast::<Device>(),
/// )?;
///
/// map.add(
///     "alice",
///     &[Json(Device {
///         id: 7,
///         kind: "phone".into(),
///     })],
/// )?;
///
/// let devices: redimap::Result<Vec<Device>> = map.get("alice")?.collect();
/// assert_eq!(devices?[0].id, 7);
/// # Ok::<(), redimap::Error>(())
/// ```
pub struct Json<T>(pub T);

impl<T: Serialize> ToMember for Json<T> {
    fn to_member(&self) -> Result<RawValue> {
        serde_json::to_vec(&self.0).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Returns a cast function that decodes members from JSON.
///
/// Pass the result to [`MultiMap::with_cast`](crate::MultiMap::with_cast).
pub fn json_cast<T: DeserializeOwned>() -> impl Fn(&[u8]) -> Result<T> + Send + Sync + 'static {
    |raw: &[u8]| serde_json::from_slice(raw).map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        id: u32,
        name: String,
    }

    #[test]
    fn test_json_round_trip() {
        let sample = Sample {
            id: 1,
            name: "a".into(),
        };

        let raw = Json(sample).to_member().unwrap();
        let cast = json_cast::<Sample>();
        let back = cast(&raw).unwrap();
        assert_eq!(back.id, 1);
        assert_eq!(back.name, "a");
    }

    #[test]
    fn test_json_cast_rejects_garbage() {
        let cast = json_cast::<Sample>();
        let err = cast(b"not json").unwrap_err();
        assert!(err.to_string().contains("serialization"));
    }
}
