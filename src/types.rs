//! Type definitions for redimap.

use crate::error::{Error, Result};

/// Raw member payload, exactly as held by the store.
pub type RawValue = Vec<u8>;

/// Read-side cast function: decodes a raw stored member into `T`.
///
/// Applied lazily while iterating a [`Values`] sequence; a failing
/// cast surfaces as [`Error::Decode`] at that point of the iteration.
pub type CastFn<T> = dyn Fn(&[u8]) -> Result<T> + Send + Sync;

/// Write-side encoding of a member into its stored representation.
///
/// Integers encode as their decimal string, matching what the default
/// read-side cast parses back. Strings and byte slices pass through
/// as-is.
pub trait ToMember {
    /// Encodes `self` into the raw stored representation.
    fn to_member(&self) -> Result<RawValue>;
}

macro_rules! impl_to_member_for_int {
    ($($t:ty),*) => {
        $(
            impl ToMember for $t {
                fn to_member(&self) -> Result<RawValue> {
                    Ok(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_to_member_for_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ToMember for &str {
    fn to_member(&self) -> Result<RawValue> {
        Ok(self.as_bytes().to_vec())
    }
}

impl ToMember for String {
    fn to_member(&self) -> Result<RawValue> {
        Ok(self.as_bytes().to_vec())
    }
}

impl ToMember for &[u8] {
    fn to_member(&self) -> Result<RawValue> {
        Ok(self.to_vec())
    }
}

impl ToMember for Vec<u8> {
    fn to_member(&self) -> Result<RawValue> {
        Ok(self.clone())
    }
}

/// The default cast: parses a stored member as a decimal integer.
pub(crate) fn parse_int(raw: &[u8]) -> Result<i64> {
    let s = std::str::from_utf8(raw).map_err(|e| Error::Decode {
        reason: format!("member is not valid UTF-8: {}", e),
    })?;
    s.parse().map_err(|e| Error::Decode {
        reason: format!("member {:?} is not an integer: {}", s, e),
    })
}

/// A sequence of decoded values for one key, from one fetched batch.
///
/// Decoding is lazy: each call to `next` runs the cast function on the
/// next raw member, so decode errors surface during iteration. The
/// sequence is a snapshot of a single store round trip; it does not
/// observe writes made after the fetch.
pub struct Values<'a, T> {
    raw: std::vec::IntoIter<RawValue>,
    cast: &'a CastFn<T>,
}

impl<'a, T> Values<'a, T> {
    pub(crate) fn new(raw: Vec<RawValue>, cast: &'a CastFn<T>) -> Self {
        Self {
            raw: raw.into_iter(),
            cast,
        }
    }

    /// Returns the number of members remaining in the sequence.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no members remain.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }
}

impl<T> Iterator for Values<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|raw| (self.cast)(&raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}

impl<T> std::fmt::Debug for Values<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Values").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_member() {
        assert_eq!(42i64.to_member().unwrap(), b"42".to_vec());
        assert_eq!((-7i32).to_member().unwrap(), b"-7".to_vec());
        assert_eq!(0u8.to_member().unwrap(), b"0".to_vec());
    }

    #[test]
    fn test_str_and_bytes_to_member() {
        assert_eq!("abc".to_member().unwrap(), b"abc".to_vec());
        assert_eq!("abc".to_string().to_member().unwrap(), b"abc".to_vec());
        assert_eq!(b"xyz".as_slice().to_member().unwrap(), b"xyz".to_vec());
        assert_eq!(vec![1u8, 2, 3].to_member().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(b"123").unwrap(), 123);
        assert_eq!(parse_int(b"-5").unwrap(), -5);

        let err = parse_int(b"abc").unwrap_err();
        assert!(err.is_decode());

        let err = parse_int(&[0xff, 0xfe]).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_values_iteration() {
        let cast: Box<CastFn<i64>> = Box::new(parse_int);
        let values = Values::new(vec![b"1".to_vec(), b"2".to_vec()], &*cast);
        assert_eq!(values.len(), 2);

        let collected: Result<Vec<i64>> = values.collect();
        assert_eq!(collected.unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_values_decode_error_is_lazy() {
        let cast: Box<CastFn<i64>> = Box::new(parse_int);
        let mut values = Values::new(vec![b"1".to_vec(), b"oops".to_vec()], &*cast);

        assert_eq!(values.next().unwrap().unwrap(), 1);
        assert!(values.next().unwrap().is_err());
        assert!(values.next().is_none());
    }

    #[test]
    fn test_values_empty() {
        let cast: Box<CastFn<i64>> = Box::new(parse_int);
        let values = Values::new(vec![], &*cast);
        assert!(values.is_empty());
    }
}
