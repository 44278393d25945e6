//! # Payload Field Decoding
//!
//! Module collaborators receive untyped JSON payloads and usually only need a
//! single known field out of them (`{"balance-flow": 120}`). The helpers here
//! decode the payload in place with `serde-json-core`, without allocating, and
//! hand back a typed value.
//!
//! Only the keys of the top-level object are searched. Values under other keys
//! are skipped unread, but must still be well-formed JSON.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::error::FieldError;

/// Extract the value of `key` from a JSON object payload as `T`.
///
/// Any type that implements `serde::Deserialize` can be read: integers,
/// floats, `bool`, or a derived struct for a nested object. The first
/// occurrence of a duplicated key wins.
///
/// ```
/// use mote_session::util::json_field;
/// use mote_session::error::FieldError;
///
/// let payload = br#"{"balance-flow": -250, "open": true}"#;
/// assert_eq!(json_field::<i32>(payload, "balance-flow"), Ok(-250));
/// assert_eq!(json_field::<bool>(payload, "open"), Ok(true));
/// assert_eq!(json_field::<bool>(payload, "mode"), Err(FieldError::MissingKey));
/// ```
pub fn json_field<'de, T>(payload: &'de [u8], key: &str) -> Result<T, FieldError>
where
    T: Deserialize<'de>,
{
    let mut deserializer = serde_json_core::de::Deserializer::new(payload, None);
    let field = FieldSeed::<T>::new(key)
        .deserialize(&mut deserializer)
        .map_err(|_| FieldError::BadValue)?;
    deserializer.end().map_err(|_| FieldError::BadValue)?;
    field.ok_or(FieldError::MissingKey)
}

/// Walks the top-level object, decoding the value under `key` and skipping
/// the rest.
struct FieldSeed<'k, T> {
    key: &'k str,
    marker: PhantomData<T>,
}

impl<'k, T> FieldSeed<'k, T> {
    fn new(key: &'k str) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }
}

impl<'de, T: Deserialize<'de>> DeserializeSeed<'de> for FieldSeed<'_, T> {
    type Value = Option<T>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for FieldSeed<'_, T> {
    type Value = Option<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(name) = map.next_key::<&'de str>()? {
            if found.is_none() && name == self.key {
                found = Some(map.next_value::<T>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}
