//! Shared plumbing between Bot API JSON and the typed objects in this crate.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// An object with a Bot API wire mapping.
///
/// Decoding treats `null` and `{}` as "no object"; encoding drops every
/// optional field that carries no value.
pub trait WireObject: Serialize + DeserializeOwned {
    fn from_wire(data: &Value) -> Result<Option<Self>> {
        if is_absent(data) {
            return Ok(None);
        }
        Ok(Some(Self::deserialize(data)?))
    }

    fn from_wire_list(data: &Value) -> Result<Vec<Self>> {
        if data.is_null() {
            return Ok(Vec::new());
        }
        Ok(Vec::<Self>::deserialize(data)?)
    }

    fn to_wire(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// `null` and the empty object both mean "not present" on the wire.
pub fn is_absent(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// `deserialize_with` helper for optional nested objects.
pub(crate) fn absent_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if is_absent(&value) {
        return Ok(None);
    }
    T::deserialize(value).map(Some).map_err(D::Error::custom)
}

/// `deserialize_with` helper mapping `null` to the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer<T> {
    Number(T),
    Text(String),
}

/// Accepts `42` as well as `"42"`, the way the API occasionally echoes ids.
pub(crate) fn lenient_integer<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<Integer<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Integer::Number(n)) => Ok(Some(n)),
        Some(Integer::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", s, e))),
    }
}

pub(crate) fn is_false(flag: &bool) -> bool {
    !*flag
}
