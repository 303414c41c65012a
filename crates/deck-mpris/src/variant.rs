//! Loosely typed payload values and the decode step over them.
//!
//! Bus payloads arrive as `a{sv}` maps whose value types are only known at
//! runtime. They are converted once into [`Variant`] at the bus boundary and
//! every consumer decodes through the helpers below, getting a
//! [`DecodeError`] instead of a panic when a value has the wrong shape.

use crate::error::DecodeError;
use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;
use zbus::zvariant::{OwnedValue, Value};

/// A runtime-typed value taken from a bus payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    Str(String),
    ObjectPath(String),
    Bool(bool),
    Int(i64),
    Double(f64),
    List(Vec<Variant>),
    Map(BTreeMap<String, Variant>),
    /// Anything this crate never consumes (structs, fds, ...), kept by kind.
    Other(&'static str),
}

impl Variant {
    /// Short shape name used in decode diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Variant::Str(_) => "string",
            Variant::ObjectPath(_) => "object path",
            Variant::Bool(_) => "boolean",
            Variant::Int(_) => "integer",
            Variant::Double(_) => "double",
            Variant::List(_) => "array",
            Variant::Map(_) => "dict",
            Variant::Other(kind) => kind,
        }
    }

    /// Convenience constructor for string arrays.
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Variant::List(items.into_iter().map(|s| Variant::Str(s.into())).collect())
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::Str(s.to_string())
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::Str(s)
    }
}

// ============ Bus value conversion ============

/// Convert a borrowed bus value. Nested `v` wrappers are unwrapped and
/// dictionaries go through [`from_owned`].
pub(crate) fn from_value(value: &Value<'_>) -> Variant {
    match value {
        Value::Str(s) => Variant::Str(s.to_string()),
        Value::ObjectPath(p) => Variant::ObjectPath(p.to_string()),
        Value::Bool(b) => Variant::Bool(*b),
        Value::U8(n) => Variant::Int(i64::from(*n)),
        Value::I16(n) => Variant::Int(i64::from(*n)),
        Value::U16(n) => Variant::Int(i64::from(*n)),
        Value::I32(n) => Variant::Int(i64::from(*n)),
        Value::U32(n) => Variant::Int(i64::from(*n)),
        Value::I64(n) => Variant::Int(*n),
        Value::U64(n) => i64::try_from(*n)
            .map(Variant::Int)
            .unwrap_or(Variant::Other("u64")),
        Value::F64(f) => Variant::Double(*f),
        Value::Value(inner) => from_value(inner),
        Value::Array(arr) => Variant::List(arr.iter().map(from_value).collect()),
        Value::Dict(_) => match value.try_to_owned() {
            Ok(owned) => from_owned(owned),
            Err(_) => Variant::Other("dict"),
        },
        Value::Structure(_) => Variant::Other("struct"),
        _ => Variant::Other("unsupported"),
    }
}

/// Convert an owned bus value, expanding `a{sv}` dictionaries into
/// [`Variant::Map`].
pub(crate) fn from_owned(value: OwnedValue) -> Variant {
    let is_dict = matches!(value.deref(), Value::Dict(_));
    if !is_dict {
        return from_value(&value);
    }

    match HashMap::<String, OwnedValue>::try_from(value) {
        Ok(map) => Variant::Map(map_from_owned(map)),
        Err(_) => Variant::Other("dict"),
    }
}

/// Convert a whole `a{sv}` map as handed out by zbus.
pub(crate) fn map_from_owned(map: HashMap<String, OwnedValue>) -> BTreeMap<String, Variant> {
    map.into_iter().map(|(k, v)| (k, from_owned(v))).collect()
}

// ============ Decode helpers ============

pub(crate) fn expect_str(key: &str, value: &Variant) -> Result<String, DecodeError> {
    match value {
        Variant::Str(s) => Ok(s.clone()),
        other => Err(DecodeError::new(key, "string", other.kind())),
    }
}

pub(crate) fn expect_str_list(key: &str, value: &Variant) -> Result<Vec<String>, DecodeError> {
    let Variant::List(items) = value else {
        return Err(DecodeError::new(key, "array of strings", value.kind()));
    };

    items
        .iter()
        .map(|item| match item {
            Variant::Str(s) => Ok(s.clone()),
            other => Err(DecodeError::new(key, "array of strings", other.kind())),
        })
        .collect()
}

pub(crate) fn expect_map<'a>(
    key: &str,
    value: &'a Variant,
) -> Result<&'a BTreeMap<String, Variant>, DecodeError> {
    match value {
        Variant::Map(map) => Ok(map),
        other => Err(DecodeError::new(key, "dict", other.kind())),
    }
}

/// Decode `key` from `map` if present. Absent keys are `Ok(None)`.
pub(crate) fn optional<T>(
    map: &BTreeMap<String, Variant>,
    key: &str,
    decode: impl FnOnce(&str, &Variant) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    map.get(key).map(|v| decode(key, v)).transpose()
}
