//! Field decoders that accept whatever BSON type a document happens to hold.
//!
//! Used with `#[serde(default, deserialize_with = "...")]` on optional
//! fields. Numbers may arrive as int32, int64, double, decimal128 or numeric
//! strings; values that cannot be read as the wanted type decode as `None`
//! rather than failing the whole query.

use mongodb::bson::Bson;
use serde::{Deserialize, Deserializer};

/// Renders any value the way it would be printed next to a title or author.
pub fn render(value: &Bson) -> Option<String> {
    match value {
        Bson::Null | Bson::Undefined => None,
        Bson::String(s) => Some(s.clone()),
        Bson::Int32(v) => Some(v.to_string()),
        Bson::Int64(v) => Some(v.to_string()),
        Bson::Double(v) => Some(v.to_string()),
        Bson::Decimal128(v) => Some(v.to_string()),
        Bson::Boolean(v) => Some(v.to_string()),
        other => Some(other.clone().into_relaxed_extjson().to_string()),
    }
}

pub fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        Bson::Decimal128(v) => v.to_string().parse().ok(),
        Bson::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_i32(value: &Bson) -> Option<i32> {
    match value {
        Bson::Int32(v) => Some(*v),
        Bson::Int64(v) => i32::try_from(*v).ok(),
        Bson::String(s) => s.trim().parse().ok(),
        other => as_f64(other)
            .filter(|v| v.fract() == 0.0 && *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX))
            .map(|v| v as i32),
    }
}

pub fn as_bool(value: &Bson) -> Option<bool> {
    match value {
        Bson::Boolean(v) => Some(*v),
        Bson::String(s) => s.trim().parse().ok(),
        other => as_f64(other).map(|v| v != 0.0),
    }
}

fn with_bson<'de, D, T>(deserializer: D, convert: fn(&Bson) -> Option<T>) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(convert))
}

pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    with_bson(deserializer, render)
}

pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    with_bson(deserializer, as_f64)
}

pub fn opt_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    with_bson(deserializer, as_i32)
}

pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    with_bson(deserializer, as_bool)
}

/// Array of printable values; nulls become empty strings, as a joined list
/// prints them.
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Bson>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(|v| render(v).unwrap_or_default()).collect())
}
