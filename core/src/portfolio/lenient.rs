//! Serde field adapters that never fail: wrong-typed caller input becomes an empty value.

use crate::oracle::response::{coerce_string, coerce_string_list, coerce_text, lookup};
use crate::portfolio::sources::JournalEntry;
use crate::taxonomy::category::Category;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(coerce_string_list(Some(&v)))
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(coerce_text(Some(&v)))
}

/// Array elements that deserialize as `T`; other elements and non-arrays are dropped.
pub fn items<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    let Value::Array(arr) = v else {
        return Ok(Vec::new());
    };
    Ok(arr
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

pub fn object_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Category number given as 3, 3.0, "3" or "GP3".
pub fn category_number_of(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => Category::parse(s).map(|c| i64::from(c.number())),
        _ => None,
    }
}

pub fn category_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(category_number_of(&v))
}

pub fn journal_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<JournalEntry>, D::Error> {
    let v = Value::deserialize(d)?;
    let Value::Array(arr) = v else {
        return Ok(Vec::new());
    };
    Ok(arr
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let category = lookup(obj, &["gp", "category"]).and_then(category_number_of)?;
            let evidence = lookup(obj, &["evidence", "text"]).and_then(coerce_string)?;
            Some(JournalEntry { category, evidence })
        })
        .collect())
}

/// Number given as 87, 87.5 or "87.5"; anything else is `None`.
pub fn number_of(v: &Value) -> Option<f64> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(number_of(&v))
}

/// Non-negative whole count; negative, fractional or non-numeric input becomes 0.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(number_of(&v)
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u64)
        .unwrap_or(0))
}
