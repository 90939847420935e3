//! The provider sends most amounts as decimal strings, some as JSON numbers.

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrString {
    Integer(u64),
    String(String),
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(raw) => raw.trim().parse::<f64>().map_err(D::Error::custom),
    }
}

/// Missing, null or empty values become `None`.
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(raw)) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(D::Error::custom),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IntegerOrString::deserialize(deserializer)? {
        IntegerOrString::Integer(value) => value.to_string(),
        IntegerOrString::String(raw) => raw,
    })
}
