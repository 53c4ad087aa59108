//! Typed view of one OHLC bar.
//!
//! The API has served prices both as JSON numbers and as decimal strings,
//! so every numeric field accepts either form.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One open-high-low-close bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    /// Bar start, milliseconds since the Unix epoch.
    #[serde(deserialize_with = "number_or_string_i64")]
    pub timestamp: i64,
    #[serde(deserialize_with = "number_or_string_f64")]
    pub open: f64,
    #[serde(deserialize_with = "number_or_string_f64")]
    pub high: f64,
    #[serde(deserialize_with = "number_or_string_f64")]
    pub low: f64,
    #[serde(deserialize_with = "number_or_string_f64")]
    pub close: f64,
}

fn number_or_string_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("number {} out of range", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("invalid decimal {:?}: {}", s, e))),
        other => Err(de::Error::custom(format!("expected number or string, got {}", other))),
    }
}

fn number_or_string_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("expected integer, got {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| de::Error::custom(format!("invalid integer {:?}: {}", s, e))),
        other => Err(de::Error::custom(format!("expected integer or string, got {}", other))),
    }
}
