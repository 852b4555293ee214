use chrono::{DateTime, SecondsFormat};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize `null` as the type's default value
///
/// Session logs written by older clients emit explicit nulls for absent header
/// fields; these must not cause the whole record to be rejected.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Custom deserializer for record timestamps
///
/// Strings are kept verbatim. Integers are treated as Unix milliseconds and rendered
/// as RFC3339. `null` or a missing field becomes an empty string.
pub fn deserialize_timestamp_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}
