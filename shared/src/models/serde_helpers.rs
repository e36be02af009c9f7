//! Serde helpers for wall-clock times
//!
//! Times travel as `"HH:MM"` on the wire. Deserialization also accepts
//! `"HH:MM:SS"` so rules exported from other tools load unchanged.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Parse `"HH:MM"` or `"HH:MM:SS"`
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// `Option<NaiveTime>` as `"HH:MM"` or `null`
pub mod option_hhmm {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_hhmm(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time (HH:MM): {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm_accepts_seconds() {
        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_hhmm("09:30"), Some(t));
        assert_eq!(parse_hhmm("09:30:00"), Some(t));
        assert_eq!(parse_hhmm(" 09:30 "), Some(t));
        assert_eq!(parse_hhmm("9h30"), None);
        assert_eq!(parse_hhmm("25:00"), None);
    }
}
