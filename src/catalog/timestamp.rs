//! Datastore timestamps.
//!
//! `timestamptz` columns come back as RFC 3339 with an offset; plain
//! `timestamp` columns and date pickers leave the offset out, those are read
//! as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{de::Error, Deserialize, Deserializer, Serializer};

pub fn parse(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp);
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}

pub fn serialize<S: Serializer>(
    timestamp: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.with_timezone(&Utc).to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error> {
    let value = String::deserialize(deserializer)?;
    parse(&value).ok_or_else(|| D::Error::custom(format!("'{}' is not a timestamp", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_naive_values() {
        let with_offset = parse("2024-12-15T10:00:00+03:00").unwrap();
        let naive = parse("2024-12-15T07:00:00").unwrap();
        assert_eq!(with_offset, naive);
        assert_eq!(parse("2024-12-15 07:00:00.123").unwrap().timestamp(), naive.timestamp());
        assert_eq!(parse("2024-12-15").unwrap().to_rfc3339(), "2024-12-15T00:00:00+00:00");
        assert!(parse("yesterday").is_none());
    }
}
