use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Opening hours for a single weekday.
///
/// `close` belongs to the following calendar day when `spans_midnight` is set.
/// `open == close` with the flag set is a full 24 hour window; without the
/// flag it is an empty interval and never open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInterval {
    #[serde(with = "hhmm")]
    open: NaiveTime,
    #[serde(with = "hhmm")]
    close: NaiveTime,
    #[serde(rename = "is_next_day", default)]
    spans_midnight: bool,
}

impl DayInterval {
    pub fn new(open: NaiveTime, close: NaiveTime, spans_midnight: bool) -> Self {
        Self {
            open: truncate_to_minute(open),
            close: truncate_to_minute(close),
            spans_midnight,
        }
    }

    /// Builds an interval from two `HH:MM` strings, `None` if either is malformed.
    pub fn parse(open: &str, close: &str, spans_midnight: bool) -> Option<Self> {
        Some(Self::new(
            hhmm::parse(open)?,
            hhmm::parse(close)?,
            spans_midnight,
        ))
    }

    /// Whether `time` falls inside this day's own window.
    ///
    /// Same-day windows are half open: `open <= time < close`. Spanning
    /// windows accept anything from `open` onwards plus the early hours
    /// before `close`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let time = truncate_to_minute(time);
        if self.spans_midnight {
            time >= self.open || time < self.close
        } else {
            self.open <= time && time < self.close
        }
    }

    /// Whether `time` on the next calendar day is still inside this window.
    pub fn carries_over(&self, time: NaiveTime) -> bool {
        self.spans_midnight && truncate_to_minute(time) < self.close
    }

    /// `"09:00 - 23:00"`, with the next-day suffix for spanning windows.
    pub fn describe(&self, locale: Locale) -> String {
        let suffix = if self.spans_midnight {
            locale.next_day_suffix()
        } else {
            ""
        };
        format!(
            "{} - {}{}",
            hhmm::format(self.open),
            hhmm::format(self.close),
            suffix
        )
    }
}

pub(crate) fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default()
}

/// Strict `HH:MM` wall-clock values.
///
/// `HH:MM:SS` is also accepted since the datastore's `time` columns render
/// that way; seconds are dropped.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::truncate_to_minute;

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let bytes = value.as_bytes();
        let format = match bytes.len() {
            5 => "%H:%M",
            8 if bytes[5] == b':' => "%H:%M:%S",
            _ => return None,
        };
        if bytes[2] != b':' || !bytes[..2].iter().all(u8::is_ascii_digit) {
            return None;
        }
        NaiveTime::parse_from_str(value, format)
            .ok()
            .map(truncate_to_minute)
    }

    pub fn format(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("'{}' is not a HH:MM time", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> NaiveTime {
        hhmm::parse(value).unwrap()
    }

    #[test]
    fn parses_only_zero_padded_times() {
        assert_eq!(hhmm::parse("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(hhmm::parse("23:59:41"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(hhmm::parse("9:05"), None);
        assert_eq!(hhmm::parse("24:00"), None);
        assert_eq!(hhmm::parse("12:60"), None);
        assert_eq!(hhmm::parse("noon"), None);
        assert_eq!(hhmm::parse(""), None);
    }

    #[test]
    fn same_day_window_is_half_open() {
        let interval = DayInterval::parse("09:00", "18:00", false).unwrap();
        assert!(interval.contains(t("09:00")));
        assert!(interval.contains(t("17:59")));
        assert!(!interval.contains(t("18:00")));
        assert!(!interval.contains(t("08:59")));
        assert!(!interval.carries_over(t("01:00")));
    }

    #[test]
    fn seconds_do_not_push_past_close() {
        let interval = DayInterval::parse("09:00", "18:00", false).unwrap();
        let late = NaiveTime::from_hms_opt(17, 59, 59).unwrap();
        assert!(interval.contains(late));
    }

    #[test]
    fn equal_bounds_without_flag_never_open() {
        let interval = DayInterval::parse("10:00", "10:00", false).unwrap();
        assert!(!interval.contains(t("10:00")));
        assert!(!interval.contains(t("00:00")));
    }

    #[test]
    fn spanning_window_carries_into_next_day() {
        let interval = DayInterval::parse("22:00", "02:00", true).unwrap();
        assert!(interval.carries_over(t("01:59")));
        assert!(!interval.carries_over(t("02:00")));
    }

    #[test]
    fn describes_with_suffix() {
        let late = DayInterval::parse("22:00", "02:00", true).unwrap();
        assert_eq!(late.describe(Locale::Tr), "22:00 - 02:00 (ertesi gün)");
        assert_eq!(late.describe(Locale::En), "22:00 - 02:00 (next day)");
        let plain = DayInterval::parse("09:00", "18:00", false).unwrap();
        assert_eq!(plain.describe(Locale::En), "09:00 - 18:00");
    }

    #[test]
    fn reads_the_stored_shape() {
        let interval: DayInterval =
            serde_json::from_str(r#"{"open":"08:30","close":"01:00","is_next_day":true}"#).unwrap();
        assert_eq!(interval, DayInterval::parse("08:30", "01:00", true).unwrap());
        assert!(serde_json::from_str::<DayInterval>(r#"{"open":"8","close":"01:00"}"#).is_err());
    }
}
