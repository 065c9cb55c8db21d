use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::{day_interval::DayInterval, day_name::DayName};
use crate::locale::Locale;

/// A venue's opening hours for every weekday.
///
/// Stored as a fixed seven slot array indexed by [`DayName`]; an empty slot
/// means the venue is closed that day. On the wire this is the
/// `{"monday": {"open": .., "close": .., "is_next_day": ..}, ..}` object the
/// back-office writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    timings: [Option<DayInterval>; 7],
}

/// One line of a week rundown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: DayName,
    pub label: &'static str,
    pub formatted: String,
    pub is_today: bool,
    pub has_hours: bool,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayName, interval: DayInterval) -> Self {
        self.set(day, Some(interval));
        self
    }

    pub fn set(&mut self, day: DayName, interval: Option<DayInterval>) {
        self.timings[day.index()] = interval;
    }

    pub fn get(&self, day: DayName) -> Option<&DayInterval> {
        self.timings[day.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.iter().all(Option::is_none)
    }

    /// Whether the venue is open at `now` (local wall-clock time).
    ///
    /// Today's own window is checked first. If that fails, yesterday's window
    /// still counts when it spans midnight and has not closed yet, so a venue
    /// open Friday 22:00 to 03:00 is open at Saturday 01:00 even when Saturday
    /// has no hours of its own.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        let today = DayName::of(now);
        let time = now.time();

        if self.get(today).is_some_and(|interval| interval.contains(time)) {
            return true;
        }
        self.get(today.previous())
            .is_some_and(|interval| interval.carries_over(time))
    }

    pub fn describe_day(&self, day: DayName, locale: Locale) -> String {
        match self.get(day) {
            Some(interval) => interval.describe(locale),
            None => locale.closed().to_string(),
        }
    }

    /// All seven days, Sunday first, with `today` flagged.
    pub fn describe_week(&self, today: DayName, locale: Locale) -> Vec<DaySummary> {
        describe_week(Some(self), today, locale)
    }
}

/// [`WeeklySchedule::is_open`] for venues that may have no hours at all.
pub fn is_open(schedule: Option<&WeeklySchedule>, now: NaiveDateTime) -> bool {
    schedule.is_some_and(|schedule| schedule.is_open(now))
}

/// A missing schedule reads as "unknown", a missing day as "closed".
pub fn describe_day(schedule: Option<&WeeklySchedule>, day: DayName, locale: Locale) -> String {
    match schedule {
        Some(schedule) => schedule.describe_day(day, locale),
        None => locale.unknown().to_string(),
    }
}

pub fn describe_week(
    schedule: Option<&WeeklySchedule>,
    today: DayName,
    locale: Locale,
) -> Vec<DaySummary> {
    DayName::ALL
        .into_iter()
        .map(|day| DaySummary {
            day,
            label: locale.day_label(day),
            formatted: describe_day(schedule, day, locale),
            is_today: day == today,
            has_hours: schedule.is_some_and(|schedule| schedule.get(day).is_some()),
        })
        .collect()
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&'static str, &DayInterval> = DayName::ALL
            .into_iter()
            .filter_map(|day| Some((day.key(), self.get(day)?)))
            .collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    /// Never rejects a schedule because of one bad day: unknown keys are
    /// ignored, malformed days are logged and treated as closed.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                warn!("Hours are not an object, treating as closed: {}", other);
                serde_json::Map::new()
            }
        };
        let mut schedule = WeeklySchedule::new();
        for (key, value) in raw {
            let Some(day) = DayName::from_key(&key) else {
                warn!("Ignoring unknown weekday '{}' in hours", key);
                continue;
            };
            if value.is_null() {
                continue;
            }
            match serde_json::from_value::<DayInterval>(value) {
                Ok(interval) => schedule.set(day, Some(interval)),
                Err(err) => warn!("Treating {} as closed, bad hours: {}", key, err),
            }
        }
        Ok(schedule)
    }
}
