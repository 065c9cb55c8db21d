use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::{database::Record, locale::Locale};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "timestamp", alias = "date")]
    pub event_date: DateTime<FixedOffset>,
    #[serde(default, alias = "poster_url")]
    pub image_url: Option<String>,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Event {
    const TABLE: &'static str = "events";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Event {
    /// `"15 Ara 2024"` in the viewer's timezone.
    pub fn display_date<Tz: TimeZone>(&self, timezone: &Tz, locale: Locale) -> String {
        let local = self.event_date.with_timezone(timezone);
        format!(
            "{} {} {}",
            local.day(),
            locale.month_abbr(local.month0()),
            local.year()
        )
    }

    /// `"14:30"` in the viewer's timezone.
    pub fn display_time<Tz: TimeZone>(&self, timezone: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.event_date
            .with_timezone(timezone)
            .format("%H:%M")
            .to_string()
    }
}

/// Active events ordered by date. Unless `include_past`, only those that
/// have not started yet.
pub fn upcoming_events<Tz: TimeZone>(
    mut events: Vec<Event>,
    now: &DateTime<Tz>,
    include_past: bool,
) -> Vec<Event> {
    let now = now.timestamp_millis();
    events.retain(|event| {
        event.is_active && (include_past || event.event_date.timestamp_millis() >= now)
    });
    events.sort_by_key(|event| event.event_date);
    events
}
