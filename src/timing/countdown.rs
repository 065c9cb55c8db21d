use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::locale::Locale;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Time left until something (a deal) ends, rounded up to whole days.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Countdown {
    Expired,
    EndsToday,
    EndsTomorrow,
    DaysLeft(i64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Soon,
    Normal,
}

impl Countdown {
    pub fn until<A: TimeZone, B: TimeZone>(end: &DateTime<A>, now: &DateTime<B>) -> Self {
        let millis = end.with_timezone(&Utc).timestamp_millis()
            - now.with_timezone(&Utc).timestamp_millis();
        if millis < 0 {
            return Countdown::Expired;
        }
        let days = millis / DAY_MILLIS + i64::from(millis % DAY_MILLIS != 0);
        match days {
            0 => Countdown::EndsToday,
            1 => Countdown::EndsTomorrow,
            days => Countdown::DaysLeft(days),
        }
    }

    pub fn urgency(self) -> Urgency {
        match self {
            Countdown::Expired | Countdown::EndsToday | Countdown::EndsTomorrow => Urgency::Urgent,
            Countdown::DaysLeft(days) if days < 7 => Urgency::Soon,
            Countdown::DaysLeft(_) => Urgency::Normal,
        }
    }

    /// Card views only show a badge for the last week.
    pub fn shows_badge(self) -> bool {
        self.urgency() != Urgency::Normal
    }

    pub fn label(self, locale: Locale) -> String {
        match self {
            Countdown::Expired => locale.ended().to_string(),
            Countdown::EndsToday => locale.ends_today().to_string(),
            Countdown::EndsTomorrow => locale.ends_tomorrow().to_string(),
            Countdown::DaysLeft(days) => locale.days_left(days),
        }
    }
}
