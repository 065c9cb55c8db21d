use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// One of the seven keys of a weekly schedule.
///
/// The discriminants follow the Sunday-first numbering used by the mobile
/// client, which is also the order week rundowns are listed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayName {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl DayName {
    /// Canonical order, Sunday first.
    pub const ALL: [DayName; 7] = [
        DayName::Sunday,
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn of(timestamp: NaiveDateTime) -> Self {
        timestamp.weekday().into()
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + 6) % 7]
    }

    pub fn key(self) -> &'static str {
        match self {
            DayName::Sunday => "sunday",
            DayName::Monday => "monday",
            DayName::Tuesday => "tuesday",
            DayName::Wednesday => "wednesday",
            DayName::Thursday => "thursday",
            DayName::Friday => "friday",
            DayName::Saturday => "saturday",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.key() == key)
    }
}

impl From<Weekday> for DayName {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sunday_first_numbering_matches_chrono() {
        for day in DayName::ALL {
            assert_eq!(DayName::ALL[day.index()], day);
        }
        assert_eq!(DayName::from(Weekday::Sun), DayName::Sunday);
        assert_eq!(DayName::from(Weekday::Sat), DayName::Saturday);
    }

    #[test]
    fn previous_wraps_around_the_week() {
        assert_eq!(DayName::Sunday.previous(), DayName::Saturday);
        assert_eq!(DayName::Tuesday.previous(), DayName::Monday);
    }

    #[test]
    fn weekday_of_a_known_date() {
        // 2024-12-16 was a Monday
        let ts = NaiveDate::from_ymd_opt(2024, 12, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(DayName::of(ts), DayName::Monday);
        assert_eq!(DayName::from_key("monday"), Some(DayName::Monday));
        assert_eq!(DayName::from_key("Monday"), None);
    }
}
