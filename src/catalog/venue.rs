use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    database::Record,
    locale::Locale,
    timing::{
        schedule::{self, DaySummary},
        DayName, WeeklySchedule,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hours: Option<WeeklySchedule>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Venue {
    const TABLE: &'static str = "venues";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Venue {
    /// Venues without hours are treated as closed.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        schedule::is_open(self.hours.as_ref(), now)
    }

    pub fn todays_hours(&self, now: NaiveDateTime, locale: Locale) -> String {
        schedule::describe_day(self.hours.as_ref(), DayName::of(now), locale)
    }

    pub fn week(&self, now: NaiveDateTime, locale: Locale) -> Vec<DaySummary> {
        schedule::describe_week(self.hours.as_ref(), DayName::of(now), locale)
    }
}

/// Narrows the venue list the way the listing screens do.
#[derive(Clone, Debug, Default)]
pub struct VenueFilter {
    pub category_id: Option<i64>,
    pub is_featured: Option<bool>,
    /// Keep only venues open at this instant.
    pub open_at: Option<NaiveDateTime>,
}

impl VenueFilter {
    pub fn matches(&self, venue: &Venue) -> bool {
        venue.is_active
            && self.category_id.map_or(true, |id| venue.category_id == id)
            && self.is_featured.map_or(true, |featured| venue.is_featured == featured)
            && self.open_at.map_or(true, |now| venue.is_open(now))
    }

    /// Matching venues, ordered by name.
    pub fn apply(&self, mut venues: Vec<Venue>) -> Vec<Venue> {
        venues.retain(|venue| self.matches(venue));
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        venues
    }
}

pub fn find_by_slug<'a>(venues: &'a [Venue], slug: &str) -> Option<&'a Venue> {
    venues
        .iter()
        .find(|venue| venue.is_active && venue.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn venue(id: i64, name: &str, category_id: i64, hours: Option<&str>) -> Venue {
        let json = serde_json::json!({
            "id": id,
            "name": name,
            "slug": name.to_lowercase(),
            "category_id": category_id,
            "hours": hours.map(|h| serde_json::from_str::<serde_json::Value>(h).unwrap()),
            "is_featured": id % 2 == 0,
            "is_active": true,
        });
        serde_json::from_value(json).unwrap()
    }

    fn monday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const LATE: &str = r#"{"monday": {"open": "18:00", "close": "02:00", "is_next_day": true}}"#;

    #[test]
    fn missing_hours_mean_closed() {
        let v = venue(1, "Kahve", 1, None);
        assert!(!v.is_open(monday(12, 0)));
        assert_eq!(v.todays_hours(monday(12, 0), Locale::Tr), "Bilinmiyor");
        assert_eq!(v.week(monday(12, 0), Locale::En).len(), 7);
    }

    #[test]
    fn filter_by_category_featured_and_open_now() {
        let venues = vec![
            venue(1, "Zeytin", 1, Some(LATE)),
            venue(2, "Ada", 1, None),
            venue(3, "Bahce", 2, Some(LATE)),
        ];
        let by_category = VenueFilter {
            category_id: Some(1),
            ..Default::default()
        };
        let names: Vec<_> = by_category
            .apply(venues.clone())
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["Ada", "Zeytin"]);

        let open_now = VenueFilter {
            open_at: Some(monday(20, 0)),
            is_featured: Some(false),
            ..Default::default()
        };
        let names: Vec<_> = open_now.apply(venues).into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["Bahce", "Zeytin"]);
    }

    #[test]
    fn inactive_venues_are_hidden() {
        let mut hidden = venue(1, "Eski", 1, None);
        hidden.is_active = false;
        assert!(!VenueFilter::default().matches(&hidden));
        assert!(find_by_slug(&[hidden], "eski").is_none());
    }
}
