use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{database::Record, locale::Locale};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
}

impl Record for BusRoute {
    const TABLE: &'static str = "bus_routes";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Timetables are kept per day category, not per weekday. The stored values
/// are the Turkish labels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleDay {
    #[serde(rename = "Hafta İçi")]
    Weekday,
    #[serde(rename = "Cumartesi")]
    Saturday,
    #[serde(rename = "Pazar")]
    Sunday,
}

impl ScheduleDay {
    pub const ALL: [ScheduleDay; 3] = [
        ScheduleDay::Weekday,
        ScheduleDay::Saturday,
        ScheduleDay::Sunday,
    ];

    pub fn for_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => ScheduleDay::Saturday,
            Weekday::Sun => ScheduleDay::Sunday,
            _ => ScheduleDay::Weekday,
        }
    }

    /// Accepts the stored label or a plain `weekday`/`saturday`/`sunday`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Hafta İçi" => return Some(ScheduleDay::Weekday),
            "Cumartesi" => return Some(ScheduleDay::Saturday),
            "Pazar" => return Some(ScheduleDay::Sunday),
            _ => {}
        }
        match value.to_ascii_lowercase().as_str() {
            "weekday" | "weekdays" => Some(ScheduleDay::Weekday),
            "saturday" | "cumartesi" => Some(ScheduleDay::Saturday),
            "sunday" | "pazar" => Some(ScheduleDay::Sunday),
            _ => None,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match self {
            ScheduleDay::Weekday => locale.weekdays(),
            ScheduleDay::Saturday => locale.day_label(crate::timing::DayName::Saturday),
            ScheduleDay::Sunday => locale.day_label(crate::timing::DayName::Sunday),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusSchedule {
    pub id: i64,
    pub route_id: i64,
    pub departure_point: String,
    pub day_of_week: ScheduleDay,
    #[serde(default)]
    pub departure_times: Vec<String>,
}

impl Record for BusSchedule {
    const TABLE: &'static str = "bus_schedules";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Active routes by name, narrowed by a case-insensitive substring search.
pub fn search_routes(mut routes: Vec<BusRoute>, query: &str) -> Vec<BusRoute> {
    let query = query.trim().to_lowercase();
    routes.retain(|route| route.is_active && route.name.to_lowercase().contains(&query));
    routes.sort_by(|a, b| a.name.cmp(&b.name));
    routes
}

/// Distinct departure points of a route, in the order they are first seen.
pub fn departure_points(schedules: &[BusSchedule], route_id: i64) -> Vec<String> {
    let mut points: Vec<String> = Vec::new();
    for schedule in schedules.iter().filter(|s| s.route_id == route_id) {
        if !points.contains(&schedule.departure_point) {
            points.push(schedule.departure_point.clone());
        }
    }
    points
}

/// Departure times for one route, stop and day category.
///
/// `None` for the stop means every stop of the route; the first matching
/// timetable wins, as several rows for the same key are not expected.
pub fn departure_times(
    schedules: &[BusSchedule],
    route_id: i64,
    departure_point: Option<&str>,
    day: ScheduleDay,
) -> Vec<String> {
    schedules
        .iter()
        .find(|s| {
            s.route_id == route_id
                && s.day_of_week == day
                && departure_point.map_or(true, |point| s.departure_point == point)
        })
        .map(|s| s.departure_times.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedules() -> Vec<BusSchedule> {
        serde_json::from_str(
            r#"[
                {"id": 1, "route_id": 7, "departure_point": "Kampüs", "day_of_week": "Hafta İçi", "departure_times": ["07:30", "08:00"]},
                {"id": 2, "route_id": 7, "departure_point": "Kampüs", "day_of_week": "Pazar", "departure_times": ["10:00"]},
                {"id": 3, "route_id": 7, "departure_point": "Merkez", "day_of_week": "Hafta İçi", "departure_times": ["07:45"]},
                {"id": 4, "route_id": 9, "departure_point": "Liman", "day_of_week": "Cumartesi", "departure_times": []}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn day_category_for_each_weekday() {
        assert_eq!(ScheduleDay::for_weekday(Weekday::Mon), ScheduleDay::Weekday);
        assert_eq!(ScheduleDay::for_weekday(Weekday::Fri), ScheduleDay::Weekday);
        assert_eq!(ScheduleDay::for_weekday(Weekday::Sat), ScheduleDay::Saturday);
        assert_eq!(ScheduleDay::for_weekday(Weekday::Sun), ScheduleDay::Sunday);
        assert_eq!(ScheduleDay::parse("sunday"), Some(ScheduleDay::Sunday));
        assert_eq!(ScheduleDay::parse("Hafta İçi"), Some(ScheduleDay::Weekday));
        assert_eq!(ScheduleDay::Weekday.label(Locale::En), "Weekdays");
    }

    #[test]
    fn points_and_times() {
        let schedules = schedules();
        assert_eq!(departure_points(&schedules, 7), ["Kampüs", "Merkez"]);
        assert_eq!(
            departure_times(&schedules, 7, Some("Merkez"), ScheduleDay::Weekday),
            ["07:45"]
        );
        assert_eq!(
            departure_times(&schedules, 7, None, ScheduleDay::Weekday),
            ["07:30", "08:00"]
        );
        assert!(departure_times(&schedules, 7, Some("Merkez"), ScheduleDay::Sunday).is_empty());
    }

    #[test]
    fn route_search() {
        let routes = vec![
            BusRoute { id: 1, name: "Ring Hattı".into(), description: None, is_active: true },
            BusRoute { id: 2, name: "Merkez - Kampüs".into(), description: None, is_active: true },
            BusRoute { id: 3, name: "Eski Ring".into(), description: None, is_active: false },
        ];
        let found: Vec<_> = search_routes(routes.clone(), "  RING ").into_iter().map(|r| r.id).collect();
        assert_eq!(found, [1]);
        let all: Vec<_> = search_routes(routes, "").into_iter().map(|r| r.id).collect();
        assert_eq!(all, [2, 1]);
    }
}
