//! The shapes sent back to the client.
//!
//! Records are flattened in as stored and the time-dependent fields are
//! added next to them, computed for the instant of the request.

use serde::Serialize;

use crate::{
    catalog::{
        bus::ScheduleDay, menu_item::MenuSection, Category, Deal, Event, Venue,
    },
    timing::{countdown::Urgency, DaySummary},
};

#[derive(Serialize, Clone)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category_id: i64,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub location: Option<String>,
    pub is_featured: bool,
    pub is_open: bool,
    pub todays_hours: String,
}

#[derive(Serialize, Clone)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub category: Option<Category>,
    pub is_open: bool,
    pub week: Vec<DaySummary>,
    pub menu: Vec<MenuSection>,
}

#[derive(Serialize, Clone)]
pub struct DealView {
    #[serde(flatten)]
    pub deal: Deal,
    pub venue_name: Option<String>,
    pub remaining: String,
    pub urgency: Urgency,
    pub show_badge: bool,
}

#[derive(Serialize, Clone)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub display_date: String,
    pub display_time: String,
}

#[derive(Serialize, Clone)]
pub struct BusScheduleView {
    pub route_id: i64,
    pub departure_points: Vec<String>,
    pub departure_point: Option<String>,
    pub day: ScheduleDay,
    pub day_label: &'static str,
    pub days: Vec<ScheduleDay>,
    pub departure_times: Vec<String>,
}
