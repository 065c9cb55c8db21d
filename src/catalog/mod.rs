//! Records mirrored from the hosted datastore, and the rules the consumer
//! screens apply to them.
//!
//! Field names follow the datastore columns so payloads can be stored and
//! served as-is.

pub mod bus;
pub mod category;
pub mod deal;
pub mod event;
pub mod menu_item;
pub mod pharmacy;
pub mod service_data;
pub mod timestamp;
pub mod venue;

pub use bus::{BusRoute, BusSchedule, ScheduleDay};
pub use category::Category;
pub use deal::Deal;
pub use event::Event;
pub use menu_item::MenuItem;
pub use pharmacy::{OnDutyPharmacy, Pharmacy};
pub use service_data::ServiceData;
pub use venue::{Venue, VenueFilter};

/// Rows written before `is_active` existed are visible.
fn active_by_default() -> bool {
    true
}
