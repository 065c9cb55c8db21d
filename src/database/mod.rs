pub mod sqlite;

use serde::{de::DeserializeOwned, Serialize};

use crate::catalog::{
    BusRoute, BusSchedule, Category, Deal, Event, MenuItem, OnDutyPharmacy, Pharmacy, ServiceData,
    Venue,
};

/// A row of one datastore table, kept in the mirror as its JSON payload.
pub trait Record: Serialize + DeserializeOwned {
    /// Table name, both in the hosted datastore and in the local mirror.
    const TABLE: &'static str;

    fn id(&self) -> i64;
}

/// Every mirrored table.
pub const TABLES: [&str; 10] = [
    Category::TABLE,
    Venue::TABLE,
    MenuItem::TABLE,
    ServiceData::TABLE,
    Deal::TABLE,
    Event::TABLE,
    Pharmacy::TABLE,
    OnDutyPharmacy::TABLE,
    BusRoute::TABLE,
    BusSchedule::TABLE,
];
