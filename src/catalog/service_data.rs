use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::database::Record;

/// Free-form content blocks (bus info, cafeteria menu) edited in the back-office.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceData {
    pub id: i64,
    pub data_key: String,
    pub title: String,
    /// Markdown.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// The kind of content a [`ServiceData`] entry holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceDataKey {
    BusRing,
    BusCenter,
    CafeteriaMenu,
    Other(String),
}

impl FromStr for ServiceDataKey {
    type Err = String;

    /// Keys are snake_case identifiers; anything else is rejected.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        if key.is_empty()
            || !key
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        {
            return Err(format!("'{}' is not a service key", key));
        }
        Ok(match key {
            "bus_ring" => ServiceDataKey::BusRing,
            "bus_center" => ServiceDataKey::BusCenter,
            "cafeteria_menu" => ServiceDataKey::CafeteriaMenu,
            other => ServiceDataKey::Other(other.to_string()),
        })
    }
}

impl Record for ServiceData {
    const TABLE: &'static str = "services_data";

    fn id(&self) -> i64 {
        self.id
    }
}

impl ServiceData {
    /// `None` when the stored key is not a valid identifier.
    pub fn key(&self) -> Option<ServiceDataKey> {
        self.data_key.parse().ok()
    }
}

/// Active entries, optionally only those under `key`.
pub fn active_services(
    mut services: Vec<ServiceData>,
    key: Option<&ServiceDataKey>,
) -> Vec<ServiceData> {
    services.retain(|service| {
        service.is_active && key.map_or(true, |key| service.key().as_ref() == Some(key))
    });
    services.sort_by_key(|service| service.id);
    services
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_key() {
        let services: Vec<ServiceData> = serde_json::from_str(
            r#"[
                {"id": 2, "data_key": "bus_ring", "title": "Ring", "content": "*every 15 min*"},
                {"id": 1, "data_key": "cafeteria_menu", "title": "Menu", "content": "soup"},
                {"id": 3, "data_key": "bus_ring", "title": "Old", "is_active": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(services[0].key(), Some(ServiceDataKey::BusRing));
        let ring = active_services(services.clone(), Some(&ServiceDataKey::BusRing));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring[0].title, "Ring");
        assert_eq!(active_services(services, None).iter().map(|s| s.id).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn keys_must_be_identifiers() {
        assert_eq!("bus_center".parse::<ServiceDataKey>(), Ok(ServiceDataKey::BusCenter));
        assert_eq!(
            "shuttle_2".parse::<ServiceDataKey>(),
            Ok(ServiceDataKey::Other("shuttle_2".to_string()))
        );
        assert!("".parse::<ServiceDataKey>().is_err());
        assert!("bus ring".parse::<ServiceDataKey>().is_err());
        assert!("Bus_Ring".parse::<ServiceDataKey>().is_err());
    }
}
