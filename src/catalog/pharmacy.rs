use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::Record;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
}

impl Record for Pharmacy {
    const TABLE: &'static str = "pharmacies";

    fn id(&self) -> i64 {
        self.id
    }
}

/// One pharmacy's night/holiday duty on a given date. Several pharmacies can
/// be on duty on the same day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnDutyPharmacy {
    pub id: i64,
    pub pharmacy_id: i64,
    pub duty_date: NaiveDate,
}

impl Record for OnDutyPharmacy {
    const TABLE: &'static str = "on_duty_pharmacy";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PharmacyListing {
    #[serde(flatten)]
    pub pharmacy: Pharmacy,
    pub on_duty: bool,
}

/// Active pharmacies by name, with the ones on duty `today` moved to the top.
pub fn pharmacy_listing(
    mut pharmacies: Vec<Pharmacy>,
    duties: &[OnDutyPharmacy],
    today: NaiveDate,
) -> Vec<PharmacyListing> {
    let on_duty: HashSet<i64> = duties
        .iter()
        .filter(|duty| duty.duty_date == today)
        .map(|duty| duty.pharmacy_id)
        .collect();

    pharmacies.retain(|pharmacy| pharmacy.is_active);
    pharmacies.sort_by(|a, b| a.name.cmp(&b.name));
    // Stable sort keeps name order inside each group.
    pharmacies.sort_by_key(|pharmacy| !on_duty.contains(&pharmacy.id));

    pharmacies
        .into_iter()
        .map(|pharmacy| PharmacyListing {
            on_duty: on_duty.contains(&pharmacy.id),
            pharmacy,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pharmacy(id: i64, name: &str) -> Pharmacy {
        Pharmacy {
            id,
            name: name.to_string(),
            address: None,
            phone: None,
            location: None,
            is_active: true,
        }
    }

    fn duty(pharmacy_id: i64, date: &str) -> OnDutyPharmacy {
        OnDutyPharmacy {
            id: pharmacy_id * 10,
            pharmacy_id,
            duty_date: date.parse().unwrap(),
        }
    }

    #[test]
    fn on_duty_first_then_by_name() {
        let mut closed = pharmacy(5, "Aaa");
        closed.is_active = false;
        let pharmacies = vec![
            pharmacy(1, "Merkez"),
            pharmacy(2, "Deniz"),
            pharmacy(3, "Yeni"),
            pharmacy(4, "Çarşı"),
            closed,
        ];
        let duties = vec![
            duty(3, "2024-12-10"),
            duty(1, "2024-12-10"),
            duty(2, "2024-12-09"),
        ];
        let listing = pharmacy_listing(pharmacies, &duties, "2024-12-10".parse().unwrap());
        let shape: Vec<_> = listing
            .iter()
            .map(|p| (p.pharmacy.name.as_str(), p.on_duty))
            .collect();
        assert_eq!(
            shape,
            [("Merkez", true), ("Yeni", true), ("Deniz", false), ("Çarşı", false)]
        );
    }
}
