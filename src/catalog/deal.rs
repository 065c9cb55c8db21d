use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::{database::Record, timing::countdown::Countdown};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub venue_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// e.g. "20% OFF"
    #[serde(default)]
    pub discount_text: Option<String>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(with = "timestamp", alias = "valid_from")]
    pub start_date: DateTime<FixedOffset>,
    #[serde(with = "timestamp", alias = "valid_until")]
    pub end_date: DateTime<FixedOffset>,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Deal {
    const TABLE: &'static str = "deals";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Deal {
    pub fn countdown<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Countdown {
        Countdown::until(&self.end_date, now)
    }

    pub fn has_ended<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.end_date.timestamp_millis() < now.timestamp_millis()
    }
}

/// Active deals, soonest ending first. With `include_ended` the end date is
/// not checked.
pub fn current_deals<Tz: TimeZone>(
    mut deals: Vec<Deal>,
    now: &DateTime<Tz>,
    include_ended: bool,
) -> Vec<Deal> {
    deals.retain(|deal| deal.is_active && (include_ended || !deal.has_ended(now)));
    deals.sort_by_key(|deal| deal.end_date);
    deals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Istanbul;

    fn deal(id: i64, end: &str) -> Deal {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "venue_id": 1,
            "title": format!("deal {}", id),
            "valid_from": "2024-12-01T00:00:00+03:00",
            "valid_until": end,
        }))
        .unwrap()
    }

    #[test]
    fn keeps_running_deals_soonest_first() {
        let now = Istanbul.with_ymd_and_hms(2024, 12, 10, 12, 0, 0).unwrap();
        let mut hidden = deal(4, "2024-12-30T00:00:00+03:00");
        hidden.is_active = false;
        let deals = vec![
            deal(1, "2024-12-20T00:00:00+03:00"),
            deal(2, "2024-12-09T23:59:00+03:00"),
            deal(3, "2024-12-11T00:00:00+03:00"),
            hidden,
        ];
        let ids: Vec<_> = current_deals(deals.clone(), &now, false)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, [3, 1]);
        let ids: Vec<_> = current_deals(deals, &now, true).iter().map(|d| d.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn countdown_from_end_date() {
        let now = Istanbul.with_ymd_and_hms(2024, 12, 10, 12, 0, 0).unwrap();
        assert_eq!(deal(1, "2024-12-11T00:00:00+03:00").countdown(&now), Countdown::EndsTomorrow);
        assert_eq!(deal(1, "2024-12-20T12:00:00+03:00").countdown(&now), Countdown::DaysLeft(10));
        assert_eq!(deal(1, "2024-12-01").countdown(&now), Countdown::Expired);
    }

    #[test]
    fn keeps_back_office_discount() {
        let coffee: Deal = serde_json::from_value(serde_json::json!({
            "id": 1,
            "venue_id": 1,
            "title": "Kahve",
            "discount_percentage": 25,
            "valid_from": "2024-12-01T00:00:00+03:00",
            "valid_until": "2024-12-20T00:00:00+03:00",
        }))
        .unwrap();
        assert_eq!(coffee.discount_percentage, Some(25.0));
        assert_eq!(coffee.discount_text, None);
        assert_eq!(deal(2, "2024-12-20T00:00:00+03:00").discount_percentage, None);
    }
}
