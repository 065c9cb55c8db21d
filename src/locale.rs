use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::timing::day_name::DayName;

/// Display language for every human-readable string the API returns.
///
/// Turkish is the default and also the fallback for anything we don't know.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

const TR_MONTHS: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];
const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    /// Lenient parse used for the `lang` query parameter: takes the language
    /// part of tags like `en-US` and falls back to Turkish.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        language.parse().unwrap_or_default()
    }

    pub fn closed(self) -> &'static str {
        match self {
            Locale::Tr => "Kapalı",
            Locale::En => "Closed",
        }
    }

    pub fn unknown(self) -> &'static str {
        match self {
            Locale::Tr => "Bilinmiyor",
            Locale::En => "Unknown",
        }
    }

    pub fn next_day_suffix(self) -> &'static str {
        match self {
            Locale::Tr => " (ertesi gün)",
            Locale::En => " (next day)",
        }
    }

    pub fn day_label(self, day: DayName) -> &'static str {
        match (self, day) {
            (Locale::Tr, DayName::Monday) => "Pazartesi",
            (Locale::Tr, DayName::Tuesday) => "Salı",
            (Locale::Tr, DayName::Wednesday) => "Çarşamba",
            (Locale::Tr, DayName::Thursday) => "Perşembe",
            (Locale::Tr, DayName::Friday) => "Cuma",
            (Locale::Tr, DayName::Saturday) => "Cumartesi",
            (Locale::Tr, DayName::Sunday) => "Pazar",
            (Locale::En, DayName::Monday) => "Monday",
            (Locale::En, DayName::Tuesday) => "Tuesday",
            (Locale::En, DayName::Wednesday) => "Wednesday",
            (Locale::En, DayName::Thursday) => "Thursday",
            (Locale::En, DayName::Friday) => "Friday",
            (Locale::En, DayName::Saturday) => "Saturday",
            (Locale::En, DayName::Sunday) => "Sunday",
        }
    }

    /// `month0` is zero based, as returned by `chrono::Datelike::month0`.
    pub fn month_abbr(self, month0: u32) -> &'static str {
        let months = match self {
            Locale::Tr => &TR_MONTHS,
            Locale::En => &EN_MONTHS,
        };
        months.get(month0 as usize).copied().unwrap_or_default()
    }

    pub fn weekdays(self) -> &'static str {
        match self {
            Locale::Tr => "Hafta İçi",
            Locale::En => "Weekdays",
        }
    }

    pub fn ends_today(self) -> &'static str {
        match self {
            Locale::Tr => "Bugün sona eriyor",
            Locale::En => "Ends today",
        }
    }

    pub fn ends_tomorrow(self) -> &'static str {
        match self {
            Locale::Tr => "Yarın sona eriyor",
            Locale::En => "Ends tomorrow",
        }
    }

    pub fn days_left(self, days: i64) -> String {
        match self {
            Locale::Tr => format!("{} gün kaldı", days),
            Locale::En if days == 1 => "1 day left".to_string(),
            Locale::En => format!("{} days left", days),
        }
    }

    pub fn ended(self) -> &'static str {
        match self {
            Locale::Tr => "Sona erdi",
            Locale::En => "Ended",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(format!("Unsupported locale '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_fall_back_to_turkish() {
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("EN"), Locale::En);
        assert_eq!(Locale::from_tag("de"), Locale::Tr);
        assert_eq!(Locale::from_tag(""), Locale::Tr);
    }

    #[test]
    fn month_out_of_range_is_empty() {
        assert_eq!(Locale::Tr.month_abbr(11), "Ara");
        assert_eq!(Locale::En.month_abbr(12), "");
    }
}
