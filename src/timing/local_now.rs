use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Current wall-clock time in the venues' timezone.
///
/// This is the only place the system clock is read; everything downstream
/// receives the value as an argument.
pub fn local_now(timezone: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&timezone)
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| Error::Timezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_zones() {
        assert_eq!(parse_timezone("Europe/Istanbul").unwrap(), chrono_tz::Europe::Istanbul);
        assert!(matches!(parse_timezone("Mars/Olympus"), Err(Error::Timezone(_))));
    }
}
