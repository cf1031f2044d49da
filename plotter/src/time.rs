//! Parsing of the timestamps this tool reads, and the shift into the
//! observatory's local clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::PlotterError;

/// Layout of the observing window literals, e.g. `2023-03-01 21:55:00`.
pub const WINDOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const STAR_DATE_FORMAT: &str = "%Y-%m-%d";
const STAR_TIME_FORMAT: &str = "%H:%M:%S";

pub fn parse_window_time(s: &str) -> Result<DateTime<Utc>, PlotterError> {
    NaiveDateTime::parse_from_str(s.trim(), WINDOW_TIME_FORMAT)
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .map_err(|_| PlotterError::Timestamp(s.to_string(), WINDOW_TIME_FORMAT))
}

/// Joins the date and time columns of a star file. Fractional seconds are
/// dropped.
pub fn parse_star_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let whole_seconds = time.split('.').next().unwrap_or(time);
    let date = NaiveDate::parse_from_str(date, STAR_DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(whole_seconds, STAR_TIME_FORMAT).ok()?;
    Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
}

/// A clock running a fixed number of hours behind UTC. There is no daylight
/// saving; Hawaii (UTC-10) observes none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset: Duration,
}

impl LocalClock {
    pub fn new(hours_behind_utc: i64) -> Self {
        LocalClock {
            offset: Duration::hours(hours_behind_utc),
        }
    }

    pub fn to_local(&self, t: DateTime<Utc>) -> NaiveDateTime {
        t.naive_utc() - self.offset
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        LocalClock::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_time() {
        assert_eq!(
            parse_window_time("2023-03-01 21:55:00").unwrap(),
            Utc.with_ymd_and_hms(2023, 3, 1, 21, 55, 0).unwrap()
        );
        assert!(matches!(
            parse_window_time("2023-Mar-01 21:55"),
            Err(PlotterError::Timestamp(_, WINDOW_TIME_FORMAT))
        ));
    }

    #[test]
    fn star_time_drops_fractional_seconds() {
        let expected = Utc.with_ymd_and_hms(2023, 3, 2, 4, 25, 0).unwrap();
        assert_eq!(parse_star_time("2023-03-02", "04:25:00.0"), Some(expected));
        assert_eq!(parse_star_time("2023-03-02", "04:25:00.00"), Some(expected));
        assert_eq!(parse_star_time("2023-03-02", "04:25:00"), Some(expected));
        assert_eq!(parse_star_time("02/03/2023", "04:25:00"), None);
    }

    #[test]
    fn local_time_is_fixed_subtraction() {
        let clock = LocalClock::default();
        let utc = Utc.with_ymd_and_hms(2023, 3, 1, 21, 55, 0).unwrap();
        assert_eq!(
            clock.to_local(utc),
            NaiveDate::from_ymd_opt(2023, 3, 1)
                .unwrap()
                .and_hms_opt(11, 55, 0)
                .unwrap()
        );

        // no DST anywhere in the year
        for month in 1..=12 {
            let utc = Utc.with_ymd_and_hms(2023, month, 15, 3, 0, 0).unwrap();
            assert_eq!(utc.naive_utc() - clock.to_local(utc), Duration::hours(10));
        }
    }

    #[test]
    fn local_time_crosses_midnight() {
        let clock = LocalClock::new(10);
        let utc = Utc.with_ymd_and_hms(2023, 3, 2, 4, 25, 0).unwrap();
        assert_eq!(clock.to_local(utc).to_string(), "2023-03-01 17:25:00");
    }
}
