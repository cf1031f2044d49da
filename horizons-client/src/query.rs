use chrono::{DateTime, Utc};
use std::convert::From;

/// Layout Horizons accepts for START_TIME and STOP_TIME.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An observer-table request for a single body as seen from a single site.
///
/// Only the airmass quantity is requested, in CSV layout, so the result can be
/// read by [`crate::Ephemerides::parse`].
#[derive(Default, Debug, Clone)]
pub struct EphemerisQuery {
    command: String,
    center: String,
    start: String,
    stop: String,
    step: String,
}

impl EphemerisQuery {
    pub fn new(command: &str) -> Self {
        EphemerisQuery {
            command: format!("'{}'", command),
            ..Default::default()
        }
    }

    /// Observatory code of the site, e.g. `568` for Maunakea.
    pub fn center(mut self, site: &str) -> Self {
        self.center = format!("'{}'", site);
        self
    }

    pub fn start(mut self, dt: DateTime<Utc>) -> Self {
        self.start = format!("'{}'", dt.format(QUERY_TIME_FORMAT));
        self
    }

    pub fn stop(mut self, dt: DateTime<Utc>) -> Self {
        self.stop = format!("'{}'", dt.format(QUERY_TIME_FORMAT));
        self
    }

    pub fn step(mut self, minutes: u32) -> Self {
        self.step = format!("'{}m'", minutes);
        self
    }
}

impl<'a> From<&'a EphemerisQuery> for Vec<(&'a str, &'a str)> {
    fn from(query: &'a EphemerisQuery) -> Vec<(&'a str, &'a str)> {
        // we have to specify that we want the result in json format
        let mut params = vec![
            ("format", "json"),
            ("OBJ_DATA", "'NO'"),
            ("MAKE_EPHEM", "'YES'"),
            ("EPHEM_TYPE", "'OBSERVER'"),
            ("QUANTITIES", "'8'"),
            ("CSV_FORMAT", "'YES'"),
        ];

        if !query.command.is_empty() {
            params.push(("COMMAND", query.command.as_str()));
        }

        if !query.center.is_empty() {
            params.push(("CENTER", query.center.as_str()));
        }

        if !query.start.is_empty() {
            params.push(("START_TIME", query.start.as_str()));
        }

        if !query.stop.is_empty() {
            params.push(("STOP_TIME", query.stop.as_str()));
        }

        if !query.step.is_empty() {
            params.push(("STEP_SIZE", query.step.as_str()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lookup<'a>(params: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    #[test]
    fn full_query_has_all_parameters() {
        let query = EphemerisQuery::new("599")
            .center("568")
            .start(Utc.with_ymd_and_hms(2023, 3, 1, 21, 55, 0).unwrap())
            .stop(Utc.with_ymd_and_hms(2023, 3, 2, 4, 25, 0).unwrap())
            .step(10);
        let params: Vec<_> = (&query).into();

        assert_eq!(lookup(&params, "format"), Some("json"));
        assert_eq!(lookup(&params, "COMMAND"), Some("'599'"));
        assert_eq!(lookup(&params, "CENTER"), Some("'568'"));
        assert_eq!(lookup(&params, "START_TIME"), Some("'2023-03-01 21:55:00'"));
        assert_eq!(lookup(&params, "STOP_TIME"), Some("'2023-03-02 04:25:00'"));
        assert_eq!(lookup(&params, "STEP_SIZE"), Some("'10m'"));
        assert_eq!(lookup(&params, "QUANTITIES"), Some("'8'"));
    }

    #[test]
    fn unset_fields_are_omitted() {
        let query = EphemerisQuery::new("899");
        let params: Vec<_> = (&query).into();

        assert_eq!(lookup(&params, "COMMAND"), Some("'899'"));
        assert!(lookup(&params, "CENTER").is_none());
        assert!(lookup(&params, "START_TIME").is_none());
        assert!(lookup(&params, "STEP_SIZE").is_none());
    }
}
