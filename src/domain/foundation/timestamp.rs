//! UTC instants: join dates, data-quality event times, and the clock input
//! the calendar term is derived from.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based.
    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc))
    }

    #[test]
    fn calendar_fields_are_utc() {
        // 23:30 on Apr 30 at -05:00 is already May 1 in UTC
        let ts = at("2013-04-30T23:30:00-05:00");
        assert_eq!(ts.year(), 2013);
        assert_eq!(ts.month(), 5);
    }

    #[test]
    fn join_dates_order_chronologically() {
        assert!(at("2012-09-01T00:00:00Z") < at("2013-01-01T00:00:00Z"));
    }

    #[test]
    fn serializes_as_bare_rfc3339() {
        let json = serde_json::to_string(&at("2013-06-15T10:30:00Z")).unwrap();
        assert!(json.starts_with("\"2013-06-15T10:30:00"));
    }
}
