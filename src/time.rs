//! Formatting of instants used as range bounds

use chrono::{DateTime, SecondsFormat, Utc};

/// Format an instant the way range clauses expect it: RFC 3339, UTC, milliseconds
pub fn format_bound(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bound() {
        let instant = Utc.with_ymd_and_hms(2020, 2, 27, 18, 27, 5).unwrap();
        assert_eq!(format_bound(&instant), "2020-02-27T18:27:05.000Z");
    }
}
