use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timestamp layout used everywhere a timestamp crosses a boundary (SQLite
/// column, chart filename titles, log lines). Lexicographic order of the
/// rendered string equals temporal order, which the range queries rely on.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One observed (tenant, service, status) sample at a point in time.
///
/// Created by the poller, appended to the datastore, and never mutated;
/// retention pruning is the only delete path. All records emitted by one
/// poll cycle for one tenant share an identical timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub tenant: String,
    pub timestamp: NaiveDateTime,
    pub service: String,
    pub status: String,
}

impl StatusRecord {
    pub fn new(
        tenant: impl Into<String>,
        timestamp: NaiveDateTime,
        service: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            timestamp,
            service: service.into(),
            status: status.into(),
        }
    }

    /// Timestamp rendered in the datastore layout.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Parse a datastore timestamp string back into a `NaiveDateTime`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}

/// Current UTC wall clock truncated to second precision.
pub fn now_utc() -> NaiveDateTime {
    let now = chrono::Utc::now().naive_utc();
    // Drop sub-second precision so the stored string round-trips exactly.
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_string_round_trips() {
        let ts = parse_timestamp("2026-03-01 12:30:05").unwrap();
        let record = StatusRecord::new("acme", ts, "Intune", "serviceOperational");
        assert_eq!(record.timestamp_string(), "2026-03-01 12:30:05");
        assert_eq!(parse_timestamp(&record.timestamp_string()).unwrap(), ts);
    }

    #[test]
    fn now_utc_has_no_subsecond_precision() {
        assert_eq!(now_utc().and_utc().timestamp_subsec_nanos(), 0);
    }
}
