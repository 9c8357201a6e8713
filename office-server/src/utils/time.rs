//! Time helpers for reporting windows

use chrono::{DateTime, Duration, Utc};

/// Reporting period accepted by the dashboard endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Parse a query-string period, defaulting to month (原系统默认值)
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("week") => Period::Week,
            Some("year") => Period::Year,
            _ => Period::Month,
        }
    }

    /// Query-string form
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Window length
    pub fn duration(self) -> Duration {
        match self {
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
            Period::Year => Duration::days(365),
        }
    }

    /// Window start (epoch millis) relative to `now`
    pub fn start_millis(self, now: DateTime<Utc>) -> i64 {
        (now - self.duration()).timestamp_millis()
    }
}
