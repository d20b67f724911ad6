use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::fmt;

use crate::error::AdminError;

/// Window of trade history selected for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradePeriod {
    /// Since the start of the current UTC day
    Day,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    All,
    /// Inclusive range on entry time
    Custom { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl TradePeriod {
    /// Named period. Unknown names select everything.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "day" | "today" => TradePeriod::Day,
            "week" => TradePeriod::Week,
            "month" => TradePeriod::Month,
            _ => TradePeriod::All,
        }
    }

    pub fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AdminError> {
        if start > end {
            return Err(AdminError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(TradePeriod::Custom { start, end })
    }

    /// Custom range from two date arguments. A bare end date covers that whole day.
    pub fn from_range(start: &str, end: &str) -> Result<Self, AdminError> {
        let start = parse_bound(start, false)?;
        let end = parse_bound(end, true)?;
        Self::custom(start, end)
    }

    /// Entry-time bounds (inclusive) for this period as seen at `now`
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            TradePeriod::Day => (Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()), None),
            TradePeriod::Week => (Some(now - Duration::days(7)), None),
            TradePeriod::Month => (Some(now - Duration::days(30)), None),
            TradePeriod::All => (None, None),
            TradePeriod::Custom { start, end } => (Some(*start), Some(*end)),
        }
    }
}

impl fmt::Display for TradePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradePeriod::Day => write!(f, "day"),
            TradePeriod::Week => write!(f, "week"),
            TradePeriod::Month => write!(f, "month"),
            TradePeriod::All => write!(f, "all"),
            TradePeriod::Custom { start, end } => write!(f, "{} .. {}", start.to_rfc3339(), end.to_rfc3339()),
        }
    }
}

fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AdminError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AdminError::InvalidDate(raw.to_string()))?;
    let start_of_day = date.and_time(NaiveTime::MIN).and_utc();
    if end_of_day {
        Ok(start_of_day + Duration::days(1) - Duration::microseconds(1))
    } else {
        Ok(start_of_day)
    }
}
