//! Exchange trading-session gate
//!
//! NSE equity derivatives trade 09:15–15:30 IST. Outside the session the
//! option chain is stale, so cycles skip the fetch entirely.

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// IST is UTC+05:30
pub const IST_OFFSET_MINUTES: i32 = 330;

/// Timestamp format shown on the dashboard, e.g. "20-Dec-2024 10:42:07"
pub const DISPLAY_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Session window settings (TOML `[market_hours]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub utc_offset_minutes: i32,
    /// When false every moment counts as in-session
    pub enforce: bool,
}

impl Default for MarketHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or_default(),
            utc_offset_minutes: IST_OFFSET_MINUTES,
            enforce: true,
        }
    }
}

impl MarketHours {
    pub fn always_open() -> Self {
        Self {
            enforce: false,
            ..Self::default()
        }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .or_else(|| FixedOffset::east_opt(IST_OFFSET_MINUTES * 60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Exchange-local wall clock for `now`
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset())
    }

    /// True when `now` falls inside [open, close] exchange time (inclusive)
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        if !self.enforce {
            return true;
        }
        let time = self.local(now).time();
        self.open <= time && time <= self.close
    }

    /// Dashboard timestamp in exchange-local time
    pub fn display_timestamp(&self, now: DateTime<Utc>) -> String {
        self.local(now).format(DISPLAY_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 20, h, m, 0).unwrap()
    }

    #[test]
    fn test_session_bounds_in_ist() {
        let hours = MarketHours::default();
        // 03:45 UTC = 09:15 IST
        assert!(!hours.is_open_at(utc(3, 44)));
        assert!(hours.is_open_at(utc(3, 45)));
        // 10:00 UTC = 15:30 IST
        assert!(hours.is_open_at(utc(10, 0)));
        assert!(!hours.is_open_at(utc(10, 1)));
    }

    #[test]
    fn test_not_enforced_is_always_open() {
        assert!(MarketHours::always_open().is_open_at(utc(22, 0)));
    }

    #[test]
    fn test_display_timestamp() {
        let hours = MarketHours::default();
        assert_eq!(hours.display_timestamp(utc(5, 12)), "20-Dec-2024 10:42:00");
    }
}
