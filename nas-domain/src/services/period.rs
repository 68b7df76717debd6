use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Utc, Weekday};

use crate::error::DomainError;
use crate::utils::datetime_to_seconds;

const PERIOD_DAYS: i64 = 7;

/// The weekly instant at which a new send period begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAnchor {
    pub weekday: Weekday,
    pub hour: u32,
    pub utc_offset_minutes: i32,
}

impl Default for PeriodAnchor {
    fn default() -> Self {
        Self {
            weekday: Weekday::Mon,
            hour: 0,
            utc_offset_minutes: 0,
        }
    }
}

impl PeriodAnchor {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub previous_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
}

impl PeriodWindow {
    /// The period containing `now`: it starts at the latest anchor occurrence at or before `now`.
    pub fn containing(now: DateTime<Utc>, anchor: &PeriodAnchor) -> Self {
        let offset = anchor.offset();
        let local = now.with_timezone(&offset);
        let days_back = (PERIOD_DAYS + i64::from(local.weekday().num_days_from_monday())
            - i64::from(anchor.weekday.num_days_from_monday()))
            % PERIOD_DAYS;
        let anchor_date = local.date_naive() - Duration::days(days_back);
        let anchor_time =
            NaiveTime::from_hms_opt(anchor.hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        let local_start = anchor_date.and_time(anchor_time);
        let utc_start = local_start - Duration::seconds(i64::from(offset.local_minus_utc()));
        let mut current_start = Utc.from_utc_datetime(&utc_start);
        if current_start > now {
            current_start -= Duration::days(PERIOD_DAYS);
        }
        Self {
            previous_start: current_start - Duration::days(PERIOD_DAYS),
            current_start,
        }
    }

    pub fn current_start_seconds(&self) -> f64 {
        datetime_to_seconds(self.current_start)
    }

    pub fn previous_start_seconds(&self) -> f64 {
        datetime_to_seconds(self.previous_start)
    }
}

pub fn parse_weekday(value: &str) -> Result<Weekday, DomainError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| DomainError::InvalidWeekday(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn monday_midnight_anchor_starts_at_latest_monday() {
        // 2026-10-14 is a Wednesday
        let window = PeriodWindow::containing(at(2026, 10, 14, 15, 30), &PeriodAnchor::default());
        assert_eq!(window.current_start, at(2026, 10, 12, 0, 0));
        assert_eq!(window.previous_start, at(2026, 10, 5, 0, 0));
    }

    #[test]
    fn anchor_instant_itself_opens_the_new_period() {
        let window = PeriodWindow::containing(at(2026, 10, 12, 0, 0), &PeriodAnchor::default());
        assert_eq!(window.current_start, at(2026, 10, 12, 0, 0));
    }

    #[test]
    fn same_weekday_before_anchor_hour_falls_back_a_week() {
        let anchor = PeriodAnchor {
            weekday: Weekday::Mon,
            hour: 9,
            utc_offset_minutes: 0,
        };
        let window = PeriodWindow::containing(at(2026, 10, 12, 8, 59), &anchor);
        assert_eq!(window.current_start, at(2026, 10, 5, 9, 0));
    }

    #[test]
    fn offset_shifts_the_local_weekday() {
        // Monday 00:00 at UTC+9 is Sunday 15:00 UTC
        let anchor = PeriodAnchor {
            weekday: Weekday::Mon,
            hour: 0,
            utc_offset_minutes: 9 * 60,
        };
        let window = PeriodWindow::containing(at(2026, 10, 11, 16, 0), &anchor);
        assert_eq!(window.current_start, at(2026, 10, 11, 15, 0));
        let before = PeriodWindow::containing(at(2026, 10, 11, 14, 59), &anchor);
        assert_eq!(before.current_start, at(2026, 10, 4, 15, 0));
    }

    #[test]
    fn seven_days_ago_always_lands_in_previous_period() {
        let anchor = PeriodAnchor::default();
        for hour in [0, 6, 12, 23] {
            let now = at(2026, 10, 15, hour, 0);
            let window = PeriodWindow::containing(now, &anchor);
            let week_ago = now - Duration::days(7);
            assert!(week_ago >= window.previous_start && week_ago < window.current_start);
        }
    }

    #[test]
    fn parse_weekday_accepts_names() {
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday(" Fri ").unwrap(), Weekday::Fri);
        assert!(parse_weekday("someday").is_err());
    }
}
