//! Wall-clock access and calendar-day arithmetic.
//!
//! "Today", "yesterday" and "days since" are always computed on calendar
//! dates in a fixed UTC offset, never by subtracting raw timestamps. A
//! decision made at 23:59 and checked at 00:01 is from yesterday.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Source of the current instant and the offset that defines a local day.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Offset used to map instants onto local calendar dates.
    fn offset(&self) -> FixedOffset;

    /// Local calendar date of `at`.
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset()).date_naive()
    }

    /// Today's local calendar date.
    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// Whether `at` falls on today's local date.
    fn is_today(&self, at: DateTime<Utc>) -> bool {
        self.local_date(at) == self.today()
    }

    /// Whether `at` falls on the local date before today.
    fn is_yesterday(&self, at: DateTime<Utc>) -> bool {
        self.today().pred_opt() == Some(self.local_date(at))
    }

    /// Whole calendar days from `at` to today (negative if `at` is in the future).
    fn days_since(&self, at: DateTime<Utc>) -> i64 {
        days_between(self.local_date(at), self.today())
    }
}

/// Calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// The machine clock.
///
/// Without a pinned offset, the local offset is sampled at every call so a
/// long-running session follows DST changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pinned: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `offset_minutes` east of UTC instead of the machine's local offset.
    /// Out-of-range offsets fall back to the machine's offset.
    pub fn with_offset_minutes(offset_minutes: i32) -> Self {
        Self {
            pinned: offset_minutes.checked_mul(60).and_then(FixedOffset::east_opt),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.pinned
            .unwrap_or_else(|| Local::now().offset().fix())
    }
}

/// A settable clock for tests and simulations.
///
/// Clones share the same instant, so a test can keep a handle while the
/// model owns another and move time forward between operations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Clock frozen at `now`, interpreting days in UTC.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn today_and_yesterday_use_calendar_days() {
        let clock = ManualClock::new(at(2026, 3, 10, 0, 5));
        // Ten minutes earlier is only a short span but a different date.
        assert!(clock.is_yesterday(at(2026, 3, 9, 23, 55)));
        assert!(!clock.is_today(at(2026, 3, 9, 23, 55)));
        assert!(clock.is_today(at(2026, 3, 10, 0, 0)));
    }

    #[test]
    fn days_since_counts_date_boundaries() {
        let clock = ManualClock::new(at(2026, 3, 10, 8, 0));
        assert_eq!(clock.days_since(at(2026, 3, 10, 7, 0)), 0);
        assert_eq!(clock.days_since(at(2026, 3, 9, 9, 0)), 1);
        assert_eq!(clock.days_since(at(2026, 3, 8, 23, 59)), 2);
        assert_eq!(clock.days_since(at(2026, 3, 11, 0, 1)), -1);
    }

    #[test]
    fn offset_shifts_local_date() {
        // 23:30 UTC is already the next morning at UTC+9.
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let clock = ManualClock::with_offset(at(2026, 3, 10, 23, 30), kst);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert!(clock.is_yesterday(at(2026, 3, 10, 0, 0)));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(at(2026, 3, 10, 12, 0));
        let handle = clock.clone();
        handle.advance_days(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 12).unwrap());
    }

    #[test]
    fn system_clock_respects_pinned_offset() {
        let clock = SystemClock::with_offset_minutes(-300);
        assert_eq!(clock.offset(), FixedOffset::west_opt(5 * 3600).unwrap());
    }

    #[test]
    fn out_of_range_offset_falls_back_to_local() {
        for minutes in [40_000_000, i32::MIN, 24 * 60] {
            let clock = SystemClock::with_offset_minutes(minutes);
            assert_eq!(clock.offset(), SystemClock::new().offset(), "{minutes}");
        }
    }
}
