//! Day-based streak rules.
//!
//! A streak counts consecutive calendar days with at least one confirmed
//! decision. One idle day is tolerated until the next load; a gap of two or
//! more days breaks it.

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Streak value after confirming a decision now.
///
/// - last success yesterday: extend by one
/// - no last success, or older than yesterday: start over at 1
/// - already succeeded today: unchanged
pub fn streak_after_confirm<C: Clock + ?Sized>(
    current: u32,
    last_success_at: Option<DateTime<Utc>>,
    clock: &C,
) -> u32 {
    match last_success_at {
        Some(at) if clock.is_yesterday(at) => current.saturating_add(1),
        Some(at) if clock.is_today(at) => current,
        _ => 1,
    }
}

/// Whether more than one calendar day has passed since the last success.
pub fn is_streak_broken<C: Clock + ?Sized>(last_success_at: Option<DateTime<Utc>>, clock: &C) -> bool {
    last_success_at.is_some_and(|at| clock.days_since(at) > 1)
}
