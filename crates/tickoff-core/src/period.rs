//! Expiration period strategies
//!
//! Each period is a pure, total function of `now`: given the commit
//! instant, it computes the instant the freshly minted token should
//! expire. The set of periods is closed on purpose; their boundary
//! arithmetic is load-bearing and pinned by tests.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveTime, Utc};
use std::time::Duration;

/// Strategy for computing a new token's expiry instant.
///
/// Calendar variants use the clock's local time zone and expire on the
/// last second of the calendar unit (e.g. `Today` expires at 23:59:59
/// local time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// Valid for a fixed span from the commit instant
    ValidFor(Duration),

    /// Valid until the last second of the current calendar day
    Today,

    /// Valid until the last second of the current week. Weeks start on
    /// Monday, so this is the current Sunday at 23:59:59 for every
    /// weekday, Monday included.
    ThisWeek,

    /// Valid until the last second of the current calendar month
    ThisMonth,
}

impl Period {
    /// Compute the expiry instant for a token committed at `now`.
    pub fn expires_on(&self, now: DateTime<Local>) -> DateTime<Local> {
        match self {
            Period::ValidFor(d) => {
                // Spans beyond chrono's range saturate at the far future.
                let span = chrono::Duration::from_std(*d).unwrap_or(chrono::Duration::MAX);
                now.checked_add_signed(span)
                    .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.with_timezone(&Local))
            }
            Period::Today => days_after_minus_second(start_of_day(now), 1),
            Period::ThisWeek => {
                let days = 7 - u64::from(now.weekday().num_days_from_monday());
                days_after_minus_second(start_of_day(now), days)
            }
            Period::ThisMonth => {
                let today = now.date_naive();
                let first = today.with_day(1).unwrap_or(today);
                let next_month = first.checked_add_months(Months::new(1)).unwrap_or(first);
                let midnight = next_month
                    .and_time(NaiveTime::MIN)
                    .and_local_timezone(Local)
                    .earliest()
                    .unwrap_or(now);
                midnight - chrono::Duration::seconds(1)
            }
        }
    }
}

/// Local midnight of `now`'s calendar day. Midnight can be skipped by a
/// DST transition; take the earliest instant that exists.
fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    now.with_time(NaiveTime::MIN).earliest().unwrap_or(now)
}

/// `midnight + days − 1 second`, i.e. 23:59:59 on the day before the
/// boundary.
fn days_after_minus_second(midnight: DateTime<Local>, days: u64) -> DateTime<Local> {
    midnight
        .checked_add_days(Days::new(days))
        .map(|boundary| boundary - chrono::Duration::seconds(1))
        .unwrap_or(midnight)
}
