//! Slot generation from opening hours
//!
//! Slots step through local wall-clock time from `open` while the start is
//! strictly before `close`. Each wall time is then pinned to an instant in
//! the business timezone:
//! - a wall time inside a spring-forward gap does not exist and is skipped
//! - a wall time inside a fall-back overlap resolves to its earliest instant

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Pin a local date + time to an instant, using the policy above
pub fn resolve_local(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// Lazy, finite, restartable (via `Clone`) sequence of slot starts
#[derive(Debug, Clone)]
pub struct SlotStarts {
    next: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
    tz: Tz,
}

impl Iterator for SlotStarts {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let wall = self.next;
            // past the last representable datetime: stop here
            self.next = wall.checked_add_signed(self.step).unwrap_or(self.end);
            if let Some(instant) = self.tz.from_local_datetime(&wall).earliest() {
                return Some(instant);
            }
        }
        None
    }
}

/// Slot starts of `date` between `open` (inclusive) and `close` (exclusive)
///
/// A non-positive duration yields no slots.
pub fn generate_slots(
    date: NaiveDate,
    open: NaiveTime,
    close: NaiveTime,
    duration_minutes: i32,
    tz: Tz,
) -> SlotStarts {
    let start = date.and_time(open);
    let end = if duration_minutes > 0 {
        date.and_time(close)
    } else {
        start
    };
    SlotStarts {
        next: start,
        end,
        step: Duration::minutes(i64::from(duration_minutes.max(1))),
        tz,
    }
}
