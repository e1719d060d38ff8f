use time::OffsetDateTime;

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local time zone, so calendar days (streaks, daily activity) match the
/// user's. Falls back to UTC when the local offset can't be determined.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}
