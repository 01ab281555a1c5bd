// src/services/dates.rs
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Source of "now" for a job run.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Horoscope date key (`DD/MM/YYYY`) for `now` as seen in `zone`.
pub fn format_horoscope_date(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone).format("%d/%m/%Y").to_string()
}

/// ISO-8601 instant with millisecond precision, e.g. `2025-01-01T06:30:00.000Z`.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
