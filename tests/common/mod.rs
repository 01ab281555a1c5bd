#![allow(dead_code)]

use astrokiran_horoscopes::config::{Config, FailurePolicy};
use astrokiran_horoscopes::models::{HoroscopePrediction, ZodiacSign};
use astrokiran_horoscopes::services::dates::Clock;
use astrokiran_horoscopes::services::error::{ProviderError, StoreError};
use astrokiran_horoscopes::services::job::{HoroscopeJob, RateLimit};
use astrokiran_horoscopes::services::provider::{HoroscopeProvider, RawDetail, RawSummary};
use astrokiran_horoscopes::services::store::{HoroscopeStore, MemoryStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const CATEGORIES: [&str; 9] = [
    "physique",
    "status",
    "finances",
    "relationship",
    "career",
    "travel",
    "family",
    "friends",
    "health",
];

pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "VEDIC_ASTRO_API_KEY" => Some("test-key".to_string()),
        "INTER_CALL_DELAY_MS" => Some("0".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn summary_for(zodiac: ZodiacSign) -> Value {
    json!({ "bot_response": { "overview": format!("{} has a steady day.", zodiac) } })
}

pub fn detail_for(zodiac: ZodiacSign) -> Value {
    let categories: serde_json::Map<String, Value> = CATEGORIES
        .iter()
        .map(|name| {
            (
                name.to_string(),
                json!({ "score": zodiac.id(), "split_response": format!("{} {}", zodiac, name) }),
            )
        })
        .collect();
    json!({
        "lucky_color": format!("color-{}", zodiac.id()),
        "lucky_number": zodiac.id(),
        "total_score": 50 + u32::from(zodiac.id()),
        "bot_response": categories,
    })
}

#[derive(Debug, Clone)]
pub enum Failure {
    Timeout,
    Status(u16),
    BadDetail,
}

/// Provider answering from canned payloads, with per-sign failures.
#[derive(Default)]
pub struct ScriptedProvider {
    failures: HashMap<ZodiacSign, Failure>,
    calls: Mutex<Vec<(ZodiacSign, String, &'static str)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, zodiac: ZodiacSign, failure: Failure) -> Self {
        self.failures.insert(zodiac, failure);
        self
    }

    pub fn calls(&self) -> Vec<(ZodiacSign, String, &'static str)> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, zodiac: ZodiacSign, date: &str, kind: &'static str) {
        self.calls.lock().unwrap().push((zodiac, date.to_string(), kind));
    }

    fn check(&self, zodiac: ZodiacSign) -> Result<(), ProviderError> {
        match self.failures.get(&zodiac) {
            Some(Failure::Timeout) => Err(ProviderError::Timeout(20)),
            Some(Failure::Status(code)) => Err(ProviderError::Status {
                status: *code,
                body: "upstream unavailable".to_string(),
            }),
            Some(Failure::BadDetail) | None => Ok(()),
        }
    }
}

#[async_trait]
impl HoroscopeProvider for ScriptedProvider {
    async fn fetch_summary(&self, zodiac: ZodiacSign, date: &str) -> Result<RawSummary, ProviderError> {
        self.record_call(zodiac, date, "summary");
        self.check(zodiac)?;
        Ok(RawSummary(summary_for(zodiac)))
    }

    async fn fetch_detail(&self, zodiac: ZodiacSign, date: &str) -> Result<RawDetail, ProviderError> {
        self.record_call(zodiac, date, "detail");
        self.check(zodiac)?;
        let mut detail = detail_for(zodiac);
        if let Some(Failure::BadDetail) = self.failures.get(&zodiac) {
            detail.as_object_mut().unwrap().remove("lucky_color");
        }
        Ok(RawDetail(detail))
    }
}

/// Store that refuses writes for one sign and delegates everything else.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_on: String,
}

#[async_trait]
impl HoroscopeStore for FailingStore {
    async fn put(&self, record: &HoroscopePrediction) -> Result<(), StoreError> {
        if record.zodiac == self.fail_on {
            return Err(StoreError::Unavailable("table is throttled".to_string()));
        }
        self.inner.put(record).await
    }

    async fn get(&self, zodiac: ZodiacSign, date: &str) -> Result<Option<HoroscopePrediction>, StoreError> {
        self.inner.get(zodiac, date).await
    }

    async fn list_for_date(&self, date: &str) -> Result<Vec<HoroscopePrediction>, StoreError> {
        self.inner.list_for_date(date).await
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Advances by `step` every time it is read.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        SteppingClock {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}

/// 2025-01-01 06:00 in Asia/Kolkata.
pub fn new_year_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 30, 0).unwrap()
}

pub fn job_with(
    provider: Arc<dyn HoroscopeProvider>,
    store: Arc<dyn HoroscopeStore>,
    clock: Arc<dyn Clock>,
    policy: FailurePolicy,
) -> HoroscopeJob {
    HoroscopeJob::new(&config(), provider, store)
        .with_clock(clock)
        .with_rate_limit(RateLimit::None)
        .with_failure_policy(policy)
}
