// src/services/store.rs
use async_trait::async_trait;
use log::{debug, info};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::error::StoreError;
use crate::models::{HoroscopePrediction, ZodiacSign};

/// Key-value table of horoscopes, keyed by (zodiac, date).
#[async_trait]
pub trait HoroscopeStore: Send + Sync {
    /// Insert or overwrite the record for its (zodiac, date) key. Not retried.
    async fn put(&self, record: &HoroscopePrediction) -> Result<(), StoreError>;

    async fn get(&self, zodiac: ZodiacSign, date: &str) -> Result<Option<HoroscopePrediction>, StoreError>;

    /// All records for `date`, ordered by zodiac.
    async fn list_for_date(&self, date: &str) -> Result<Vec<HoroscopePrediction>, StoreError>;
}

fn validate_keys(record: &HoroscopePrediction) -> Result<(), StoreError> {
    if record.zodiac.trim().is_empty() {
        return Err(StoreError::InvalidKey("zodiac"));
    }
    if record.date.trim().is_empty() {
        return Err(StoreError::InvalidKey("date"));
    }
    Ok(())
}

fn zodiac_order(record: &HoroscopePrediction) -> u32 {
    record.zodiac.parse().unwrap_or(u32::MAX)
}

/// In-process table. Backs the tests and the service when no Redis is configured.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<(String, String), HoroscopePrediction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HoroscopeStore for MemoryStore {
    async fn put(&self, record: &HoroscopePrediction) -> Result<(), StoreError> {
        validate_keys(record)?;
        self.records
            .write()
            .await
            .insert((record.zodiac.clone(), record.date.clone()), record.clone());
        Ok(())
    }

    async fn get(&self, zodiac: ZodiacSign, date: &str) -> Result<Option<HoroscopePrediction>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(&(zodiac.key(), date.to_string()))
            .cloned())
    }

    async fn list_for_date(&self, date: &str) -> Result<Vec<HoroscopePrediction>, StoreError> {
        let mut records: Vec<HoroscopePrediction> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        records.sort_by_key(zodiac_order);
        Ok(records)
    }
}

/// Redis-backed table. Each record is a JSON string under
/// `{table}:{zodiac}:{date}`; `{table}:date:{date}` is a set of the zodiacs
/// written for that date.
pub struct RedisStore {
    conn: MultiplexedConnection,
    table: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, table: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Connected to Redis for table {}", table);
        Ok(RedisStore {
            conn,
            table: table.to_string(),
        })
    }

    fn record_key(&self, zodiac: &str, date: &str) -> String {
        format!("{}:{}:{}", self.table, zodiac, date)
    }

    fn date_index_key(&self, date: &str) -> String {
        format!("{}:date:{}", self.table, date)
    }
}

#[async_trait]
impl HoroscopeStore for RedisStore {
    async fn put(&self, record: &HoroscopePrediction) -> Result<(), StoreError> {
        validate_keys(record)?;
        let payload = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();

        redis::pipe()
            .atomic()
            .set(self.record_key(&record.zodiac, &record.date), payload)
            .ignore()
            .sadd(self.date_index_key(&record.date), &record.zodiac)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        debug!("Stored zodiac {} for {}", record.zodiac, record.date);
        Ok(())
    }

    async fn get(&self, zodiac: ZodiacSign, date: &str) -> Result<Option<HoroscopePrediction>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.record_key(&zodiac.key(), date)).await?;
        Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
    }

    async fn list_for_date(&self, date: &str) -> Result<Vec<HoroscopePrediction>, StoreError> {
        let mut conn = self.conn.clone();
        let zodiacs: Vec<String> = conn.smembers(self.date_index_key(date)).await?;
        if zodiacs.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = zodiacs.iter().map(|z| self.record_key(z, date)).collect();
        let raw: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        let mut records = raw
            .into_iter()
            .flatten()
            .map(|s| serde_json::from_str::<HoroscopePrediction>(&s))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(zodiac_order);
        Ok(records)
    }
}
