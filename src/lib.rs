// src/lib.rs
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::config::Config;
use crate::services::job::HoroscopeJob;
use crate::services::provider::VedicAstroClient;
use crate::services::store::{HoroscopeStore, MemoryStore, RedisStore};

/// Wire the live provider and the configured store into a job.
pub async fn build_job(config: &Config) -> Result<HoroscopeJob> {
    let provider = Arc::new(VedicAstroClient::new(config)?);

    let store: Arc<dyn HoroscopeStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url, &config.table_name).await?),
        None => {
            warn!("REDIS_URL not set, horoscopes will be kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    info!(
        "Horoscope job configured: table={}, lang={}, delay={}ms, zone={}",
        config.table_name, config.lang, config.inter_call_delay_ms, config.date_zone
    );
    Ok(HoroscopeJob::new(config, provider, store))
}
