// src/config.rs
use chrono_tz::Tz;
use log::info;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.vedicastroapi.com/v3/horoscope/daily/sun";
pub const DEFAULT_TABLE_NAME: &str = "DailyHoroscope-dev";
/// 18:35 UTC is 00:05 in Asia/Kolkata, just after the horoscope date rolls over.
pub const DEFAULT_CRON: &str = "0 35 18 * * *";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// What to do when one sign fails part-way through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort on the first failing sign.
    #[default]
    FailFast,
    /// Attempt every sign, then report all failures together.
    ContinueOnError,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(FailurePolicy::FailFast),
            "continue" | "continue-on-error" | "continue_on_error" => {
                Ok(FailurePolicy::ContinueOnError)
            }
            other => Err(format!("expected 'fail-fast' or 'continue', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub lang: String,
    pub table_name: String,
    pub inter_call_delay_ms: u64,
    pub date_zone: Tz,
    pub http_timeout_secs: u64,
    pub failure_policy: FailurePolicy,
    pub cron: String,
    pub redis_url: Option<String>,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first if a `.env`
    /// file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests never touch the real
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("VEDIC_ASTRO_API_KEY").ok_or(ConfigError::Missing("VEDIC_ASTRO_API_KEY"))?;

        // A zero reqwest timeout fails every request before it is sent.
        let http_timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), "20")?;
        if http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            api_key,
            api_base_url: get("VEDIC_ASTRO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            lang: get("HOROSCOPE_LANG").unwrap_or_else(|| "en".to_string()),
            table_name: get("STORAGE_HOROSCOPES_NAME")
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            inter_call_delay_ms: parse_or("INTER_CALL_DELAY_MS", get("INTER_CALL_DELAY_MS"), "1000")?,
            date_zone: parse_or("HOROSCOPE_TIMEZONE", get("HOROSCOPE_TIMEZONE"), "Asia/Kolkata")?,
            http_timeout_secs,
            failure_policy: parse_or(
                "HOROSCOPE_FAILURE_POLICY",
                get("HOROSCOPE_FAILURE_POLICY"),
                "fail-fast",
            )?,
            cron: get("HOROSCOPE_CRON").unwrap_or_else(|| DEFAULT_CRON.to_string()),
            redis_url: get("REDIS_URL"),
            port: parse_or("PORT", get("PORT"), "3030")?,
        })
    }

    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = value.unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
