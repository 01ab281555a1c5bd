// src/services/provider.rs
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde_json::Value;

use super::error::ProviderError;
use crate::config::Config;
use crate::models::ZodiacSign;

/// Terse prediction payload (default response form).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSummary(pub Value);

/// Split/big response form: category breakdown plus lucky attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetail(pub Value);

#[async_trait]
pub trait HoroscopeProvider: Send + Sync {
    async fn fetch_summary(&self, zodiac: ZodiacSign, date: &str) -> Result<RawSummary, ProviderError>;

    async fn fetch_detail(&self, zodiac: ZodiacSign, date: &str) -> Result<RawDetail, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseForm {
    Summary,
    Detail,
}

/// Client for the Vedic Astro daily sun-sign endpoint.
pub struct VedicAstroClient {
    client: Client,
    base_url: String,
    api_key: String,
    lang: String,
    timeout_secs: u64,
}

impl VedicAstroClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;
        Ok(VedicAstroClient {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            lang: config.lang.clone(),
            timeout_secs: config.http_timeout_secs,
        })
    }

    fn query_params(&self, zodiac: ZodiacSign, date: &str, form: ResponseForm) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("zodiac", zodiac.key()),
            ("date", date.to_string()),
            ("show_same", "true".to_string()),
            ("lang", self.lang.clone()),
            ("api_key", self.api_key.clone()),
        ];
        if form == ResponseForm::Detail {
            params.push(("split", "true".to_string()));
            params.push(("type", "big".to_string()));
        }
        params
    }

    async fn fetch(&self, zodiac: ZodiacSign, date: &str, form: ResponseForm) -> Result<Value, ProviderError> {
        info!("Fetching {:?} horoscope for {} ({}) on {}", form, zodiac, zodiac.id(), date);

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(zodiac, date, form))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider returned {} for {}: {}", status, zodiac, body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Malformed(format!("invalid JSON: {}", e)))?;
        debug!("Provider payload for {}: {}", zodiac, body);

        unwrap_envelope(body)
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Http(err)
        }
    }
}

#[async_trait]
impl HoroscopeProvider for VedicAstroClient {
    async fn fetch_summary(&self, zodiac: ZodiacSign, date: &str) -> Result<RawSummary, ProviderError> {
        self.fetch(zodiac, date, ResponseForm::Summary).await.map(RawSummary)
    }

    async fn fetch_detail(&self, zodiac: ZodiacSign, date: &str) -> Result<RawDetail, ProviderError> {
        self.fetch(zodiac, date, ResponseForm::Detail).await.map(RawDetail)
    }
}

/// The provider wraps payloads as `{"status": 200, "response": {...}}`. A
/// non-200 envelope status is an error whether or not `response` is present,
/// with the message taken from `response`, then `message`, then the whole
/// body. Bodies without an envelope are returned as-is.
pub fn unwrap_envelope(body: Value) -> Result<Value, ProviderError> {
    let mut body = match body {
        Value::Object(map) => map,
        other => {
            return Err(ProviderError::Malformed(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    if let Some(status) = body.get("status").and_then(Value::as_i64) {
        if status != 200 {
            let message = body
                .get("response")
                .or_else(|| body.get("message"))
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| Value::Object(body.clone()).to_string());
            return Err(ProviderError::Provider { status, message });
        }
    }

    let Some(inner) = body.remove("response") else {
        return Ok(Value::Object(body));
    };

    match inner {
        Value::Object(_) => Ok(inner),
        other => Err(ProviderError::Malformed(format!(
            "expected 'response' to be an object, got {}",
            other
        ))),
    }
}
