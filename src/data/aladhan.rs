//! AlAdhan calendar API client.
//!
//! One request per month the window touches, issued concurrently and joined;
//! the first failure fails the whole fetch.

use std::time::Duration;

use futures::future::try_join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::normalize::{normalize, MonthlyPayload};
use super::{DayRecord, RamadanWindow};
use crate::{Error, Result};

/// Where and how to query the prayer-time source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Calculation method id (11 = MUIS, used across South-East Asia)
    pub method: u32,
    /// IANA timezone the times are expressed in
    pub timezone: String,
    /// Bound on each request in milliseconds
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.aladhan.com/v1".to_string(),
            method: 11,
            timezone: "Asia/Bangkok".to_string(),
            timeout_ms: 15_000,
        }
    }
}

pub struct AladhanClient {
    client: Client,
    config: SourceConfig,
}

impl AladhanClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// URL of the monthly calendar for a coordinate. `month` is 1-based.
    pub fn month_url(&self, lat: f64, lng: f64, year: i32, month: u32) -> Result<url::Url> {
        let base = format!("{}/calendar/{}/{}", self.config.base_url.trim_end_matches('/'), year, month);
        url::Url::parse_with_params(
            &base,
            &[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("method", self.config.method.to_string()),
                ("timezone", self.config.timezone.clone()),
            ],
        )
        .map_err(|e| Error::ConfigError(format!("Invalid source URL {}: {}", base, e)))
    }

    /// Fetch one monthly payload. Non-2xx statuses and payload codes other
    /// than 200 are errors.
    pub async fn fetch_month(&self, lat: f64, lng: f64, year: i32, month: u32) -> Result<MonthlyPayload> {
        let url = self.month_url(lat, lng, year, month)?;
        log::info!("[AlAdhan] {}", url);

        let resp = self.client.get(url.clone()).send().await.map_err(|e| self.map_reqwest(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!("{} returned HTTP {}", url, status.as_u16())));
        }

        // Error payloads carry a string in `data`, so check the code first.
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::DataFormatError(format!("Failed to decode {}: {}", url, e)))?;
        let code = body.get("code").and_then(serde_json::Value::as_i64).unwrap_or_default();
        if code != 200 {
            let status = body.get("status").and_then(serde_json::Value::as_str).unwrap_or_default();
            return Err(Error::SourceStatus { code, status: status.to_string() });
        }
        serde_json::from_value(body).map_err(|e| Error::DataFormatError(format!("Unexpected payload from {}: {}", url, e)))
    }

    /// Fetch every month of `window` concurrently and normalise the result.
    pub async fn fetch_window(&self, lat: f64, lng: f64, window: &RamadanWindow) -> Result<Vec<DayRecord>> {
        let requests = window
            .months()
            .into_iter()
            .map(|(year, month)| self.fetch_month(lat, lng, year, month));
        let payloads = try_join_all(requests).await?;
        normalize(&payloads, window)
    }

    fn map_reqwest(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.config.timeout_ms)
        } else {
            Error::NetworkError(e.to_string())
        }
    }
}
