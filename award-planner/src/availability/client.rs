//! Availability HTTP client.
//!
//! Provides async methods for the two upstream calls the planner needs: the
//! per-date availability calendar for a route, and the seat detail (raw
//! flight records) behind one calendar row.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Route;

use super::error::AvailabilityError;
use super::types::{AvailabilityEntry, RawFlightRecord, SeatsResponse};

/// Default base URL for the availability backend.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Header carrying the opaque partner credential.
const AUTH_HEADER: &str = "Partner-Authorization";

/// Configuration for the availability client.
#[derive(Debug, Clone)]
pub struct AvailabilityConfig {
    /// Partner credential, sent verbatim
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AvailabilityConfig {
    /// Create a new config with the given partner credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Availability API client.
///
/// Uses a semaphore to limit concurrent requests so a wide date window does
/// not fan out into an unbounded burst.
#[derive(Debug, Clone)]
pub struct AvailabilityClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl AvailabilityClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AvailabilityConfig) -> Result<Self, AvailabilityError> {
        if config.api_key.is_empty() {
            return Err(AvailabilityError::BadCredential("is empty"));
        }

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| AvailabilityError::BadCredential("is not a valid header value"))?;
        headers.insert(AUTH_HEADER, api_key);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch the availability calendar for every hop of `route`.
    ///
    /// `from_date` restricts the calendar to dates on or after it.
    pub async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        let url = format!("{}/api/availability", self.base_url);

        let mut query = vec![("route", route.to_string())];
        if let Some(date) = from_date {
            query.push(("from", date.format("%Y-%m-%d").to_string()));
        }

        let request = self.http.get(&url).query(&query);
        self.send_json(request, None).await
    }

    /// Fetch the raw flight records behind one availability row.
    pub async fn fetch_legs(
        &self,
        segment_id: &str,
    ) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        let url = format!("{}/api/seats/{}", self.base_url, segment_id);

        let request = self.http.get(&url).header("Segment-ID", segment_id);
        let response: SeatsResponse = self.send_json(request, Some(segment_id)).await?;
        let records = response.into_records();

        debug!(segment_id, records = records.len(), "fetched seat records");
        Ok(records)
    }

    /// Send a request under the concurrency limit and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        segment_id: Option<&str>,
    ) -> Result<T, AvailabilityError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AvailabilityError::Closed)?;

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AvailabilityError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(AvailabilityError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = segment_id {
                return Err(AvailabilityError::SegmentNotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AvailabilityError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| AvailabilityError::Payload {
            payload: if segment_id.is_some() { "seats" } else { "calendar" },
            message: e.to_string(),
            excerpt: body.chars().take(500).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AvailabilityConfig::new("secret");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = AvailabilityConfig::new("secret")
            .with_base_url("https://seats.example.com/")
            .with_max_concurrent(0)
            .with_timeout(5);
        assert_eq!(config.base_url, "https://seats.example.com");
        assert_eq!(config.max_concurrent, 1);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn empty_credential_rejected() {
        let result = AvailabilityClient::new(AvailabilityConfig::new(""));
        assert!(matches!(result, Err(AvailabilityError::BadCredential("is empty"))));
    }

    #[test]
    fn credential_with_newline_rejected() {
        let result = AvailabilityClient::new(AvailabilityConfig::new("abc\ndef"));
        assert!(matches!(result, Err(AvailabilityError::BadCredential(_))));
    }

    #[test]
    fn client_builds_with_valid_credential() {
        assert!(AvailabilityClient::new(AvailabilityConfig::new("pk_live_123")).is_ok());
    }
}
