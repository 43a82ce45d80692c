//! HTTP page fetcher with rate limiting, validation and retry
//!
//! One request at a time, spaced by the configured delay. Responses are
//! checked before their body is handed to the extraction core.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, error, info, warn};

use super::config::HttpConfig;
use super::fetch_error::FetchError;
use super::retry_policy::{FailureClass, RetryPolicy};
use crate::domain::ports::PageFetcher;

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern must compile"));

/// Page titles that mark an error page served with a success status
const ERROR_TITLE_MARKERS: &[&str] = &[
    "error 404",
    "404 -",
    "404 |",
    "404 error",
    "page not found",
    "access denied",
    "service unavailable",
    "too many requests",
];

pub struct HttpPageFetcher {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    retry: RetryPolicy,
    min_body_bytes: usize,
}

impl HttpPageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        // A zero delay disables spacing
        let rate_limiter = Quota::with_period(Duration::from_millis(config.request_delay_ms)).map(RateLimiter::direct);

        Ok(Self {
            client,
            rate_limiter,
            retry: RetryPolicy::from_config(config),
            min_body_bytes: config.min_body_bytes,
        })
    }

    /// Fetch with retries; the returned error is the last one seen or `RetriesExhausted`.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            let class = RetryPolicy::classify(&error);
            if !self.retry.should_retry(class, attempt) {
                error!("❌ Fetch failed for {} after {} attempt(s): {}", url, attempt, error);
                return Err(match class {
                    FailureClass::NonRecoverable => error,
                    _ => FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last_error: error.to_string(),
                    },
                });
            }

            let delay = self.retry.delay_for(class, attempt);
            warn!(
                "Attempt {}/{} failed ({:?}): {}; retrying in {:?}",
                attempt,
                self.retry.max_attempts(),
                class,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        info!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| FetchError::transport(url, &e))?;

        validate_body(url, content_type.as_deref(), &body, self.min_body_bytes)?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(self.fetch_page(url).await?)
    }
}

/// Reject bodies that cannot be a product or category page.
pub fn validate_body(url: &str, content_type: Option<&str>, body: &str, min_bytes: usize) -> Result<(), FetchError> {
    match content_type {
        Some(kind) if !kind.to_ascii_lowercase().contains("html") => {
            warn!("Unexpected content type '{}' for {}", kind, url);
        }
        None => debug!("No content type for {}", url),
        _ => {}
    }

    if body.trim().len() < min_bytes {
        return Err(FetchError::rejected(
            url,
            format!("body has {} bytes, expected at least {}", body.trim().len(), min_bytes),
        ));
    }

    if let Some(title) = TITLE.captures(body).and_then(|caps| caps.get(1)) {
        let title = title.as_str().to_lowercase();
        if let Some(marker) = ERROR_TITLE_MARKERS.iter().find(|marker| title.contains(*marker)) {
            return Err(FetchError::rejected(url, format!("error page (title mentions '{marker}')")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str) -> String {
        format!("<html><head><title>{title}</title></head><body>{}</body></html>", "x".repeat(200))
    }

    #[test]
    fn test_fetcher_creation() {
        assert!(HttpPageFetcher::new(&HttpConfig::default()).is_ok());

        let unspaced = HttpConfig {
            request_delay_ms: 0,
            ..HttpConfig::default()
        };
        assert!(HttpPageFetcher::new(&unspaced).unwrap().rate_limiter.is_none());
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = HttpConfig {
            user_agent: "bad\nagent".to_string(),
            ..HttpConfig::default()
        };
        assert!(HttpPageFetcher::new(&config).is_err());
    }

    #[test]
    fn test_validation_accepts_product_page() {
        assert!(validate_body("u", Some("text/html; charset=utf-8"), &page("Zebra ZC300 | Shop"), 100).is_ok());
        // Wrong content type only warns
        assert!(validate_body("u", Some("application/json"), &page("Zebra ZC300"), 100).is_ok());
    }

    #[test]
    fn test_validation_rejects_short_and_error_pages() {
        assert!(matches!(
            validate_body("u", Some("text/html"), "<html></html>", 100),
            Err(FetchError::ContentRejected { .. })
        ));
        assert!(matches!(
            validate_body("u", Some("text/html"), &page("404 - Page Not Found"), 100),
            Err(FetchError::ContentRejected { .. })
        ));
        assert!(validate_body("u", None, &page("Access Denied"), 100).is_err());
        assert!(validate_body("u", None, &page("Error 404"), 100).is_err());
    }

    #[test]
    fn test_model_numbers_containing_404_are_accepted() {
        assert!(validate_body("u", Some("text/html"), &page("Fargo HDP404 | ID Card Printers"), 100).is_ok());
        assert!(validate_body("u", Some("text/html"), &page("Ribbon 54040 - Shop"), 100).is_ok());
    }
}
