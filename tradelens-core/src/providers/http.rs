//! Shared blocking HTTP client for the collaborator adapters.
//!
//! Every request is bounded by the configured timeout. Connection failures,
//! timeouts, HTTP 429 and 5xx responses are retried with exponential backoff;
//! anything else fails immediately.

use crate::error::UpstreamError;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| UpstreamError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            max_retries: 1,
            base_delay: Duration::from_millis(250),
        })
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and decode a JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let resp = self.send(url, query)?;
        resp.json::<T>().map_err(|e| {
            UpstreamError::ResponseFormatChanged(format!("failed to parse response from {url}: {e}"))
        })
    }

    /// GET `url` and return the body as text.
    pub fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, UpstreamError> {
        let resp = self.send(url, query)?;
        resp.text()
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout.as_secs_f64()))
    }

    fn send(&self, url: &str, query: &[(&str, String)]) -> Result<Response, UpstreamError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(url, attempt, ?delay, "retrying upstream request");
                std::thread::sleep(delay);
            }

            let resp = match self.client.get(url).query(query).send() {
                Ok(resp) => resp,
                Err(e) => {
                    let retryable = e.is_connect() || e.is_timeout();
                    let err = UpstreamError::from_reqwest(e, self.timeout.as_secs_f64());
                    if retryable {
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }
            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = resp
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);
                    last_error = Some(UpstreamError::RateLimited {
                        retry_after_secs: retry_after,
                    });
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(UpstreamError::AuthenticationRequired(format!(
                        "HTTP {status} from {url}"
                    )));
                }
                s if s.is_server_error() => {
                    last_error = Some(UpstreamError::Other(format!("HTTP {status} from {url}")));
                }
                _ => return Err(UpstreamError::Other(format!("HTTP {status} from {url}"))),
            }
        }

        Err(last_error.unwrap_or_else(|| UpstreamError::Other("max retries exceeded".into())))
    }
}
