use crate::constants::{DEFAULT_BASE_URL, HEADER_RETRY_AFTER};
use crate::error::ScreeningError;
use crate::traits::*;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

/// reqwest-backed transport against the AnChain AML API.
///
/// The inner client keeps its connection pool across calls; nothing else is
/// shared between requests.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("anchain-aml/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_error(err: reqwest::Error, timeout: Duration) -> ScreeningError {
        if err.is_timeout() {
            ScreeningError::NetworkTimeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            ScreeningError::Network(err.to_string())
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<RawResponse, ScreeningError> {
        let url = self.url_for(&request.path);
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        debug!("aml request method={} url={}", request.method.as_str(), url);

        let mut builder = self.client.request(method, &url).timeout(timeout);

        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(HEADER_RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        debug!("aml response status={} bytes={}", status, body.len());

        Ok(RawResponse {
            status,
            retry_after,
            body: body.to_vec(),
        })
    }

    fn name(&self) -> &str {
        "AnChain AML HTTP"
    }
}
