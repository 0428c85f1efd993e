//! The three screening entry points.
//!
//! Every call runs the same pipeline: validate locally, build the provider
//! request, execute it once, normalize the response. The first error produced
//! is returned unchanged, apart from scrubbing the API key out of its message.

use crate::request::{
    CryptoScreeningRequest, IpScreeningRequest, SanctionsQuery, SanctionsScreeningRequest,
};
use crate::request_builder::{build_crypto_request, build_ip_request, build_sanctions_request};
use anchain_aml_providers::constants::DEFAULT_TIMEOUT_SECS;
use anchain_aml_providers::{normalize, ApiKey, RequestDescriptor, ScreeningError, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent calls.
#[derive(Clone)]
pub struct AmlToolAdapter {
    api_key: ApiKey,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl AmlToolAdapter {
    pub fn new(api_key: ApiKey, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_key,
            transport,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Screen a crypto address for risk factors and sanctions exposure.
    pub async fn crypto_screening(&self, address: &str, proto: &str) -> Result<Value, ScreeningError> {
        let req = CryptoScreeningRequest::new(address, proto)?;
        debug!("crypto_screening protocol={}", req.protocol.code());
        self.run(build_crypto_request(&req, &self.api_key)).await
    }

    /// Check a person or entity against global sanctions lists.
    pub async fn sanctions_screening(&self, query: SanctionsQuery) -> Result<Value, ScreeningError> {
        let req = SanctionsScreeningRequest::new(query)?;
        debug!(
            "sanctions_screening schema={} scope={} fields={}",
            req.schema,
            req.scope,
            req.search_field_count()
        );
        self.run(build_sanctions_request(&req, &self.api_key)).await
    }

    /// Check whether an IP address originates from a sanctioned country.
    pub async fn ip_screening(&self, ip_address: &str) -> Result<Value, ScreeningError> {
        let req = IpScreeningRequest::new(ip_address)?;
        debug!("ip_screening ip={}", req.ip_address);
        self.run(build_ip_request(&req, &self.api_key)).await
    }

    async fn run(&self, descriptor: RequestDescriptor) -> Result<Value, ScreeningError> {
        let outcome = match self.transport.execute(&descriptor, self.timeout).await {
            Ok(raw) => normalize(raw),
            Err(e) => Err(e),
        };

        outcome.map_err(|e| {
            warn!("{} call to {} failed: {}", self.transport.name(), descriptor.path, e.kind());
            e.redact(self.api_key.expose())
        })
    }
}

impl std::fmt::Debug for AmlToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmlToolAdapter")
            .field("api_key", &self.api_key)
            .field("transport", &self.transport.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
