//! Public IP detection.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP echo service. Queried with `format=json`.
pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org";

/// Source of the host's current public IPv4 address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Return the public address as the dotted-quad string the service sent.
    async fn public_ip(&self) -> Result<String>;
}

/// Resolves the public IP through a JSON IP-echo service.
pub struct IpDetector {
    client: reqwest::Client,
    service: String,
}

#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

impl IpDetector {
    /// Create a detector against the default service.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_service(DEFAULT_IP_SERVICE.to_string(), timeout)
    }

    /// Create a detector against a custom service.
    pub fn with_service(service: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, service })
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

#[async_trait]
impl IpSource for IpDetector {
    async fn public_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.service)
            .query(&[("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DdnsError::IpDetection(format!(
                "HTTP {} from {}",
                status, self.service
            )));
        }

        let body: EchoResponse = response
            .json()
            .await
            .map_err(|e| DdnsError::IpDetection(format!("Malformed response: {}", e)))?;

        if body.ip.parse::<Ipv4Addr>().is_err() {
            return Err(DdnsError::IpDetection(format!(
                "Not an IPv4 address: {}",
                body.ip
            )));
        }

        tracing::debug!("Detected IPv4 {} from {}", body.ip, self.service);
        Ok(body.ip)
    }
}
