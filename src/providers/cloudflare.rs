//! Cloudflare DNS provider.

use super::{DnsProvider, DnsRecord, RecordUpdate, Zone, RECORD_TYPE_A};
use crate::auth::Credentials;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Cloudflare API v4 root.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

const PROVIDER: &str = "cloudflare";

/// Cloudflare DNS provider.
pub struct CloudflareProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    #[serde(default = "default_success")]
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<CloudflareError>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    #[serde(default)]
    code: i64,
    message: String,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider.
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        Self::with_base_url(credentials, timeout, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(
        credentials: &Credentials,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(credentials.headers()?)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a request and unwrap the Cloudflare envelope.
    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DdnsError::Http {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let envelope: CloudflareResponse<T> = response.json().await?;

        if !envelope.success {
            let message = envelope
                .errors
                .first()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(DdnsError::Provider {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        envelope.result.ok_or_else(|| DdnsError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("response from {} has no result", url),
        })
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/{}", self.records_url(zone_id), record_id)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn find_zone(&self, domain: &str) -> Result<Zone> {
        let zones: Vec<Zone> = self
            .execute(
                self.client
                    .get(format!("{}/zones", self.base_url))
                    .query(&[("name", domain)]),
            )
            .await?;

        zones
            .into_iter()
            .next()
            .ok_or_else(|| DdnsError::ZoneNotFound(domain.to_string()))
    }

    async fn find_record(&self, zone_id: &str, domain: &str) -> Result<DnsRecord> {
        let records: Vec<DnsRecord> = self
            .execute(
                self.client
                    .get(self.records_url(zone_id))
                    .query(&[("name", domain), ("type", RECORD_TYPE_A)]),
            )
            .await?;

        records
            .into_iter()
            .next()
            .ok_or_else(|| DdnsError::RecordNotFound(domain.to_string()))
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        self.execute(self.client.get(self.record_url(zone_id, record_id)))
            .await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        self.execute(
            self.client
                .put(self.record_url(zone_id, record_id))
                .json(update),
        )
        .await
    }
}
