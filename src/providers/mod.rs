//! DNS provider API.

mod cloudflare;

#[cfg(test)]
mod tests;

pub use cloudflare::{CloudflareProvider, DEFAULT_BASE_URL};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The only record type this crate manages.
pub const RECORD_TYPE_A: &str = "A";

/// A provider-side zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A DNS record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    /// Current value. Listings may omit it, in which case the record
    /// has to be read by id.
    #[serde(default)]
    pub content: Option<String>,
}

/// Replacement body for an A record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl RecordUpdate {
    /// An A record update pointing `name` at `ip`.
    pub fn a_record(name: &str, ip: &str, settings: &RecordSettings) -> Self {
        Self {
            record_type: RECORD_TYPE_A.to_string(),
            name: name.to_string(),
            content: ip.to_string(),
            ttl: settings.ttl,
            proxied: settings.proxied,
        }
    }
}

/// Static record metadata sent with every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordSettings {
    pub ttl: Option<u32>,
    pub proxied: Option<bool>,
}

/// Operations the updater needs from a DNS provider.
///
/// Each call is a single request; there is no retry at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// Find the zone that owns `domain`. No zone is an error.
    async fn find_zone(&self, domain: &str) -> Result<Zone>;

    /// Find the first A record named `domain` in the zone. No record is an error.
    async fn find_record(&self, zone_id: &str, domain: &str) -> Result<DnsRecord>;

    /// Read a single record by id.
    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord>;

    /// Replace the record.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord>;
}
