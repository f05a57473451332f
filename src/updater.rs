//! Sync driver: resolve IP, locate zone and record, compare, update.
//!
//! A run walks these steps in order and stops at the first failure:
//!
//! ```text
//! RESOLVE_IP -> LOCATE_ZONE -> LOCATE_RECORD -> [READ_RECORD] -> COMPARE -> UPDATE | SKIP
//! ```

use crate::detector::IpSource;
use crate::error::{DdnsError, Result};
use crate::providers::{DnsProvider, DnsRecord, RecordSettings, RecordUpdate};
use std::fmt;
use tracing::{error, info};

/// A step of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResolveIp,
    LocateZone,
    LocateRecord,
    ReadRecord,
    Update,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ResolveIp => "resolve public IP",
            Step::LocateZone => "retrieve zone ID",
            Step::LocateRecord => "retrieve DNS record ID",
            Step::ReadRecord => "retrieve current DNS record IP",
            Step::Update => "update DNS record",
        };
        f.write_str(name)
    }
}

/// What a run did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Updated,
    Skipped,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Domain whose record was checked.
    pub domain: String,
    /// Public IP at the time of the run.
    pub public_ip: String,
    /// Record value before the run.
    pub previous_ip: String,
    pub action: Action,
    pub forced: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Read-only view of the record versus the public IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub domain: String,
    pub public_ip: String,
    pub record_ip: String,
    pub zone_id: String,
    pub record_id: String,
}

impl SyncStatus {
    pub fn in_sync(&self) -> bool {
        self.record_ip == self.public_ip
    }
}

/// Keeps one A record pointed at the host's public IP.
pub struct DnsUpdater<S, P> {
    ip_source: S,
    provider: P,
    domain: String,
    settings: RecordSettings,
}

impl<S: IpSource, P: DnsProvider> DnsUpdater<S, P> {
    pub fn new(
        ip_source: S,
        provider: P,
        domain: impl Into<String>,
        settings: RecordSettings,
    ) -> Self {
        Self {
            ip_source,
            provider,
            domain: domain.into(),
            settings,
        }
    }

    /// Execute one sync run.
    ///
    /// The record is replaced when its value differs from the public IP,
    /// compared as literal strings, or when `force` is set.
    pub async fn run(&self, force: bool) -> Result<UpdateOutcome> {
        info!(domain = %self.domain, "Starting DNS update process...");

        let status = self.inspect().await?;

        let action = if status.record_ip != status.public_ip || force {
            info!("IP addresses differ or --force flag is set. Updating DNS record...");
            let update = RecordUpdate::a_record(&self.domain, &status.public_ip, &self.settings);
            self.provider
                .update_record(&status.zone_id, &status.record_id, &update)
                .await
                .map_err(|e| self.fail(Step::Update, e))?;
            info!(
                domain = %self.domain,
                "Successfully updated DNS record for {} to {}",
                self.domain,
                status.public_ip
            );
            Action::Updated
        } else {
            info!("DNS record is already up to date. No changes made.");
            Action::Skipped
        };

        info!("DNS update process completed.");

        Ok(UpdateOutcome {
            domain: self.domain.clone(),
            public_ip: status.public_ip,
            previous_ip: status.record_ip,
            action,
            forced: force,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Run every step up to the comparison without writing anything.
    pub async fn inspect(&self) -> Result<SyncStatus> {
        let public_ip = self
            .ip_source
            .public_ip()
            .await
            .map_err(|e| self.fail(Step::ResolveIp, e))?;
        info!("Server's public IP address: {}", public_ip);

        let zone = self
            .provider
            .find_zone(&self.domain)
            .await
            .map_err(|e| self.fail(Step::LocateZone, e))?;

        let record = self
            .provider
            .find_record(&zone.id, &self.domain)
            .await
            .map_err(|e| self.fail(Step::LocateRecord, e))?;
        tracing::debug!(zone_id = %zone.id, record_id = %record.id, "Located record");

        let record_ip = match record.content {
            Some(content) => content,
            None => self.read_record(&zone.id, &record.id).await?,
        };
        info!("Current DNS record IP address: {}", record_ip);

        Ok(SyncStatus {
            domain: self.domain.clone(),
            public_ip,
            record_ip,
            zone_id: zone.id,
            record_id: record.id,
        })
    }

    async fn read_record(&self, zone_id: &str, record_id: &str) -> Result<String> {
        let record: DnsRecord = self
            .provider
            .get_record(zone_id, record_id)
            .await
            .map_err(|e| self.fail(Step::ReadRecord, e))?;

        record.content.ok_or_else(|| {
            self.fail(
                Step::ReadRecord,
                DdnsError::Provider {
                    provider: self.provider.name().to_string(),
                    message: format!("record {} has no content", record_id),
                },
            )
        })
    }

    fn fail(&self, step: Step, e: DdnsError) -> DdnsError {
        error!(domain = %self.domain, step = ?step, "Failed to {}: {}", step, e);
        e
    }
}
