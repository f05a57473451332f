//! # cf-ddns
//!
//! Keeps a Cloudflare DNS "A" record pointed at the public IP of the host
//! it runs on. Meant to be invoked periodically by a scheduler; each run
//! looks everything up fresh and exits.
//!
//! ## Usage
//!
//! ```bash
//! # Update the record if the public IP changed
//! cf-ddns --domain vpn.example.com update
//!
//! # Push the current IP even if the record already matches
//! cf-ddns --domain vpn.example.com update --force
//!
//! # Compare without writing
//! cf-ddns --domain vpn.example.com status
//! ```

pub mod auth;
pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod providers;
pub mod updater;

pub use auth::Credentials;
pub use config::Config;
pub use detector::{IpDetector, IpSource};
pub use error::{DdnsError, Result};
pub use providers::{CloudflareProvider, DnsProvider};
pub use updater::{Action, DnsUpdater, UpdateOutcome};
