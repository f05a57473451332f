//! cf-ddns - Cloudflare dynamic DNS client.

use anyhow::Context;
use cf_ddns::config::{Config, Overrides};
use cf_ddns::detector::IpDetector;
use cf_ddns::logging::RunLogger;
use cf_ddns::providers::CloudflareProvider;
use cf_ddns::updater::{Action, DnsUpdater};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cf-ddns")]
#[command(about = "Update a Cloudflare DNS A record with the server's public IP")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cloudflare API token
    #[arg(long, global = true, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Account email, sent as X-Auth-Email
    #[arg(long, global = true, env = "CLOUDFLARE_EMAIL")]
    email: Option<String>,

    /// Domain name to update
    #[arg(short, long, global = true, env = "CF_DDNS_DOMAIN")]
    domain: Option<String>,

    /// Log to the console only
    #[arg(long, global = true)]
    no_syslog: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the DNS record if the public IP changed
    Update {
        /// Force update even if IP is unchanged
        #[arg(short, long)]
        force: bool,
    },

    /// Compare the DNS record with the public IP without updating
    Status,

    /// Write an example configuration file
    Init,
}

fn get_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }

    // Default locations
    let candidates = [
        dirs::config_dir().map(|p| p.join("cf-ddns/config.toml")),
        Some(PathBuf::from("/etc/cf-ddns/config.toml")),
        Some(PathBuf::from("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            return candidate;
        }
    }

    // Return default even if it doesn't exist
    Config::default_path().unwrap_or_else(|_| PathBuf::from("config.toml"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = get_config_path(cli.config.clone());
    let overrides = Overrides {
        api_token: cli.api_token,
        email: cli.email,
        domain: cli.domain,
        no_syslog: cli.no_syslog,
    };

    let loaded = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))
        .map(|config| config.merge(overrides.clone()));

    let log_config = match &loaded {
        Ok(config) => config.log.clone(),
        Err(_) => Config::default().merge(overrides).log,
    };
    let _logger = RunLogger::init(&log_config);

    let result = match loaded {
        Ok(config) => match cli.command.unwrap_or(Commands::Update { force: false }) {
            Commands::Update { force } => cmd_update(&config, force).await,
            Commands::Status => cmd_status(&config).await,
            Commands::Init => cmd_init(&config_path),
        },
        Err(e) => Err(e),
    };

    report(result)
}

/// A run the updater stopped; it has already logged the step and cause.
#[derive(Debug, thiserror::Error)]
#[error("DNS update process aborted")]
struct Aborted;

/// Map the outcome to an exit code, logging failures not yet logged.
fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is::<Aborted>() {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn build_updater(config: &Config) -> anyhow::Result<DnsUpdater<IpDetector, CloudflareProvider>> {
    config.validate()?;

    let detector = IpDetector::with_service(config.ip_service.clone(), config.timeout())
        .context("Failed to create HTTP client")?;
    let provider = CloudflareProvider::with_base_url(
        &config.credentials(),
        config.timeout(),
        config.api_base_url.clone(),
    )
    .context("Failed to create Cloudflare client")?;

    Ok(DnsUpdater::new(
        detector,
        provider,
        config.domain.clone(),
        config.record_settings(),
    ))
}

async fn cmd_update(config: &Config, force: bool) -> anyhow::Result<()> {
    let updater = build_updater(config)?;
    let outcome = updater.run(force).await.map_err(|_| Aborted)?;

    if outcome.action == Action::Updated {
        info!(
            previous = %outcome.previous_ip,
            current = %outcome.public_ip,
            at = %outcome.timestamp.format("%Y-%m-%d %H:%M:%S"),
            "{} now points to {}",
            outcome.domain,
            outcome.public_ip
        );
    }

    Ok(())
}

async fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let updater = build_updater(config)?;
    let status = updater.inspect().await.map_err(|_| Aborted)?;

    if status.in_sync() {
        info!("{} is in sync at {}", status.domain, status.public_ip);
    } else {
        info!(
            "{} points to {} but the public IP is {}",
            status.domain, status.record_ip, status.public_ip
        );
    }

    Ok(())
}

fn cmd_init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    Config::example()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote example configuration to {}", path.display());

    Ok(())
}
