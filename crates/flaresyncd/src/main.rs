// # flaresyncd - Cloudflare DDNS Daemon
//
// A THIN integration layer: reads the environment, wires the HTTP IP
// endpoints and the Cloudflare provider into `DdnsEngine`, and runs a
// reconciliation cycle every `SLEEP` seconds. All DNS logic lives in
// flaresync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `CLOUDFLARE_API_TOKEN`: API token (required)
// - `CLOUDFLARE_FQDNS`: Comma/whitespace separated hostnames to keep updated
// - `DRY_RUN`: `true` to log updates without sending them
// - `FORCE_UPDATE`: `true` to rewrite records even when they match
// - `SLEEP`: Seconds between cycles (default 60)
// - `FLARESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `FLARESYNC_CYCLE_RETRIES`: Attempts per cycle on fatal errors (default 3)
// - `FLARESYNC_CYCLE_RETRY_DELAY_SECS`: Delay between those attempts (default 10)
// - `FLARESYNC_CONNECTIVITY_URL`: URL probed before each cycle
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export CLOUDFLARE_FQDNS=home.example.com,vpn.example.com
// export SLEEP=300
//
// flaresyncd
// ```

mod config;
mod cycle;

use anyhow::Result;
use config::DaemonConfig;
use flaresync_cloudflare::CloudflareProvider;
use flaresync_core::{DdnsEngine, IpResolver, ResolverConfig};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum FlaresyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<FlaresyncExitCode> for ExitCode {
    fn from(code: FlaresyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match DaemonConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return FlaresyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return FlaresyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return FlaresyncExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return FlaresyncExitCode::ConfigError.into();
    }

    info!("Starting flaresyncd");
    info!("Configuration loaded: {:?}", config);

    for warning in config.hostname_warnings() {
        warn!("Hostname will likely not be found: {}", warning);
    }

    // Everything is awaited in sequence; one worker thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return FlaresyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            FlaresyncExitCode::RuntimeError
        } else {
            FlaresyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until SIGTERM/SIGINT
async fn run_daemon(config: DaemonConfig) -> Result<()> {
    let core_config = config.core_config();
    core_config.validate()?;

    if core_config.dry_run {
        warn!("Running in DRY-RUN mode - no DNS records will be changed");
    }
    if core_config.force_update {
        info!("FORCE_UPDATE enabled - matching records will be rewritten");
    }

    let resolver_config = ResolverConfig::default();
    let endpoints = flaresync_ip_http::default_endpoints(resolver_config.timeout())?;
    let resolver = IpResolver::from_config(endpoints, &resolver_config)?;
    let endpoint_count = resolver.endpoint_count();
    let provider = CloudflareProvider::new(core_config.credential())?;
    let engine = DdnsEngine::new(resolver, Box::new(provider));

    info!(
        "Using provider {} with {} IP lookup endpoint(s)",
        engine.provider_name(),
        endpoint_count
    );

    let policy = config.cycle_retry().retry_policy();
    let sleep = Duration::from_secs(config.sleep_secs);
    let mut shutdown = ShutdownSignals::install()?;

    loop {
        // A cycle in progress is never interrupted; signals are picked up
        // once it is done
        cycle::run_once(&engine, &core_config, policy, &config.connectivity_url).await;

        info!("Waiting {} seconds before next check", config.sleep_secs);
        tokio::select! {
            _ = tokio::time::sleep(sleep) => {}
            signal = shutdown.recv() => {
                info!("Received shutdown signal: {}", signal);
                break;
            }
        }
    }

    info!("Shutting down flaresyncd");
    Ok(())
}

/// SIGTERM/SIGINT listeners, installed once for the life of the daemon
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;
        Ok(Self { sigterm, sigint })
    }

    /// Wait for the next signal and return its name
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Fallback for non-Unix platforms (SIGINT only)
#[cfg(not(unix))]
struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                error!("Failed to wait for CTRL-C: {}", e);
                std::future::pending().await
            }
        }
    }
}
