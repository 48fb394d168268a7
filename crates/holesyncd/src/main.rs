// # holesyncd - Pi-hole record snapshot
//
// This binary is a THIN integration layer:
// - DO NOT add record, session or retry logic here
// - All backend logic lives in holesync-core and the provider crates
// - Configuration is via environment variables ONLY
//
// The holesyncd binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers
// 4. Authenticating and logging a snapshot of the managed records
//
// ## Configuration
//
// ### Provider
// - `HOLESYNC_PROVIDER_TYPE`: Provider type (pihole)
// - `HOLESYNC_SERVER`: Backend address, e.g. `https://pi.hole`
// - `HOLESYNC_API_VERSION`: Backend API version (6)
// - `HOLESYNC_PASSWORD`: Web interface password (optional)
// - `HOLESYNC_TLS_INSECURE_SKIP_VERIFY`: Accept self-signed certificates
// - `HOLESYNC_REQUEST_TIMEOUT_SECS`: Per-request timeout
//
// ### Records
// - `HOLESYNC_RECORD_TYPES`: Comma-separated record kinds (A,AAAA,CNAME)
// - `HOLESYNC_DOMAIN_FILTER`: Comma-separated managed domains
// - `HOLESYNC_EXCLUDE_DOMAINS`: Comma-separated excluded domains
// - `HOLESYNC_DRY_RUN`: Never send mutations
//
// ### Logging
// - `HOLESYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export HOLESYNC_SERVER=https://pi.hole
// export HOLESYNC_PASSWORD=your_password
// export HOLESYNC_DOMAIN_FILTER=home.example.com
//
// holesyncd
// ```

use anyhow::Result;
use holesync_core::{DomainFilter, PiholeConfig, ProviderConfig, RecordType, SyncConfig};
use std::env;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HolesyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (backend unreachable, authentication, decoding)
    RuntimeError = 2,
}

impl From<HolesyncExitCode> for ExitCode {
    fn from(code: HolesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    server: String,
    api_version: String,
    password: Option<String>,
    domain_filter: Vec<String>,
    exclude_domains: Vec<String>,
    dry_run: bool,
    tls_insecure_skip_verify: bool,
    request_timeout_secs: u64,
    record_types: Vec<RecordType>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let flag = |key: &str| -> Result<bool> {
            match lookup(key) {
                Some(value) => parse_bool(key, &value),
                None => Ok(false),
            }
        };

        let request_timeout_secs = match lookup("HOLESYNC_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "HOLESYNC_REQUEST_TIMEOUT_SECS must be a number of seconds. Got: {}",
                    value
                )
            })?,
            None => 30,
        };

        Ok(Self {
            provider_type: lookup("HOLESYNC_PROVIDER_TYPE").unwrap_or_else(|| "pihole".to_string()),
            server: lookup("HOLESYNC_SERVER").unwrap_or_default(),
            api_version: lookup("HOLESYNC_API_VERSION").unwrap_or_else(|| "6".to_string()),
            password: lookup("HOLESYNC_PASSWORD").filter(|p| !p.is_empty()),
            domain_filter: split_list(&lookup("HOLESYNC_DOMAIN_FILTER").unwrap_or_default()),
            exclude_domains: split_list(&lookup("HOLESYNC_EXCLUDE_DOMAINS").unwrap_or_default()),
            dry_run: flag("HOLESYNC_DRY_RUN")?,
            tls_insecure_skip_verify: flag("HOLESYNC_TLS_INSECURE_SKIP_VERIFY")?,
            request_timeout_secs,
            record_types: split_list(
                &lookup("HOLESYNC_RECORD_TYPES").unwrap_or_else(|| "A,AAAA,CNAME".to_string()),
            )
            .into_iter()
            .map(RecordType::from)
            .collect(),
            log_level: lookup("HOLESYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Provider-level checks (server presence, API version, timeout) are
    /// delegated to [`SyncConfig::validate`].
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "pihole" => {}
            _ => anyhow::bail!(
                "HOLESYNC_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: pihole",
                self.provider_type
            ),
        }

        if self.server.trim().is_empty() {
            anyhow::bail!(
                "HOLESYNC_SERVER is required. \
                Set it via: export HOLESYNC_SERVER=https://pi.hole"
            );
        }

        if self.record_types.is_empty() {
            anyhow::bail!(
                "HOLESYNC_RECORD_TYPES must contain at least one record type. \
                Supported types: A, AAAA, CNAME"
            );
        }

        if let Some(kind) = self
            .record_types
            .iter()
            .find(|kind| matches!(kind, RecordType::Other(_)))
        {
            anyhow::bail!(
                "HOLESYNC_RECORD_TYPES contains unsupported type '{}'. \
                Supported types: A, AAAA, CNAME",
                kind
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "HOLESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.sync_config().validate()?;
        Ok(())
    }

    /// Build the library configuration
    fn sync_config(&self) -> SyncConfig {
        let mut pihole = PiholeConfig::new(self.server.trim())
            .with_domain_filter(
                DomainFilter::new(&self.domain_filter).with_exclusions(&self.exclude_domains),
            )
            .with_dry_run(self.dry_run);
        pihole.api_version = self.api_version.clone();
        pihole.password = self.password.clone();
        pihole.tls_insecure_skip_verify = self.tls_insecure_skip_verify;
        pihole.request_timeout_secs = self.request_timeout_secs;

        let mut config = SyncConfig::new(ProviderConfig::Pihole(pihole));
        config.record_types = self.record_types.clone();
        config
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean (true/false). Got: {}", key, value),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HolesyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HolesyncExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HolesyncExitCode::ConfigError.into();
    }

    info!("Starting holesyncd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HolesyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config.sync_config()).await {
            error!("holesyncd error: {}", e);
            HolesyncExitCode::RuntimeError
        } else {
            HolesyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Authenticate and log the current records of every configured kind
async fn run(config: SyncConfig) -> Result<()> {
    let registry = holesync_core::ProviderRegistry::new();

    #[cfg(feature = "pihole")]
    {
        info!("Registering Pi-hole provider");
        holesync_provider_pihole::register(&registry);
    }

    let ctx = CancellationToken::new();
    let shutdown = tokio::spawn(cancel_on_shutdown(ctx.clone()));

    let result = snapshot(&registry, &config, &ctx).await;
    shutdown.abort();

    match result {
        Err(holesync_core::Error::Cancelled) => {
            warn!("Interrupted before the snapshot completed");
            Ok(())
        }
        other => other.map_err(anyhow::Error::from),
    }
}

async fn snapshot(
    registry: &holesync_core::ProviderRegistry,
    config: &SyncConfig,
    ctx: &CancellationToken,
) -> holesync_core::Result<()> {
    let provider = registry.create_provider(&config.provider, ctx).await?;
    info!("Connected using provider '{}'", provider.provider_name());

    let mut listed = Ok(());
    for record_type in &config.record_types {
        match provider.list_records(ctx, record_type).await {
            Ok(records) => {
                info!("{} {} record(s)", records.len(), record_type);
                for record in &records {
                    info!("  {}", record);
                }
            }
            Err(e) => {
                listed = Err(e);
                break;
            }
        }
    }

    // Pi-hole caps concurrent sessions, so release ours even after a failure
    if let Err(e) = provider.close(&CancellationToken::new()).await {
        warn!("Failed to release backend session: {}", e);
    }

    listed
}

/// Cancel `ctx` on SIGTERM or SIGINT
#[cfg(unix)]
async fn cancel_on_shutdown(ctx: CancellationToken) {
    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers: {}", e);
                return;
            }
        };

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    info!("Received shutdown signal: {}", signal);
    ctx.cancel();
}

/// Cancel `ctx` on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn cancel_on_shutdown(ctx: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal: SIGINT");
            ctx.cancel();
        }
        Err(e) => warn!("Failed to wait for CTRL-C: {}", e),
    }
}
