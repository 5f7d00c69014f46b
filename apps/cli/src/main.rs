//! ivss - IVSS vehicle security client
//!
//! Command-line front end over the session store, the backend client and the
//! engine lock gate. Session data is kept in a JSON file between runs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ivss_client::{ClientConfig, FallbackPolicy, ServiceContext};
use ivss_core::storage::{JsonFileStore, KeyValueStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

/// ivss - IVSS vehicle security client
#[derive(Parser, Debug)]
#[command(name = "ivss")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the local session store
    #[arg(long, env = "IVSS_STORE", default_value = "ivss-store.json")]
    store: PathBuf,

    /// Backend base URL (overrides IVSS_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Keep data locally when the backend is unavailable (overrides
    /// IVSS_OFFLINE_FALLBACK)
    #[arg(long)]
    offline_fallback: Option<bool>,

    /// Request timeout in seconds (overrides IVSS_API_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and cache the session token
    Login(commands::auth::LoginArgs),

    /// Forget the cached session
    Logout,

    /// Create an account (kept locally when the backend is unreachable)
    Register(commands::auth::RegisterArgs),

    /// Show the cached session
    Status,

    /// Show the profile and its vehicles
    Profile,

    /// Vehicle commands
    #[command(subcommand)]
    Vehicles(commands::vehicles::VehicleCommands),

    /// ARCO data-rights requests
    #[command(subcommand)]
    Arco(commands::arco::ArcoCommands),

    /// Lock or unlock the engine interactively
    Engine(commands::engine::EngineArgs),
}

impl Cli {
    /// `base` with the command-line overrides applied.
    fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url);
        }
        if let Some(enabled) = self.offline_fallback {
            config = config.with_fallback(if enabled {
                FallbackPolicy::LocalCache
            } else {
                FallbackPolicy::Disabled
            });
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = cli.client_config(ClientConfig::from_env());
    let file_store = JsonFileStore::new(&cli.store);
    tracing::debug!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        store = %file_store.path().display(),
        "starting"
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(file_store);
    let ctx = ServiceContext::new(&config, store).context("failed to set up the backend client")?;

    match cli.command {
        Commands::Login(args) => commands::auth::login(&ctx, args).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Register(args) => commands::auth::register(&ctx, args).await,
        Commands::Status => commands::auth::status(&ctx),
        Commands::Profile => commands::profile::show(&ctx).await,
        Commands::Vehicles(command) => commands::vehicles::run(&ctx, command).await,
        Commands::Arco(command) => commands::arco::run(&ctx, command).await,
        Commands::Engine(args) => commands::engine::run(&ctx, &args),
    }
}
