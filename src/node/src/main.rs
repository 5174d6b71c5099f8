//! ptloader - group loader daemon
//!
//! Resolves identities to group memberships through one configured PTS
//! module and writes the result to the shared pts cache.

use clap::Parser;
use ptloader_backends::builtin_registry;
use ptloader_node::lifecycle::ensure_unprivileged;
use ptloader_node::{client, LoaderConfig, LoaderError, Ptloader};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info};

/// ptloader CLI
#[derive(Parser)]
#[command(name = "ptloader")]
#[command(about = "Group loader daemon feeding the pts cache")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/ptloader.toml", env = "PTLOADER_CONFIG")]
    config: PathBuf,

    /// PTS module (overrides config)
    #[arg(long, env = "PTLOADER_MODULE")]
    module: Option<String>,

    /// Configuration directory (overrides config)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Listening socket (overrides config)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Debug level; values below 1 are raised to 1
    #[arg(short, long)]
    debug: Option<i32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser)]
enum Command {
    /// Show version
    Version,

    /// Load the configuration and initialize the module, then exit
    CheckConfig,

    /// Ask a running loader to resolve one identity
    Query {
        /// Identity to resolve
        identity: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The config may raise the log level, so it is read before logging starts
    let config = match cli.command {
        Some(Command::Version) => None,
        _ => Some(load_config(&cli)),
    };

    // Initialize logging
    let log_level = match &config {
        Some(Ok(config)) => config.log_level(cli.verbose),
        _ if cli.verbose || cli.debug.is_some() => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(
    command: Option<Command>,
    config: Option<Result<LoaderConfig, LoaderError>>,
) -> Result<(), LoaderError> {
    let Some(config) = config else {
        println!("ptloader v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    };
    let config = config?;

    match command {
        Some(Command::CheckConfig) => check_config(config).await,
        Some(Command::Query { identity }) => {
            let socket = config.socket_path();
            let reply = client::query(&socket, identity.as_bytes())
                .await
                .map_err(|e| LoaderError::socket(socket.display(), e))?;
            println!("{}", reply);
            Ok(())
        }
        Some(Command::Version) | None => serve(config).await,
    }
}

fn load_config(cli: &Cli) -> Result<LoaderConfig, LoaderError> {
    let mut config = LoaderConfig::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(module) = &cli.module {
        config.ptloader.module = module.clone();
    }
    if let Some(dir) = &cli.config_dir {
        config.ptloader.config_dir = dir.clone();
    }
    if let Some(socket) = &cli.socket {
        config.ptloader.socket = Some(socket.clone());
    }
    if let Some(level) = cli.debug {
        config.ptloader.debug = level.clamp(1, i32::from(u8::MAX)) as u8;
    }

    config.validate()?;
    Ok(config)
}

async fn check_config(config: LoaderConfig) -> Result<(), LoaderError> {
    let registry = builtin_registry(&config.modules);
    let module = registry.activate(&config.ptloader.module).await?;

    println!("module:  {}", module.name());
    println!("cache:   {} ({})", config.cache_path().display(), config.cache.backend);
    println!("socket:  {}", config.socket_path().display());
    Ok(())
}

async fn serve(config: LoaderConfig) -> Result<(), LoaderError> {
    ensure_unprivileged(users::get_effective_uid())?;

    info!("starting: ptloader v{}", env!("CARGO_PKG_VERSION"));
    if config.debug_enabled() {
        info!(level = config.ptloader.debug, "debug logging of every request enabled");
    }

    let loader = Ptloader::start(config).await?;
    let result = loader.serve(shutdown_signal()).await;
    loader.shutdown();
    result
}

/// Completes on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received shutdown signal (Ctrl+C)"),
        _ = terminate() => info!("Received shutdown signal (SIGTERM)"),
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!(error = %e, "failed to register SIGTERM handler");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    // On non-Unix systems, only Ctrl+C is supported
    std::future::pending::<()>().await
}
