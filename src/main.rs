//! devproxy entry point.
//!
//! Bootstrap order: parse CLI args, load and validate configuration (the
//! process refuses to start on any configuration error), initialize
//! logging, bind the listener, then serve until Ctrl-C/SIGTERM.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use devproxy::config::{load_config, ConfigError, DevServerConfig};
use devproxy::http::DevServer;
use devproxy::lifecycle::{signals, Shutdown};
use devproxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "devproxy")]
#[command(about = "Development server with prefix-based backend forwarding", long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "devproxy.toml")]
    config: PathBuf,

    /// Override the configured listen address.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The default config path is optional; an explicit one must exist.
    let mut config = if cli.config.exists() {
        match load_config(&cli.config) {
            Ok(config) => config,
            Err(ConfigError::Validation(errors)) => {
                for error in &errors {
                    eprintln!("configuration error: {error}");
                }
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("failed to load {}: {e}", cli.config.display());
                return ExitCode::FAILURE;
            }
        }
    } else {
        DevServerConfig::default()
    };

    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        static_root = %config.static_files.root.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
                return ExitCode::FAILURE;
            }
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener"
            );
            return ExitCode::FAILURE;
        }
    };

    let server = match DevServer::new(config) {
        Ok(server) => server,
        Err(ConfigError::Validation(errors)) => {
            for error in &errors {
                tracing::error!("configuration error: {error}");
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    let result = tokio::select! {
        res = &mut server_task => res,
        _ = signals::wait_for_signal() => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
            server_task.await
        }
    };

    match result {
        Ok(Ok(())) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Server exited with error");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Server task failed");
            ExitCode::FAILURE
        }
    }
}
