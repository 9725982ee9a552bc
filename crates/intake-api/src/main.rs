//! intake CLI and form server entry point.
//!
//! Binary name: `intake`
//!
//! Parses CLI arguments, loads config and opens the configured session store,
//! then dispatches to the command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::bail;
use clap::Parser;
use clap_complete::generate;

use intake_observe::tracing_setup::{init_tracing, shutdown_tracing, LogFormat};
use intake_types::config::StoreBackend;

use cli::{Cli, Commands};
use state::{AppState, StoreOverrides};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if matches!(cli.command, Commands::Serve { .. }) => "info",
        0 => "warn",
        1 => "info,intake_core=debug,intake_infra=debug,intake_api=debug",
        _ => "trace",
    };
    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Pretty };
    init_tracing(filter, format, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "intake", &mut std::io::stdout());
        return Ok(());
    }

    let overrides = StoreOverrides {
        backend: cli.store,
        server_url: cli.server.clone(),
    };
    let state = AppState::init(&overrides).await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            if state.store.backend() == StoreBackend::Http {
                bail!("`intake serve` needs a local store; pass --store sqlite or --store memory");
            }

            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} intake form server listening on {} ({} store)",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan(),
                state.store.backend()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Fill { resume } => {
            cli::form::fill(&state, resume, cli.json).await?;
        }

        Commands::List => {
            cli::list::list_forms(&state, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::form::show_form(&state, &id, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::list::delete_form(&state, &id, force, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
