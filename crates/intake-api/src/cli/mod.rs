//! CLI command definitions for the `intake` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod form;
pub mod list;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use intake_types::config::StoreBackend;

/// Fill out, resume, and review multi-step intake questionnaires.
#[derive(Parser)]
#[command(name = "intake", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    /// Store backend, overriding `[store] backend` in config.toml.
    #[arg(long, global = true)]
    pub store: Option<StoreBackend>,

    /// Form server URL; implies `--store http` unless `--store` is given.
    #[arg(long, global = true, env = "INTAKE_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the form HTTP server.
    Serve {
        /// Port to listen on (default from config, 3005).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Fill out a questionnaire step by step.
    #[command(alias = "new")]
    Fill {
        /// Resume a saved questionnaire by id.
        #[arg(long)]
        resume: Option<String>,
    },

    /// List saved questionnaires with their progress.
    #[command(alias = "ls")]
    List,

    /// Show all answers of a saved questionnaire.
    Show {
        /// Questionnaire id.
        id: String,
    },

    /// Delete a saved questionnaire.
    #[command(alias = "rm")]
    Delete {
        /// Questionnaire id.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Steady-ticking spinner used while a store call is in flight.
pub(crate) fn spinner(message: impl Into<String>) -> anyhow::Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}
