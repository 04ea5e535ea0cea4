//! CLI command definitions for the `parley` binary.

pub mod models;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use parley_observe::tracing_setup::LogFormat;

/// Chat relay between a web UI and Gemini models.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format: pretty or json.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to a TOML config file (default: ./parley.toml if present).
    #[arg(long, global = true, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(long)]
        port: Option<u16>,
    },

    /// List the models offered to clients.
    Models {
        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Tracing filter derived from `--quiet` / `-v`.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,parley=debug,parley_core=debug,parley_infra=debug,parley_api=debug",
            _ => "trace",
        }
    }
}
