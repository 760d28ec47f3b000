//! Pay2go CLI for merchant integration work.
//!
//! This tool provides commands for:
//! - Signing a payment request field set (`CheckValue`)
//! - Verifying a captured gateway notification (`CheckCode`)
//! - Validating merchant configuration files

use clap::{ArgGroup, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

mod config;
mod error;
mod sign;
mod verify;

use error::CliError;

#[derive(Parser)]
#[command(name = "p2gcli")]
#[command(about = "Pay2go CLI for request signing and notification verification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an outbound payment request
    Sign {
        /// Path to the TOML configuration file
        #[arg(long, short, env = "PAY2GO_CONFIG")]
        config: PathBuf,

        /// JSON object of outbound field names to values
        #[arg(long, short)]
        fields: PathBuf,

        /// Epoch seconds for TimeStamp (defaults to the field file, then now)
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Verify the CheckCode of an inbound notification
    #[command(group(ArgGroup::new("source").required(true).args(["fields", "body"])))]
    Verify {
        /// Path to the TOML configuration file
        #[arg(long, short, env = "PAY2GO_CONFIG")]
        config: PathBuf,

        /// JSON object of notification field names to values
        #[arg(long, short)]
        fields: Option<PathBuf>,

        /// Raw form-encoded callback body
        #[arg(long, short)]
        body: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate config and print the resolved service URL
    Validate {
        /// Path to the TOML configuration file
        #[arg(long, short, env = "PAY2GO_CONFIG")]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = pay2go_common::logging::init_logging(level) {
        eprintln!("Warning: {e:?}");
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Sign {
            config,
            fields,
            timestamp,
        } => sign::run(&config, &fields, timestamp, cli.verbose),
        Commands::Verify {
            config,
            fields,
            body,
        } => {
            let source = match (&fields, &body) {
                (Some(path), _) => verify::Source::Json(path),
                (None, Some(path)) => verify::Source::FormBody(path),
                (None, None) => {
                    return Err(CliError::Config(
                        "either --fields or --body is required".into(),
                    ))
                }
            };
            verify::run(&config, &source, cli.verbose)
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { file } => config::validate(&file, cli.verbose),
        },
    }
}
