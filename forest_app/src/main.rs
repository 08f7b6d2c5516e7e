//! Forest command-line host
//!
//! Exports a list of placement records to a forest file and imports a
//! canonical forest file, printing the decoded creation instructions.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use forest_io::core::{Config, ConfigError, ForestConfig};
use forest_io::forest::{ForestError, ForestFormat, ObjectKind};
use forest_io::foundation::logging;
use thiserror::Error;

mod commands;

#[derive(Parser)]
#[command(name = "forest")]
#[command(about = "Forest item placement import/export")]
#[command(version)]
struct Cli {
    /// Configuration file (.toml or .ron)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write placement records to a forest file
    Export {
        /// Placement records (.ron or .json list)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; the format's extension is appended when missing
        #[arg(short, long)]
        output: PathBuf,

        /// Forest item name for records without their own
        #[arg(short, long)]
        tag: Option<String>,

        /// Envelope format (v1, v3 or v4)
        #[arg(short, long)]
        format: Option<ForestFormat>,
    },

    /// Read a canonical forest file and print creation instructions
    Import {
        /// Input .forest4.json file
        #[arg(short, long)]
        input: PathBuf,

        /// Host object kind (marker or instance)
        #[arg(short, long)]
        kind: Option<ObjectKind>,

        /// Stop at the first bad line instead of skipping it
        #[arg(long)]
        fail_fast: bool,
    },
}

/// Errors reported by the command-line host
#[derive(Error, Debug)]
pub enum AppError {
    /// Forest conversion failed
    #[error(transparent)]
    Forest(#[from] ForestError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error outside the forest library
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Placement list could not be read
    #[error("Failed to read placements from {path}: {reason}")]
    Placements {
        /// Offending file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Instruction could not be written as JSON
    #[error("Failed to write instruction: {0}")]
    Output(#[from] serde_json::Error),
}

fn load_config(path: Option<&PathBuf>) -> Result<ForestConfig, AppError> {
    let config = match path {
        Some(path) => ForestConfig::load_from_file(path)?,
        None => ForestConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = load_config(cli.config.as_ref())?;
    logging::init_with_level(&config.logging.level);

    match cli.command {
        Commands::Export {
            input,
            output,
            tag,
            format,
        } => {
            commands::apply_export_args(&mut config.export, tag, format);
            commands::run_export(&config.export, &input, &output)
        }
        Commands::Import {
            input,
            kind,
            fail_fast,
        } => {
            commands::apply_import_args(&mut config.import, kind, fail_fast);
            commands::run_import(&config.import, &input)
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
