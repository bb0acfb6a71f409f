//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file, resolved relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "kinix.toml";

/// Kinix -- forensic content classification and risk scoring.
///
/// Use `kinix <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "kinix", version, about, long_about = None)]
pub struct Cli {
    /// Path to the kinix.toml configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify and risk-score one or more files.
    Scan(ScanArgs),

    /// Inspect and validate signature rules.
    Rules(RulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Scan files and report their format, findings and risk tier.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Files to scan.
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Write each result to the configured report directory.
    #[arg(long)]
    pub save: bool,

    /// Format of saved reports.
    #[arg(long, default_value = "json", requires = "save")]
    pub save_format: SaveFormat,

    /// Exit non-zero when any result reaches this tier (safe, low, medium, critical).
    #[arg(long)]
    pub fail_on: Option<String>,
}

/// Saved report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveFormat {
    /// Pretty-printed JSON (`.json`).
    Json,
    /// Plain-text report (`.txt`).
    Text,
}

impl SaveFormat {
    /// Exporter name understood by `kinix_forensic::export::exporter_for`.
    pub fn exporter_name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

// ---- rules ----

/// Inspect and validate signature rules.
#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List signature rules (configured directory or built-in set).
    List {
        /// Rules directory (default: `forensic.rules_dir`, then built-in rules).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Filter by status (enabled, disabled).
        #[arg(long)]
        status: Option<String>,
    },
    /// Validate every YAML rule file in a directory.
    Validate {
        /// Directory containing YAML rule files.
        path: PathBuf,
    },
}

// ---- config ----

/// Manage kinix configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, forensic).
        #[arg(long)]
        section: Option<String>,
    },
}
