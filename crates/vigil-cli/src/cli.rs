use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "vigil", version, about = "Score questionnaire responses against a schema")]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a response file and print the result tree.
    Score(ScoreArgs),
    /// Load a schema and report instruments that cannot be scored.
    Check(CheckArgs),
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub schema: PathBuf,
    #[arg(long)]
    pub responses: PathBuf,
    /// Overrides `default_format` from the config.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Tera template for text output. Overrides `template_path`.
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Helper-text lookup to audit. Overrides `lookup_path`.
    #[arg(long)]
    pub lookup: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub schema: PathBuf,
    #[arg(long)]
    pub lookup: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print where the config file lives.
    Path,
    /// Write a default config file.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
