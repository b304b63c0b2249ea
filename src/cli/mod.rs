//! CLI entry point for compound-agent.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::finance::{DEFAULT_PERIODIC_RATE, DEFAULT_PERIODS};

/// Prompt sent by `ask` when none is given.
pub const DEFAULT_PROMPT: &str = "Show me, month by month, how a product worth 100 evolves \
at 3% monthly interest over 5 months. Save the result as a report in a .md file and draw \
a line chart of the evolution saved as a .png file.";

/// Compound growth calculator and product support agent
#[derive(Parser, Debug)]
#[command(name = "compound-agent", version, about = "Compound growth calculator and agent CLI")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a future value locally
    Calc(CalcArgs),
    /// Print the tool definitions registered with the agent
    Tools,
    /// Ask the product support agent a question
    ///
    /// Authenticates with AZURE_AI_AGENTS_API_KEY, AZURE_AI_AGENTS_TOKEN, or
    /// the signed-in Azure CLI when AZURE_AI_AGENTS_AUTH=azure_cli.
    Ask(AskArgs),
}

/// Arguments for the `calc` subcommand.
#[derive(Parser, Debug)]
pub struct CalcArgs {
    /// Starting value
    #[arg(allow_negative_numbers = true)]
    pub present_value: f64,

    /// Growth per period as a fraction (0.03 = 3%)
    #[arg(short, long, default_value_t = DEFAULT_PERIODIC_RATE, allow_negative_numbers = true)]
    pub rate: f64,

    /// Number of compounding periods
    #[arg(short, long, default_value_t = DEFAULT_PERIODS)]
    pub periods: u32,

    /// Print the value after every period instead of the payload
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// User prompt (positional)
    pub prompt: Option<String>,

    /// Model deployment name (overrides CHAT_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Project endpoint (overrides NEW_AIFOUNDRY_PROJECT_ENDPOINT)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory generated files are saved into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Return runs that need function outputs instead of answering them
    #[arg(long)]
    pub no_auto_tools: bool,
}
