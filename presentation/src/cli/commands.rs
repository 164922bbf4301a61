//! CLI command definitions

use archivist_domain::OutputFormat as DomainOutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Answer, citations and run summary
    #[default]
    Text,
    /// Single JSON document
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => DomainOutputFormat::Text,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for archivist
#[derive(Parser, Debug)]
#[command(name = "archivist")]
#[command(author, version, about = "Audited retrieval-augmented answers over classified documents")]
#[command(long_about = r#"
Archivist answers questions from a document corpus. The model searches the
corpus through tools; every restricted document it is shown is written to the
audit trail before the answer is returned.

Configuration files are loaded from (in priority order):
1. ARCHIVIST_* environment variables
2. --config <path>      Explicit config file
3. ./archivist.toml     Project-level config
4. ~/.config/archivist/config.toml   Global config

Example:
  archivist ask "What torque do the wheel lug nuts need?" --actor analyst-7
  archivist ask "Summarize winter movement doctrine" --actor analyst-7 --clearance secret -o json
  archivist audit --actor analyst-7
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a question from the corpus
    Ask(AskArgs),
    /// List persisted audit records
    Audit(AuditArgs),
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub query: String,

    /// Identity of the person asking; recorded on every audit entry
    #[arg(long, value_name = "ID")]
    pub actor: String,

    /// Highest sensitivity label the actor may be shown
    #[arg(long, value_name = "LABEL")]
    pub clearance: Option<String>,

    /// Maximum reasoning steps (overrides config)
    #[arg(long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Timeout for each reasoning call in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub step_timeout: Option<u64>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Debug, Default)]
pub struct AuditArgs {
    /// Only records for this actor
    #[arg(long)]
    pub actor: Option<String>,

    /// Only records for this source id
    #[arg(long)]
    pub source: Option<String>,

    /// Only records with this sensitivity label
    #[arg(long)]
    pub label: Option<String>,

    /// Only records from this run
    #[arg(long)]
    pub run: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
