//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// PromptKit - render named prompts into bot conversations
#[derive(Parser)]
#[command(
    name = "pk",
    about = "Render named prompt templates into bot conversations",
    version,
    after_help = "Logs are written to: ~/.local/share/promptkit/logs/pk.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List prompts and their system/user sub-templates
    List,

    /// Verify every registered prompt has a template
    Check,

    /// Compose the conversation for a prompt
    Render {
        /// Prompt name (e.g. summarize_thread)
        name: String,

        /// Context file (YAML or JSON)
        #[arg(short = 'x', long)]
        context: Option<PathBuf>,

        /// Prompt parameter as KEY=VALUE (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Parse a `KEY=VALUE` prompt parameter
pub fn parse_param(s: &str) -> Result<(String, String), String> {
    debug!(%s, "parse_param: called");
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid parameter '{}' (expected KEY=VALUE)", s)),
    }
}

/// Output format for rendered conversations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}
