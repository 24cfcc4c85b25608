//! PromptKit - named prompt templates to bot conversations
//!
//! CLI entry point for listing, checking and rendering prompts.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use promptkit::cli::{Cli, Command, OutputFormat};
use promptkit::config::Config;
use promptkit::{BotConversation, ConversationContext, PROMPT_EXTENSION, PromptName, Prompts, TemplateStore};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptkit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(log_dir.join("pk.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::List => cmd_list(&config),
        Command::Check => cmd_check(&config),
        Command::Render {
            name,
            context,
            params,
            format,
        } => cmd_render(&config, &name, context.as_deref(), params, format),
    }
}

fn cmd_list(config: &Config) -> Result<()> {
    let store = config.build_store()?;
    for unit in store.units() {
        let registered = unit.name().parse::<PromptName>().ok();
        let roles = [("system", unit.system()), ("user", unit.user())]
            .into_iter()
            .filter_map(|(role, template)| template.map(|template| (role, template)))
            .map(|(role, template)| match store.declared_in(template) {
                // declared outside the unit's own file
                Some(file) if file != unit.file() => format!("{}@{}", role, file),
                _ => role.to_string(),
            })
            .collect::<Vec<_>>();
        let roles = if roles.is_empty() {
            "-".dimmed().to_string()
        } else {
            roles.join(",")
        };
        match registered {
            Some(prompt) => println!(
                "{:<28} {:<16} {}",
                unit.name().cyan(),
                roles,
                prompt.spec().description.dimmed()
            ),
            None => println!("{:<28} {}", unit.name().normal(), roles),
        }
    }

    for missing in store.missing_prompts() {
        println!(
            "{:<28} {:<16} {}",
            missing.as_str().red(),
            "missing".red(),
            missing.spec().description.dimmed()
        );
    }
    Ok(())
}

fn cmd_check(config: &Config) -> Result<()> {
    let store = config.build_store()?;
    report_check(&store)
}

fn report_check(store: &TemplateStore) -> Result<()> {
    match store.verify_registry() {
        Ok(()) => {
            println!(
                "{} {} prompts, all registered prompts have a .{} template",
                "✓".green(),
                store.len(),
                PROMPT_EXTENSION
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Err(e).context("Prompt self-check failed")
        }
    }
}

fn cmd_render(
    config: &Config,
    name: &str,
    context_path: Option<&Path>,
    params: Vec<(String, String)>,
    format: OutputFormat,
) -> Result<()> {
    let prompts: Prompts = config.build_prompts()?;

    let mut context = match context_path {
        Some(path) => load_context(path)?,
        None => ConversationContext::default(),
    };
    for (key, value) in params {
        context = context.with_parameter(key, value);
    }

    let conversation = prompts
        .chat_completion(name, context)
        .map_err(|e| e.into_error())
        .context(format!("Failed to compose prompt '{}'", name))?;

    print_conversation(&conversation, format)
}

fn load_context(path: &Path) -> Result<ConversationContext> {
    let content = fs::read_to_string(path).context(format!("Failed to read context file {}", path.display()))?;
    // YAML is a superset of JSON
    serde_yaml::from_str(&content).context(format!("Failed to parse context file {}", path.display()))
}

fn print_conversation(conversation: &BotConversation, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&conversation.posts)?);
        }
        OutputFormat::Text => {
            if conversation.is_empty() {
                println!("{}", "(no messages)".dimmed());
            }
            for (i, post) in conversation.posts.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", format!("[{}]", post.role).yellow().bold());
                println!("{}", post.message);
            }
        }
    }
    Ok(())
}
