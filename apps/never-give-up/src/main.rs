//! never-give-up CLI.
//!
//! Serves scenario prompts over MCP stdio (the default), validates definition
//! trees, lists the tool surface, and manages `never-give-up.json`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "never-give-up")]
#[command(about = "Clarifying-question prompts for stuck coding agents, served over MCP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use as the local layer (defaults to ./never-give-up.json)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Definition root laid out as <root>/{core,extended}/<id>/tool.md (repeatable)
    #[arg(long = "prompts-dir", value_name = "DIR", global = true)]
    prompts_dirs: Vec<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scenario tools over stdio (default)
    Serve,

    /// Load every definition and report configuration errors
    Check,

    /// List the tools and scenarios that would be served
    List {
        /// Print the list_scenarios result as JSON
        #[arg(long)]
        json: bool,

        /// Language for titles
        #[arg(long)]
        language: Option<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// `-v` raises the configured level (`-v` info, `-vv` debug, `-vvv` trace) but never lowers it.
fn effective_level(configured: &str, verbose: u8) -> &str {
    let requested = match verbose {
        0 => return configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let rank = |level: &str| LEVELS.iter().position(|l| l.eq_ignore_ascii_case(level));
    match rank(configured) {
        Some(current) if rank(requested).is_some_and(|r| r <= current) => configured,
        _ => requested,
    }
}

fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    // stdout carries the MCP protocol
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut loaded = commands::load_config(cli.config.as_deref())?;
    if !cli.prompts_dirs.is_empty() {
        loaded.config.prompts.dirs.clone_from(&cli.prompts_dirs);
    }

    let level = effective_level(&loaded.config.logging.level, cli.verbose);
    init_logging(level, loaded.config.logging.json);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            for w in &loaded.warnings {
                tracing::warn!("{w}");
            }
            commands::serve::run(&loaded.config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => commands::check::run(&loaded.config),
        Commands::List { json, language } => {
            commands::list::run(&loaded.config, json, language.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { command } => {
            commands::config::execute(command, &loaded)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_quiet_config() {
        assert_eq!(effective_level("warn", 0), "warn");
        assert_eq!(effective_level("warn", 1), "info");
        assert_eq!(effective_level("error", 2), "debug");
        assert_eq!(effective_level("info", 5), "trace");
    }

    #[test]
    fn test_verbose_never_lowers_config() {
        assert_eq!(effective_level("debug", 1), "debug");
        assert_eq!(effective_level("TRACE", 2), "TRACE");
        assert_eq!(effective_level("debug", 2), "debug");
    }

    #[test]
    fn test_unknown_config_level_uses_flag() {
        assert_eq!(effective_level("loud", 1), "info");
        assert_eq!(effective_level("loud", 0), "loud");
    }
}
