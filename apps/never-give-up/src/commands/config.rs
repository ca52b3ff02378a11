//! Configuration management commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use never_give_up_config::LoadedConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show {
        /// Output as raw JSON (no formatting)
        #[arg(long)]
        json: bool,
    },

    /// Output the JSON Schema for never-give-up.json
    Schema,

    /// Validate configuration and show warnings
    Validate,
}

pub fn execute(cmd: ConfigCommands, loaded: &LoadedConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => cmd_show(loaded, json),
        ConfigCommands::Schema => cmd_schema(),
        ConfigCommands::Validate => {
            cmd_validate(loaded);
            Ok(())
        }
    }
}

fn cmd_show(loaded: &LoadedConfig, json_output: bool) -> Result<()> {
    for warning in &loaded.warnings {
        eprintln!("{} {}", "WARN".yellow(), warning);
    }
    if json_output {
        println!("{}", serde_json::to_string(&loaded.config)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    }
    Ok(())
}

fn cmd_schema() -> Result<()> {
    println!("{}", never_give_up_config::schema_json_pretty()?);
    Ok(())
}

fn cmd_validate(loaded: &LoadedConfig) {
    if loaded.warnings.is_empty() {
        println!("{} Configuration is valid", "OK".green());
    } else {
        println!(
            "{} Configuration has {} warning(s):",
            "WARN".yellow(),
            loaded.warnings.len()
        );
        for w in &loaded.warnings {
            println!("  - {w}");
        }
    }
    println!("\nConfig files:");
    println!("  Global: {}", loaded.paths.global.display());
    println!("  Local:  {}", loaded.paths.local.display());
}
