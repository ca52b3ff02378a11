//! `never-give-up check`: load every definition and report problems.

use anyhow::Result;
use colored::Colorize;
use never_give_up_config::NeverGiveUpConfig;
use never_give_up_core::ScenarioTier;
use std::process::ExitCode;

pub fn run(cfg: &NeverGiveUpConfig) -> Result<ExitCode> {
    let (registry, report) = super::build_registry(cfg);

    if cfg.prompts.dirs.is_empty() {
        println!("Source: built-in scenarios");
    } else {
        println!("Sources:");
        for dir in &cfg.prompts.dirs {
            println!("  {}", dir.display());
        }
    }

    for warning in &report.warnings {
        println!("{} {}", "WARN".yellow(), warning);
    }
    for error in &report.errors {
        println!("{} {}", "ERROR".red(), error);
    }

    let core = registry
        .entries()
        .iter()
        .filter(|e| e.tier == ScenarioTier::Core)
        .count();
    let summary = format!(
        "{} scenarios ({} core, {} extended)",
        registry.len(),
        core,
        registry.len() - core
    );

    if report.is_ok() {
        println!("{} {}", "OK".green(), summary);
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} {} with {} error(s)",
            "FAILED".red(),
            summary,
            report.errors.len()
        );
        Ok(ExitCode::FAILURE)
    }
}
