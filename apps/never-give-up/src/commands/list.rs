use anyhow::Result;
use colored::Colorize;
use never_give_up_config::NeverGiveUpConfig;
use never_give_up_core::Resolver;
use never_give_up_mcp::{Route, ToolTable};
use std::sync::Arc;

pub fn run(cfg: &NeverGiveUpConfig, json: bool, language: Option<&str>) -> Result<()> {
    let (registry, _) = super::build_registry(cfg);
    let table = ToolTable::build(&registry);
    let resolver = Resolver::new(Arc::new(registry), cfg.resolver_settings());

    if json {
        let listing = resolver.list_scenarios(language);
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Available tools ({}):", table.tools().len());
    for spec in table.tools() {
        match &spec.route {
            Route::Scenario(id) => println!("  - {} {}", spec.name.cyan(), format!("({id})").dimmed()),
            _ => println!("  - {}", spec.name),
        }
    }

    let summaries = resolver.registry().summaries(language);
    println!("\nScenarios ({}):", summaries.len());
    for s in summaries {
        println!("  {:<32} {:<9} {}", s.id, s.tier.as_str(), s.title);
    }
    Ok(())
}
