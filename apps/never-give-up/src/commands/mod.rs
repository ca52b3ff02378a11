pub mod check;
pub mod config;
pub mod list;
pub mod serve;

use anyhow::Result;
use never_give_up_config::{
    ConfigPaths, LoadedConfig, NeverGiveUpConfig, load_from, load_merged,
    loader::global_config_path,
};
use never_give_up_core::{DefinitionSource, DirSource, DiscoveryReport, ScenarioRegistry};
use std::path::Path;

/// Load config from the global file plus either `--config` or `./never-give-up.json`.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            load_from(ConfigPaths {
                local: path.to_path_buf(),
                global: global_config_path()?,
            })
        }
        None => load_merged(&std::env::current_dir()?),
    }
}

/// Configured directories, or the built-in scenarios when none are set.
pub fn build_registry(cfg: &NeverGiveUpConfig) -> (ScenarioRegistry, DiscoveryReport) {
    if cfg.prompts.dirs.is_empty() {
        tracing::debug!("no prompt directories configured; using built-in scenarios");
        return ScenarioRegistry::builtin();
    }
    let sources: Vec<Box<dyn DefinitionSource>> = cfg
        .prompts
        .dirs
        .iter()
        .map(|dir| Box::new(DirSource::new(dir)) as Box<dyn DefinitionSource>)
        .collect();
    ScenarioRegistry::build(&sources, cfg.discovery_options())
}
