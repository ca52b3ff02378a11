//! Configuration types for the never-give-up server.
//!
//! The root type is [`NeverGiveUpConfig`]. Every section uses `#[serde(default)]`
//! so partial files work.

use never_give_up_core::{
    DEFAULT_LANGUAGE, DiscoveryOptions, ResolverSettings, SamplingSettings, StaticFormat,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NeverGiveUpConfig {
    /// Optional JSON Schema URL for IDE autocomplete support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Where scenario definitions come from.
    pub prompts: PromptsConfig,

    /// Sampling through the MCP client.
    pub sampling: SamplingConfig,

    /// Tool server behaviour.
    pub server: ServerConfig,

    /// Logging and diagnostics configuration.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PromptsConfig {
    /// Definition roots, each laid out as `<root>/{core,extended}/<id>/tool.md`.
    /// When empty, the built-in scenarios are served.
    pub dirs: Vec<PathBuf>,

    /// Language used when a request does not name one.
    pub default_language: String,

    /// Slugify folder names (e.g. `Bug_Fix` → `bug-fix`) before validating them.
    pub normalize_folder_names: bool,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            normalize_folder_names: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SamplingConfig {
    /// Ask the client's model for questions. When false, fallback questions are always used.
    pub enabled: bool,
    pub max_tokens: u32,
    /// Seconds to wait for the client before falling back.
    pub timeout_secs: u64,
    /// Model name hint sent with each request.
    pub model_hint: String,
    pub speed_priority: f64,
    pub cost_priority: f64,
    pub intelligence_priority: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let d = SamplingSettings::default();
        Self {
            enabled: d.enabled,
            max_tokens: d.max_tokens,
            timeout_secs: d.timeout.as_secs(),
            model_hint: d.model_hint,
            speed_priority: d.speed_priority,
            cost_priority: d.cost_priority,
            intelligence_priority: d.intelligence_priority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name advertised during initialization.
    pub name: String,
    /// Shape of static results: `template` or `messages`.
    pub static_format: StaticFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "agent-never-give-up-mcp".to_string(),
            static_format: StaticFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Emit JSON log lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl NeverGiveUpConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            default_language: self.prompts.default_language.clone(),
            static_format: self.server.static_format,
            sampling: SamplingSettings {
                enabled: self.sampling.enabled,
                max_tokens: self.sampling.max_tokens,
                timeout: Duration::from_secs(self.sampling.timeout_secs),
                model_hint: self.sampling.model_hint.clone(),
                speed_priority: self.sampling.speed_priority,
                cost_priority: self.sampling.cost_priority,
                intelligence_priority: self.sampling.intelligence_priority,
            },
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            normalize_folder_names: self.prompts.normalize_folder_names,
        }
    }
}
