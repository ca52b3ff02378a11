//! Scenario template registry and clarifying-question resolution for stuck agents.
//!
//! This crate provides:
//! - [`id`]: Scenario identifier validation (`^[a-z0-9]+(-[a-z0-9]+)*$`) and tiers
//! - [`parser`]: Lenient front matter + sectioned markdown parsing of `tool.md` files
//! - [`discover`]: Tiered discovery over [`DefinitionSource`]s with core-over-extended merge
//! - [`ScenarioRegistry`]: Immutable id → per-language template lookup, built once
//! - [`Resolver`]: Static and sampling resolution with a deterministic fallback chain
//! - [`Sampler`]: The optional host-provided sampling collaborator
//!
//! # Example
//!
//! ```no_run
//! use never_give_up_core::{Resolver, ResolverSettings, ScenarioRegistry};
//! use std::sync::Arc;
//!
//! let (registry, report) = ScenarioRegistry::builtin();
//! assert!(report.is_ok());
//!
//! let resolver = Resolver::new(Arc::new(registry), ResolverSettings::default());
//! let prompt = resolver.static_prompt("missing-requirements", Some("en")).unwrap();
//! println!("{}", serde_json::to_string_pretty(&prompt).unwrap());
//! ```

pub mod builtin;
pub mod discover;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod id;
pub mod parser;
pub mod registry;
pub mod sampling;
pub mod types;

pub use discover::{
    DefinitionSource, DirSource, Discovery, DiscoveryOptions, DiscoveryReport, DiscoveredScenario,
    EmbeddedSource,
};
pub use engine::{Resolver, ResolverSettings, ScenarioRequest, StaticFormat, ToolResult};
pub use error::{ResolveError, ScenarioError};
pub use id::{SCENARIO_ID_PATTERN, ScenarioTier, normalize_scenario_id, validate_scenario_folder_name};
pub use parser::{ParsedDefinition, parse_definition};
pub use registry::{ScenarioEntry, ScenarioRegistry};
pub use sampling::{Sampler, SamplingError, SamplingRequest, SamplingSettings};
pub use types::{
    ClarifyingQuestion, ClarifyingQuestionsResult, ListScenariosResult, Mode, PromptMessage,
    PromptTemplate, QuestionOption, QuestionType, ScenarioSummary, StaticPrompt,
};

/// Languages with authored built-in content and localized sampling prompts.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "zh-CN"];

/// Language used when a request does not name one, and the first fallback for lookups.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fixed file name of a scenario definition inside its folder.
pub const DEFINITION_FILE: &str = "tool.md";
