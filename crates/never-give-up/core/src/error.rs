//! Error types for scenario discovery and request resolution.

use crate::id::{SCENARIO_ID_PATTERN, ScenarioTier};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Configuration errors detected while discovering and loading scenario definitions.
///
/// These never abort a registry build; the offending scenario is left out and the
/// error is recorded in the [`DiscoveryReport`](crate::DiscoveryReport).
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(
        "Invalid scenario folder name \"{name}\". Names must match /{pattern}/",
        pattern = SCENARIO_ID_PATTERN
    )]
    InvalidFolderName { name: String },

    #[error("Invalid scenario folder name \"{name}\": nothing left after normalization")]
    EmptySlug { name: String },

    #[error(
        "Missing required {file} in {tier}/{folder}. Each scenario must include a {file} file."
    )]
    MissingDefinition {
        tier: ScenarioTier,
        folder: String,
        file: &'static str,
    },

    #[error("Duplicate scenario id \"{id}\" within tier \"{tier}\" ({source_label})")]
    DuplicateInTier {
        id: String,
        tier: ScenarioTier,
        source_label: String,
    },

    #[error("Scenario \"{id}\" in {tier} is unusable: {reason}")]
    UnusableDefinition {
        id: String,
        tier: ScenarioTier,
        reason: String,
    },

    #[error("Failed to read {what} from {source_label}: {source}")]
    Io {
        what: String,
        source_label: String,
        #[source]
        source: std::io::Error,
    },
}

/// Request-validation errors surfaced to tool callers as structured error results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No template found for scenario: {0}")]
    UnknownScenario(String),

    #[error(
        "contextSummary is required when using 'sampling' mode. Please provide a summary of what the agent has been trying to do and why it's stuck."
    )]
    MissingContextSummary,

    #[error("maxQuestions must be between 1 and 10 (got {0})")]
    InvalidMaxQuestions(u32),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}
