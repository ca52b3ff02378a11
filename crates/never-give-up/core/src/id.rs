//! Scenario identifiers and tiers.

use crate::error::{Result, ScenarioError};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Naming convention every scenario folder must follow.
pub const SCENARIO_ID_PATTERN: &str = "^[a-z0-9]+(-[a-z0-9]+)*$";

#[expect(clippy::expect_used)]
static SCENARIO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCENARIO_ID_PATTERN).expect("valid regex"));

/// Where a scenario definition was discovered.
///
/// Core scenarios are exposed as individually named tools; extended scenarios are
/// only reachable through the generic lookup tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioTier {
    Core,
    Extended,
}

impl ScenarioTier {
    /// Tiers in discovery priority order.
    pub const ALL: [ScenarioTier; 2] = [ScenarioTier::Core, ScenarioTier::Extended];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioTier::Core => "core",
            ScenarioTier::Extended => "extended",
        }
    }
}

impl std::fmt::Display for ScenarioTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when `id` is a well-formed scenario identifier.
pub fn is_valid_scenario_id(id: &str) -> bool {
    SCENARIO_ID_RE.is_match(id)
}

/// Validate a scenario folder name against [`SCENARIO_ID_PATTERN`].
///
/// Failures are logged before being returned so that a logs-only validation run
/// still surfaces every offending folder.
pub fn validate_scenario_folder_name(name: &str) -> Result<&str> {
    if is_valid_scenario_id(name) {
        return Ok(name);
    }
    let err = ScenarioError::InvalidFolderName {
        name: name.to_string(),
    };
    tracing::error!("{}", err);
    Err(err)
}

/// Slugify a folder name into a scenario id.
///
/// Lowercases, collapses every run of non `[a-z0-9]` characters into a single
/// hyphen and trims hyphens from both ends. This is an opt-in step applied before
/// [`validate_scenario_folder_name`], never a replacement for it.
pub fn normalize_scenario_id(folder_name: &str) -> Result<String> {
    let lowered = folder_name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return Err(ScenarioError::EmptySlug {
            name: folder_name.to_string(),
        });
    }
    Ok(slug)
}
