//! Scenario definitions shipped with the crate.

use crate::discover::EmbeddedSource;
use crate::id::ScenarioTier;

static BUILTIN_DEFINITIONS: &[(ScenarioTier, &str, &str)] = &[
    (
        ScenarioTier::Core,
        "logic-is-too-complex",
        include_str!("../prompts/core/logic-is-too-complex/tool.md"),
    ),
    (
        ScenarioTier::Core,
        "bug-fix-always-failed",
        include_str!("../prompts/core/bug-fix-always-failed/tool.md"),
    ),
    (
        ScenarioTier::Core,
        "analysis-too-long",
        include_str!("../prompts/core/analysis-too-long/tool.md"),
    ),
    (
        ScenarioTier::Core,
        "missing-requirements",
        include_str!("../prompts/core/missing-requirements/tool.md"),
    ),
    (
        ScenarioTier::Core,
        "unclear-acceptance-criteria",
        include_str!("../prompts/core/unclear-acceptance-criteria/tool.md"),
    ),
    (
        ScenarioTier::Extended,
        "scope-creep",
        include_str!("../prompts/extended/scope-creep/tool.md"),
    ),
];

/// The embedded definitions as a [`DefinitionSource`](crate::DefinitionSource).
pub fn source() -> EmbeddedSource {
    EmbeddedSource::new("<builtin>", BUILTIN_DEFINITIONS)
}
