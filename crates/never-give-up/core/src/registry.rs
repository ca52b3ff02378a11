//! The immutable scenario registry.

use crate::DEFAULT_LANGUAGE;
use crate::builtin;
use crate::discover::{DefinitionSource, DiscoveredScenario, DiscoveryOptions, DiscoveryReport, discover};
use crate::error::ScenarioError;
use crate::id::ScenarioTier;
use crate::parser::{Localized, parse_definition};
use crate::types::{PromptTemplate, ScenarioSummary};
use std::collections::HashMap;

/// One registered scenario with all its language variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioEntry {
    pub id: String,
    pub tier: ScenarioTier,
    /// In discovery order; never empty.
    pub templates: Vec<PromptTemplate>,
    pub fallback_questions: Localized<Vec<String>>,
}

impl ScenarioEntry {
    /// Exact language, then the default language, then the first template.
    pub fn template(&self, language: Option<&str>) -> Option<&PromptTemplate> {
        let lang = language.unwrap_or(DEFAULT_LANGUAGE);
        self.templates
            .iter()
            .find(|t| t.language == lang)
            .or_else(|| self.templates.iter().find(|t| t.language == DEFAULT_LANGUAGE))
            .or_else(|| self.templates.first())
    }

    pub fn languages(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.language.clone()).collect()
    }
}

/// Scenario id → templates, built once and read-only afterwards.
///
/// Share it behind an `Arc`; there is no interior mutability.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    entries: Vec<ScenarioEntry>,
    index: HashMap<String, usize>,
}

impl ScenarioRegistry {
    /// Discover, parse and register everything the sources provide.
    ///
    /// A broken scenario is left out and reported; it never prevents the others
    /// from being registered.
    pub fn build(
        sources: &[Box<dyn DefinitionSource>],
        options: DiscoveryOptions,
    ) -> (Self, DiscoveryReport) {
        let discovery = discover(sources, options);
        let mut report = discovery.report;
        let registry = Self::from_discovered(discovery.scenarios, &mut report);
        (registry, report)
    }

    /// Registry over the definitions embedded in the crate.
    pub fn builtin() -> (Self, DiscoveryReport) {
        Self::build(&[Box::new(builtin::source())], DiscoveryOptions::default())
    }

    /// Parse already-merged definitions into entries.
    pub fn from_discovered(
        scenarios: Vec<DiscoveredScenario>,
        report: &mut DiscoveryReport,
    ) -> Self {
        let mut registry = Self::default();

        for scenario in scenarios {
            let parsed = parse_definition(&scenario.raw);
            if !parsed.name.is_empty() && parsed.name != scenario.id {
                tracing::debug!(
                    "Front matter name '{}' differs from folder id '{}'; using the folder id",
                    parsed.name,
                    scenario.id
                );
            }

            let templates = parsed.to_templates(&scenario.id);
            let problem = if templates.is_empty() {
                Some("no title, description or system prompt in any language".to_string())
            } else {
                templates
                    .iter()
                    .find(|t| t.system_prompt.trim().is_empty())
                    .map(|t| format!("missing System Prompt for language '{}'", t.language))
            };
            if let Some(reason) = problem {
                let err = ScenarioError::UnusableDefinition {
                    id: scenario.id,
                    tier: scenario.tier,
                    reason,
                };
                tracing::error!("{}", err);
                report.errors.push(err);
                continue;
            }

            registry
                .index
                .insert(scenario.id.clone(), registry.entries.len());
            registry.entries.push(ScenarioEntry {
                id: scenario.id,
                tier: scenario.tier,
                templates,
                fallback_questions: parsed.fallback_questions,
            });
        }

        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    pub fn list_all_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn list_core_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.tier == ScenarioTier::Core)
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn is_core(&self, id: &str) -> bool {
        self.get(id).is_some_and(|e| e.tier == ScenarioTier::Core)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn get_template(&self, id: &str, language: Option<&str>) -> Option<&PromptTemplate> {
        self.get(id)?.template(language)
    }

    /// Authored fallback questions for `language` (then the default language).
    pub fn fallback_questions(&self, id: &str, language: &str) -> &[String] {
        self.get(id)
            .and_then(|e| e.fallback_questions.resolve(language))
            .map_or(&[], Vec::as_slice)
    }

    /// One summary row per scenario, titles in `language` where available.
    pub fn summaries(&self, language: Option<&str>) -> Vec<ScenarioSummary> {
        self.entries
            .iter()
            .filter_map(|e| {
                let t = e.template(language)?;
                Some(ScenarioSummary {
                    id: e.id.clone(),
                    title: t.title.clone(),
                    description: t.description.clone(),
                    tier: e.tier,
                    languages: e.languages(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::EmbeddedSource;

    #[test]
    fn test_builtin_registry() {
        let (registry, report) = ScenarioRegistry::builtin();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(
            registry.list_core_ids(),
            vec![
                "analysis-too-long",
                "bug-fix-always-failed",
                "logic-is-too-complex",
                "missing-requirements",
                "unclear-acceptance-criteria",
            ]
        );
        assert_eq!(registry.len(), 6);
        assert!(registry.contains("scope-creep"));
        assert!(!registry.is_core("scope-creep"));
        assert!(registry.is_core("missing-requirements"));
    }

    #[test]
    fn test_template_language_fallback() {
        let (registry, _) = ScenarioRegistry::builtin();
        let zh = registry
            .get_template("missing-requirements", Some("zh-CN"))
            .unwrap();
        assert_eq!(zh.title, "缺少需求");
        let fr = registry
            .get_template("missing-requirements", Some("fr"))
            .unwrap();
        assert_eq!(fr.language, "en");
        assert!(registry.get_template("nope", None).is_none());
    }

    static ZH_ONLY: &[(ScenarioTier, &str, &str)] = &[(
        ScenarioTier::Core,
        "zh-only",
        "---\ntitle:\n  zh-CN: 只有中文\n---\n## System Prompt\n### 中文\n提示\n",
    )];

    #[test]
    fn test_first_template_when_no_default_language() {
        let (registry, report) =
            ScenarioRegistry::build(&[Box::new(EmbeddedSource::new("t", ZH_ONLY))], DiscoveryOptions::default());
        assert!(report.is_ok());
        let t = registry.get_template("zh-only", Some("en")).unwrap();
        assert_eq!(t.language, "zh-CN");
    }

    static BROKEN: &[(ScenarioTier, &str, &str)] = &[
        (ScenarioTier::Core, "no-prompt", "---\ntitle: Title only\n---\n"),
        (ScenarioTier::Core, "empty", ""),
        (ScenarioTier::Core, "fine", "## System Prompt\nok\n"),
    ];

    #[test]
    fn test_unusable_definitions_are_isolated() {
        let (registry, report) =
            ScenarioRegistry::build(&[Box::new(EmbeddedSource::new("t", BROKEN))], DiscoveryOptions::default());
        assert_eq!(registry.list_all_ids(), vec!["fine"]);
        assert_eq!(report.errors.len(), 2);
        assert!(
            report
                .errors
                .iter()
                .all(|e| matches!(e, ScenarioError::UnusableDefinition { .. }))
        );
        // Title falls back to the id when nothing else is authored.
        assert_eq!(registry.get_template("fine", None).unwrap().title, "fine");
    }
}
