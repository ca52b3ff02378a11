//! Data contracts shared by the registry, the resolver and the tool surface.

use crate::id::ScenarioTier;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder substituted by [`PromptTemplate::render_user_prompt`].
pub const CONTEXT_PLACEHOLDER: &str = "{{context}}";

/// A static prompt template for one scenario in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    /// Scenario this template belongs to.
    pub scenario: String,
    /// Language tag (e.g. `en`, `zh-CN`).
    pub language: String,
    /// Short human-readable name.
    pub title: String,
    /// When to use this prompt.
    pub description: String,
    /// Recommended system-level guidance.
    pub system_prompt: String,
    /// Optional user message template containing `{{context}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt_template: Option<String>,
    /// Bullet points shown to the user or agent.
    #[serde(default)]
    pub guidance_bullets: Vec<String>,
}

impl PromptTemplate {
    /// `"<title>: <description>"`, the summary handed to the sampling model.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }

    /// Substitute `{{context}}` in the user prompt template.
    pub fn render_user_prompt(&self, context: &str) -> Option<String> {
        self.user_prompt_template
            .as_ref()
            .map(|t| t.replace(CONTEXT_PLACEHOLDER, context))
    }

    /// The single prompt string delivered in the message-array static format.
    pub fn prompt_body(&self) -> String {
        if self.guidance_bullets.is_empty() {
            return self.system_prompt.clone();
        }
        let bullets = self
            .guidance_bullets
            .iter()
            .map(|b| format!("- {b}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}", self.system_prompt, bullets)
    }
}

/// Delivery mode for a scenario request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Return the pre-authored prompt template.
    #[default]
    Static,
    /// Ask the client's model for clarifying questions, with fallback.
    Sampling,
}

/// Type of clarifying question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    FreeText,
    SingleChoice,
    MultiChoice,
}

impl QuestionType {
    /// Parse a wire spelling; unknown spellings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "free-text" => Some(QuestionType::FreeText),
            "single-choice" => Some(QuestionType::SingleChoice),
            "multi-choice" => Some(QuestionType::MultiChoice),
            _ => None,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultiChoice)
    }
}

/// An option for choice-type questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
}

/// A clarifying question for the human behind a stuck agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClarifyingQuestion {
    /// Stable within one response (`q1`, `q2`, ...).
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
}

impl ClarifyingQuestion {
    pub fn free_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: QuestionType::FreeText,
            options: None,
        }
    }
}

/// Result of sampling-mode resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClarifyingQuestionsResult {
    pub scenario: String,
    pub questions: Vec<ClarifyingQuestion>,
    /// Raw sampling text, or a fixed sentinel when fallback questions were used.
    pub raw_sampling_response: String,
}

/// One chat message of the message-array static format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

/// Result of static-mode resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StaticPrompt {
    Template { template: PromptTemplate },
    Messages(Vec<PromptMessage>),
}

/// One row of `list_scenarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tier: ScenarioTier,
    /// Languages with an authored template, in discovery order.
    pub languages: Vec<String>,
}

/// Result of `list_scenarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListScenariosResult {
    pub scenarios: Vec<ScenarioSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> PromptTemplate {
        PromptTemplate {
            scenario: "missing-requirements".into(),
            language: "en".into(),
            title: "Missing requirements".into(),
            description: "Use when requirements are unclear.".into(),
            system_prompt: "You are a requirements analyst.".into(),
            user_prompt_template: Some("Stuck on:\n\n{{context}}\n\nHelp.".into()),
            guidance_bullets: vec!["List known requirements".into()],
        }
    }

    #[test]
    fn test_render_user_prompt_substitutes_context() {
        let rendered = template().render_user_prompt("a login form").unwrap();
        assert_eq!(rendered, "Stuck on:\n\na login form\n\nHelp.");
    }

    #[test]
    fn test_prompt_body_appends_bullets() {
        assert_eq!(
            template().prompt_body(),
            "You are a requirements analyst.\n\n- List known requirements"
        );
    }

    #[test]
    fn test_question_type_wire_names() {
        let q = ClarifyingQuestion::free_text("q1", "Why?");
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "free-text");
        assert!(v.get("options").is_none());
        assert_eq!(QuestionType::parse("multi-choice"), Some(QuestionType::MultiChoice));
        assert_eq!(QuestionType::parse("essay"), None);
    }

    #[test]
    fn test_static_template_shape() {
        let v = serde_json::to_value(StaticPrompt::Template {
            template: template(),
        })
        .unwrap();
        assert_eq!(v["template"]["systemPrompt"], "You are a requirements analyst.");
        assert_eq!(v["template"]["guidanceBullets"][0], "List known requirements");
    }
}
