//! Request resolution: static templates, sampled questions and the fallback chain.

use crate::error::ResolveError;
use crate::fallback::{FALLBACK_SENTINEL, fallback_questions};
use crate::registry::ScenarioRegistry;
use crate::sampling::{
    Sampler, SamplingError, SamplingSettings, build_system_prompt, build_user_message,
    parse_questions_from_response,
};
use crate::types::{ClarifyingQuestionsResult, ListScenariosResult, Mode, PromptMessage, StaticPrompt};
use crate::DEFAULT_LANGUAGE;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::ops::RangeInclusive;
use std::sync::Arc;

pub const DEFAULT_MAX_QUESTIONS: u32 = 3;
pub const MAX_QUESTIONS_RANGE: RangeInclusive<u32> = 1..=10;

/// Shape of a static-mode result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaticFormat {
    /// `{"template": {...}}`
    #[default]
    Template,
    /// `[{"role": "user", "content": "<prompt body>"}]`
    Messages,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub default_language: String,
    pub static_format: StaticFormat,
    pub sampling: SamplingSettings,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            static_format: StaticFormat::default(),
            sampling: SamplingSettings::default(),
        }
    }
}

/// Arguments of a scenario request, after transport decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioRequest {
    pub mode: Mode,
    pub context_summary: Option<String>,
    pub max_questions: Option<u32>,
    pub language: Option<String>,
}

/// A tool response body. Errors are data, never panics or propagated errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub body: Value,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self {
                body,
                is_error: false,
            },
            Err(e) => Self::failure(format!("failed to serialize result: {e}")),
        }
    }

    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self {
            body: json!({ "error": message.to_string() }),
            is_error: true,
        }
    }

    /// Pretty-printed JSON, as delivered in a text content block.
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

impl From<ResolveError> for ToolResult {
    fn from(err: ResolveError) -> Self {
        ToolResult::failure(err)
    }
}

/// Resolves scenario requests against a shared registry.
///
/// The sampler is optional; a missing sampler and a failing one take the same
/// fallback path.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<ScenarioRegistry>,
    settings: Arc<ResolverSettings>,
    sampler: Option<Arc<dyn Sampler>>,
}

impl Resolver {
    pub fn new(registry: Arc<ScenarioRegistry>, settings: ResolverSettings) -> Self {
        Self {
            registry,
            settings: Arc::new(settings),
            sampler: None,
        }
    }

    #[must_use]
    pub fn with_sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    fn language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.settings.default_language.as_str())
    }

    pub fn list_scenarios(&self, language: Option<&str>) -> ListScenariosResult {
        ListScenariosResult {
            scenarios: self.registry.summaries(Some(self.language(language))),
        }
    }

    pub fn static_prompt(
        &self,
        scenario: &str,
        language: Option<&str>,
    ) -> Result<StaticPrompt, ResolveError> {
        let template = self
            .registry
            .get_template(scenario, Some(self.language(language)))
            .ok_or_else(|| ResolveError::UnknownScenario(scenario.to_string()))?;

        Ok(match self.settings.static_format {
            StaticFormat::Template => StaticPrompt::Template {
                template: template.clone(),
            },
            StaticFormat::Messages => StaticPrompt::Messages(vec![PromptMessage {
                role: "user".to_string(),
                content: template.prompt_body(),
            }]),
        })
    }

    /// Sampling-mode resolution.
    ///
    /// Only request validation can fail. Sampler absence, errors and timeouts all
    /// end in the fallback questions.
    pub async fn clarifying_questions(
        &self,
        scenario: &str,
        context_summary: Option<&str>,
        max_questions: Option<u32>,
        language: Option<&str>,
    ) -> Result<ClarifyingQuestionsResult, ResolveError> {
        let context = context_summary
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(ResolveError::MissingContextSummary)?;
        let max_questions = max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS);
        if !MAX_QUESTIONS_RANGE.contains(&max_questions) {
            return Err(ResolveError::InvalidMaxQuestions(max_questions));
        }
        let language = self.language(language);
        let template = self.registry.get_template(scenario, Some(language));

        match self
            .sample(scenario, template.map(|t| t.summary()), context, max_questions, language)
            .await
        {
            Ok(raw) => {
                let questions = parse_questions_from_response(&raw, max_questions as usize);
                tracing::debug!(
                    "Sampling for {} produced {} questions",
                    scenario,
                    questions.len()
                );
                return Ok(ClarifyingQuestionsResult {
                    scenario: scenario.to_string(),
                    questions,
                    raw_sampling_response: raw,
                });
            }
            Err(SamplingError::Unavailable) => {
                tracing::debug!("Sampling unavailable for {}; using fallback questions", scenario);
            }
            Err(e) => {
                tracing::warn!("Sampling failed for {}: {}; using fallback questions", scenario, e);
            }
        }

        let questions = fallback_questions(
            self.registry.fallback_questions(scenario, language),
            template,
            context,
            language,
            max_questions as usize,
        );
        Ok(ClarifyingQuestionsResult {
            scenario: scenario.to_string(),
            questions,
            raw_sampling_response: FALLBACK_SENTINEL.to_string(),
        })
    }

    async fn sample(
        &self,
        scenario: &str,
        template_summary: Option<String>,
        context: &str,
        max_questions: u32,
        language: &str,
    ) -> Result<String, SamplingError> {
        let sampling = &self.settings.sampling;
        let sampler = match &self.sampler {
            Some(s) if sampling.enabled => s,
            _ => return Err(SamplingError::Unavailable),
        };

        let summary = template_summary.unwrap_or_else(|| format!("Scenario: {scenario}"));
        let request = sampling.request(
            build_system_prompt(language).to_string(),
            build_user_message(scenario, &summary, context, max_questions, language),
        );

        match tokio::time::timeout(sampling.timeout, sampler.create_message(request)).await {
            Ok(result) => result,
            Err(_) => Err(SamplingError::Timeout(sampling.timeout)),
        }
    }

    /// Resolve one request into a tool result.
    pub async fn resolve(&self, scenario: &str, request: &ScenarioRequest) -> ToolResult {
        tracing::debug!("Resolving {} in {:?} mode", scenario, request.mode);
        let language = request.language.as_deref();
        match request.mode {
            Mode::Static => match self.static_prompt(scenario, language) {
                Ok(prompt) => ToolResult::success(&prompt),
                Err(e) => e.into(),
            },
            Mode::Sampling => match self
                .clarifying_questions(
                    scenario,
                    request.context_summary.as_deref(),
                    request.max_questions,
                    language,
                )
                .await
            {
                Ok(result) => ToolResult::success(&result),
                Err(e) => e.into(),
            },
        }
    }
}
