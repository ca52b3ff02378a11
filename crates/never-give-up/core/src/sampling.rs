//! The optional sampling collaborator and everything around a sampling call:
//! prompt construction, request parameters and lenient response parsing.

use crate::types::{ClarifyingQuestion, PromptMessage, QuestionOption, QuestionType};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("sampling is not available from the client")]
    Unavailable,

    #[error("sampling request failed: {0}")]
    Failed(String),

    #[error("sampling timed out after {0:?}")]
    Timeout(Duration),
}

/// Asks an upstream model for a completion. One request in, text out.
pub trait Sampler: Send + Sync {
    fn create_message(&self, request: SamplingRequest)
    -> BoxFuture<'static, Result<String, SamplingError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelPreferences {
    pub hints: Vec<String>,
    pub speed_priority: f64,
    pub cost_priority: f64,
    pub intelligence_priority: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRequest {
    pub messages: Vec<PromptMessage>,
    pub system_prompt: String,
    pub max_tokens: u32,
    /// Always `"none"`: the questions are derived from the summary alone.
    pub include_context: String,
    pub model_preferences: ModelPreferences,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingSettings {
    pub enabled: bool,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub model_hint: String,
    pub speed_priority: f64,
    pub cost_priority: f64,
    pub intelligence_priority: f64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tokens: 512,
            timeout: Duration::from_secs(30),
            model_hint: "claude-3".to_string(),
            speed_priority: 0.5,
            cost_priority: 0.3,
            intelligence_priority: 0.8,
        }
    }
}

impl SamplingSettings {
    pub fn request(&self, system_prompt: String, user_message: String) -> SamplingRequest {
        SamplingRequest {
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: user_message,
            }],
            system_prompt,
            max_tokens: self.max_tokens,
            include_context: "none".to_string(),
            model_preferences: ModelPreferences {
                hints: vec![self.model_hint.clone()],
                speed_priority: self.speed_priority,
                cost_priority: self.cost_priority,
                intelligence_priority: self.intelligence_priority,
            },
        }
    }
}

const SYSTEM_PROMPT_EN: &str = r#"You are an expert assistant that helps a human and an AI agent get unstuck.
Your task is to propose a small number of high-signal clarifying questions
for the HUMAN user, not the AI. These questions should be:
- concrete and specific to the scenario;
- helpful to break loops or repeated failures;
- strictly focused on the user's goal and constraints.

Output STRICTLY in JSON with the following shape:
{
  "questions": [
    {
      "id": "q1",
      "text": "...",
      "type": "free-text" | "single-choice" | "multi-choice",
      "options": [ { "id": "opt1", "label": "..." } ] // optional, only for choice types
    }
  ]
}"#;

const SYSTEM_PROMPT_ZH: &str = r#"你是一位专家助手，帮助人类和AI代理摆脱困境。
你的任务是为人类用户（不是AI）提出少量高价值的澄清问题。
这些问题应该是：
- 针对场景的具体问题；
- 有助于打破循环或重复失败；
- 严格关注用户的目标和约束。

严格按照以下JSON格式输出：
{
  "questions": [
    {
      "id": "q1",
      "text": "...",
      "type": "free-text" | "single-choice" | "multi-choice",
      "options": [ { "id": "opt1", "label": "..." } ] // 可选，仅用于选择类型
    }
  ]
}"#;

/// System prompt carrying the JSON output contract. Only `zh-CN` is localized.
pub fn build_system_prompt(language: &str) -> &'static str {
    if language == "zh-CN" {
        SYSTEM_PROMPT_ZH
    } else {
        SYSTEM_PROMPT_EN
    }
}

pub fn build_user_message(
    scenario: &str,
    template_summary: &str,
    context_summary: &str,
    max_questions: u32,
    language: &str,
) -> String {
    if language == "zh-CN" {
        return [
            format!("场景ID: {scenario}"),
            String::new(),
            "场景描述/模板摘要：".to_string(),
            template_summary.to_string(),
            String::new(),
            "来自代理的上下文摘要（推理、尝试、错误）：".to_string(),
            context_summary.to_string(),
            String::new(),
            format!("请用请求的语言（{language}）生成最多{max_questions}个问题。"),
        ]
        .join("\n");
    }

    [
        format!("Scenario id: {scenario}"),
        String::new(),
        "Scenario description / template summary:".to_string(),
        template_summary.to_string(),
        String::new(),
        "Context summary from the agent (reasoning, attempts, errors):".to_string(),
        context_summary.to_string(),
        String::new(),
        format!(
            "Please generate at most {max_questions} questions in the requested language ({language})."
        ),
    ]
    .join("\n")
}

/// Locate a JSON object mentioning `"questions"`: from the first `{` through the
/// last `}`, provided a `"questions"` literal sits between them.
pub fn extract_questions_object(raw: &str) -> Option<&str> {
    let end = raw.rfind('}')?;
    let marker = raw[..end].rfind("\"questions\"")?;
    let start = raw[..marker].find('{')?;
    Some(&raw[start..=end])
}

#[derive(Debug, Deserialize)]
struct WireQuestions {
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    options: Option<Vec<QuestionOption>>,
}

fn parse_wire(raw: &str) -> Option<Vec<ClarifyingQuestion>> {
    let json = extract_questions_object(raw)?;
    let wire: WireQuestions = serde_json::from_str(json)
        .map_err(|e| tracing::debug!("Sampling response is not valid questions JSON: {}", e))
        .ok()?;

    wire.questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let text = q.text.filter(|t| !t.trim().is_empty())?;
            let id = q
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("q{}", i + 1));
            let mut kind = q
                .kind
                .as_deref()
                .and_then(QuestionType::parse)
                .unwrap_or_default();
            let options = q.options.filter(|o| !o.is_empty());
            if kind.is_choice() && options.is_none() {
                kind = QuestionType::FreeText;
            }
            let options = if kind.is_choice() { options } else { None };
            Some(ClarifyingQuestion {
                id,
                text,
                kind,
                options,
            })
        })
        .collect()
}

/// Turn raw sampling text into questions.
///
/// Empty text yields nothing. Text without a usable questions object becomes a
/// single free-text question. The result is cut to `max_questions`.
pub fn parse_questions_from_response(raw: &str, max_questions: usize) -> Vec<ClarifyingQuestion> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut questions = parse_wire(raw)
        .unwrap_or_else(|| vec![ClarifyingQuestion::free_text("q1", raw.trim())]);
    questions.truncate(max_questions);
    questions
}
