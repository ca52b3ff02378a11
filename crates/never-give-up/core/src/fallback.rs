//! Deterministic questions used whenever sampling cannot answer.

use crate::types::{ClarifyingQuestion, PromptTemplate};

/// Returned as `rawSamplingResponse` when these questions are used.
pub const FALLBACK_SENTINEL: &str = "Sampling not available - using fallback questions";

/// Characters of the context summary quoted in the first authored question.
pub const CONTEXT_PREVIEW_LENGTH: usize = 100;

const BULLET_QUESTION_LIMIT: usize = 3;

fn preview(context: &str) -> String {
    context.chars().take(CONTEXT_PREVIEW_LENGTH).collect()
}

fn with_context(language: &str, context: &str, question: &str) -> String {
    let preview = preview(context);
    if language == "zh-CN" {
        format!("根据上下文：\"{preview}...\" {question}")
    } else {
        format!("Given the context: \"{preview}...\" {question}")
    }
}

fn bullet_question(language: &str, bullet: &str) -> String {
    if language == "zh-CN" {
        format!("关于\"{bullet}\"，能否提供更多细节？")
    } else {
        format!("Regarding \"{bullet}\", can you provide more details?")
    }
}

fn default_question(language: &str) -> &'static str {
    if language == "zh-CN" {
        "能否更详细地描述这个问题？"
    } else {
        "Can you describe this problem in more detail?"
    }
}

/// Build fallback questions. Always returns at least one question.
///
/// Preference order:
/// 1. the scenario's authored questions, the first one prefixed with a preview of
///    the context summary;
/// 2. up to three questions derived from the template's guidance bullets;
/// 3. a single generic question.
pub fn fallback_questions(
    authored: &[String],
    template: Option<&PromptTemplate>,
    context_summary: &str,
    language: &str,
    max_questions: usize,
) -> Vec<ClarifyingQuestion> {
    let max_questions = max_questions.max(1);

    let texts: Vec<String> = if !authored.is_empty() {
        authored
            .iter()
            .enumerate()
            .map(|(i, q)| {
                if i == 0 && !context_summary.is_empty() {
                    with_context(language, context_summary, q)
                } else {
                    q.clone()
                }
            })
            .collect()
    } else if let Some(t) = template.filter(|t| !t.guidance_bullets.is_empty()) {
        t.guidance_bullets
            .iter()
            .take(BULLET_QUESTION_LIMIT)
            .map(|b| bullet_question(language, b))
            .collect()
    } else {
        vec![default_question(language).to_string()]
    };

    texts
        .into_iter()
        .take(max_questions)
        .enumerate()
        .map(|(i, text)| ClarifyingQuestion::free_text(format!("q{}", i + 1), text))
        .collect()
}
