//! Lenient parser for scenario definition files (`tool.md`).
//!
//! A definition is an optional front matter block followed by a markdown body:
//!
//! ```text
//! ---
//! name: missing-requirements
//! title:
//!   en: Missing requirements
//!   zh-CN: 缺少需求
//! description: "Use when requirements are unclear."
//! ---
//!
//! ## System Prompt
//! ### English
//! You are a requirements analyst...
//!
//! ## Guidance Bullets
//! - List all known requirements clearly
//! ```
//!
//! Nothing in here fails: malformed front matter lines are skipped, unknown
//! sections are ignored and missing sections default to empty.

use crate::DEFAULT_LANGUAGE;
use crate::types::PromptTemplate;

/// Values keyed by language tag, kept in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `language`, keeping its original position.
    pub fn insert(&mut self, language: impl Into<String>, value: T) {
        let language = language.into();
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == language) {
            slot.1 = value;
        } else {
            self.entries.push((language, value));
        }
    }

    pub fn get(&self, language: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(l, _)| l == language)
            .map(|(_, v)| v)
    }

    /// Exact language, then [`DEFAULT_LANGUAGE`].
    pub fn resolve(&self, language: &str) -> Option<&T> {
        self.get(language).or_else(|| self.get(DEFAULT_LANGUAGE))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Structured view of one definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDefinition {
    /// `name` from front matter (may differ from the folder id; the folder wins).
    pub name: String,
    pub title: Localized<String>,
    pub description: Localized<String>,
    pub system_prompt: Localized<String>,
    pub user_prompt_template: Localized<String>,
    pub guidance_bullets: Localized<Vec<String>>,
    pub fallback_questions: Localized<Vec<String>>,
}

impl ParsedDefinition {
    /// Languages that get a template: every language with a title, description or
    /// system prompt, in that order of first appearance.
    pub fn languages(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for lang in self
            .title
            .languages()
            .chain(self.description.languages())
            .chain(self.system_prompt.languages())
        {
            if !out.iter().any(|l| l == lang) {
                out.push(lang.to_string());
            }
        }
        out
    }

    /// Build one template per language, filling gaps from the default language.
    pub fn to_templates(&self, scenario: &str) -> Vec<PromptTemplate> {
        self.languages()
            .into_iter()
            .map(|lang| {
                let title = self.title.resolve(&lang).cloned().unwrap_or_else(|| {
                    if self.name.is_empty() {
                        scenario.to_string()
                    } else {
                        self.name.clone()
                    }
                });
                PromptTemplate {
                    scenario: scenario.to_string(),
                    title,
                    description: self.description.resolve(&lang).cloned().unwrap_or_default(),
                    system_prompt: self.system_prompt.resolve(&lang).cloned().unwrap_or_default(),
                    user_prompt_template: self.user_prompt_template.resolve(&lang).cloned(),
                    guidance_bullets: self
                        .guidance_bullets
                        .resolve(&lang)
                        .cloned()
                        .unwrap_or_default(),
                    language: lang,
                }
            })
            .collect()
    }

    /// Authored fallback questions for `language`, falling back to the default language.
    pub fn fallback_questions_for(&self, language: &str) -> &[String] {
        self.fallback_questions
            .resolve(language)
            .map_or(&[], Vec::as_slice)
    }
}

/// Parse a definition file. Never fails.
pub fn parse_definition(raw: &str) -> ParsedDefinition {
    let (front, body) = match split_front_matter(raw) {
        Some((meta, body)) => (parse_front_matter(meta), body),
        None => (Vec::new(), raw),
    };

    let mut def = ParsedDefinition::default();
    for (key, value) in front {
        match (key.as_str(), value) {
            ("name", FrontValue::Scalar(s)) => def.name = s,
            ("title", v) => def.title = v.into_localized(),
            ("description", v) => def.description = v.into_localized(),
            _ => {}
        }
    }

    for section in extract_sections(body) {
        let RawSection {
            key,
            language,
            content,
        } = section;
        match key.as_str() {
            "system_prompt" => def.system_prompt.insert(language, content.into_text()),
            "user_prompt_template" => def.user_prompt_template.insert(language, content.into_text()),
            "guidance_bullets" => def.guidance_bullets.insert(language, content.into_items()),
            "fallback_questions" => def.fallback_questions.insert(language, content.into_items()),
            other => tracing::debug!("Ignoring unknown definition section '{}'", other),
        }
    }

    def
}

/// Split `---` delimited front matter from the body.
///
/// Returns `None` when the input does not open with a `---` line or the closing
/// delimiter is missing; the caller then treats everything as body.
pub fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FrontValue {
    Scalar(String),
    Map(Localized<String>),
}

impl FrontValue {
    fn into_localized(self) -> Localized<String> {
        match self {
            FrontValue::Scalar(s) => {
                let mut map = Localized::new();
                map.insert(DEFAULT_LANGUAGE, s);
                map
            }
            FrontValue::Map(map) => map,
        }
    }
}

/// Flat or one-level nested `key: value` pairs. Lines that don't fit are skipped.
fn parse_front_matter(meta: &str) -> Vec<(String, FrontValue)> {
    let mut out: Vec<(String, FrontValue)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in meta.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if line.starts_with(char::is_whitespace) {
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
                continue;
            }
            if let Some((_, FrontValue::Map(map))) = current.and_then(|i| out.get_mut(i)) {
                map.insert(normalize_language(key), unquote(value).to_string());
            }
            continue;
        }

        if key.is_empty() || !key.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
            current = None;
            continue;
        }
        let parsed = if value.is_empty() {
            FrontValue::Map(Localized::new())
        } else {
            FrontValue::Scalar(unquote(value).to_string())
        };
        if let Some(i) = out.iter().position(|(k, _)| k == key) {
            out[i].1 = parsed;
            current = Some(i);
        } else {
            out.push((key.to_string(), parsed));
            current = Some(out.len() - 1);
        }
    }
    out
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Map a `###` header to a language tag.
pub fn normalize_language(tag: &str) -> String {
    match tag.trim() {
        "English" | "english" | "en" => "en".to_string(),
        "中文" | "Chinese" | "chinese" | "zh-CN" => "zh-CN".to_string(),
        other => other.to_string(),
    }
}

/// `"User Prompt Template"` → `"user_prompt_template"`.
pub fn normalize_section_key(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Collected content of one section/language pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// Free text, newlines preserved.
    Text(String),
    /// Every non-empty line was a `- ` bullet.
    List { raw: String, items: Vec<String> },
}

impl SectionContent {
    fn classify(content: String) -> Self {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.iter().all(|l| l.starts_with("- ")) {
            let items = lines.iter().map(|l| l[2..].trim().to_string()).collect();
            SectionContent::List {
                raw: content,
                items,
            }
        } else {
            SectionContent::Text(content)
        }
    }

    pub fn into_text(self) -> String {
        match self {
            SectionContent::Text(s) | SectionContent::List { raw: s, .. } => s,
        }
    }

    /// List items, or the whole text as a single item.
    pub fn into_items(self) -> Vec<String> {
        match self {
            SectionContent::Text(s) => vec![s],
            SectionContent::List { items, .. } => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawSection {
    key: String,
    language: String,
    content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    SeekingSection,
    InSection { key: String },
    InLanguage { key: String, language: String },
}

struct SectionScanner<'a> {
    state: ScanState,
    buffer: Vec<&'a str>,
    sections: Vec<RawSection>,
}

impl<'a> SectionScanner<'a> {
    fn new() -> Self {
        Self {
            state: ScanState::SeekingSection,
            buffer: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn feed(&mut self, line: &'a str) {
        let line = line.trim_end_matches('\r');

        if let Some(header) = line.strip_prefix("## ") {
            self.flush();
            self.state = ScanState::InSection {
                key: normalize_section_key(header),
            };
            return;
        }

        if let Some(header) = line.strip_prefix("### ") {
            self.flush();
            self.state = match std::mem::replace(&mut self.state, ScanState::SeekingSection) {
                ScanState::SeekingSection => ScanState::SeekingSection,
                ScanState::InSection { key } | ScanState::InLanguage { key, .. } => {
                    ScanState::InLanguage {
                        key,
                        language: normalize_language(header),
                    }
                }
            };
            return;
        }

        if !matches!(self.state, ScanState::SeekingSection) {
            self.buffer.push(line);
        }
    }

    fn flush(&mut self) {
        let lines = std::mem::take(&mut self.buffer);
        let (key, language) = match &self.state {
            ScanState::SeekingSection => return,
            ScanState::InSection { key } => (key.clone(), DEFAULT_LANGUAGE.to_string()),
            ScanState::InLanguage { key, language } => (key.clone(), language.clone()),
        };
        let content = lines.join("\n").trim().to_string();
        if content.is_empty() {
            return;
        }
        self.sections.push(RawSection {
            key,
            language,
            content: SectionContent::classify(content),
        });
    }

    fn finish(mut self) -> Vec<RawSection> {
        self.flush();
        self.sections
    }
}

fn extract_sections(body: &str) -> Vec<RawSection> {
    let mut scanner = SectionScanner::new();
    for line in body.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}
