//! Tool definitions and the dispatch table built from the registry.

use never_give_up_core::{
    Mode, ResolveError, Resolver, ScenarioRegistry, ScenarioRequest, ToolResult,
};
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub const LIST_SCENARIOS: &str = "list_scenarios";
pub const GET_PROMPT: &str = "get_prompt";
pub const GET_STATIC_PROMPT: &str = "get_static_prompt";
pub const GENERATE_CLARIFYING_QUESTIONS: &str = "generate_clarifying_questions";

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListScenariosInput {
    /// Language for titles and descriptions (e.g. "en", "zh-CN").
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    /// Choose 'static' for predefined prompts or 'sampling' for AI-generated questions.
    /// Default is 'static' for MCP clients that don't support sampling.
    #[serde(default)]
    pub mode: Mode,
    /// What the agent has been trying to do and why it is stuck. Required for 'sampling' mode.
    #[serde(default)]
    pub context_summary: Option<String>,
    /// Maximum number of questions to generate (1-10, default 3).
    #[serde(default)]
    #[schemars(range(min = 1, max = 10))]
    pub max_questions: Option<u32>,
    /// Response language (e.g. "en", "zh-CN"). Defaults to the server's default language.
    #[serde(default)]
    pub language: Option<String>,
}

impl From<ScenarioInput> for ScenarioRequest {
    fn from(input: ScenarioInput) -> Self {
        ScenarioRequest {
            mode: input.mode,
            context_summary: input.context_summary,
            max_questions: input.max_questions,
            language: input.language,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPromptInput {
    /// Scenario id.
    pub scenario: String,
    #[serde(flatten)]
    pub request: ScenarioInput,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetStaticPromptInput {
    /// Scenario id.
    pub scenario: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsInput {
    /// Scenario id.
    pub scenario: String,
    /// What the agent has been trying to do and why it is stuck.
    #[serde(default)]
    pub context_summary: Option<String>,
    /// Maximum number of questions to generate (1-10, default 3).
    #[serde(default)]
    #[schemars(range(min = 1, max = 10))]
    pub max_questions: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
}

/// What a tool name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListScenarios,
    /// A core scenario exposed under its own id.
    Scenario(String),
    GetPrompt,
    GetStaticPrompt,
    GenerateQuestions,
}

#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
    pub route: Route,
}

fn input_schema<T: JsonSchema>() -> Map<String, Value> {
    let schema = SchemaSettings::draft2020_12()
        .into_generator()
        .into_root_schema_for::<T>();
    match serde_json::to_value(&schema) {
        Ok(Value::Object(obj)) => obj,
        _ => Map::from_iter([("type".to_string(), json!("object"))]),
    }
}

/// Restrict `properties.scenario` to the known ids.
fn constrain_scenario(schema: &mut Map<String, Value>, ids: &[&str]) {
    if let Some(Value::Object(field)) = schema
        .get_mut("properties")
        .and_then(|p| p.get_mut("scenario"))
    {
        field.insert("enum".to_string(), json!(ids));
    }
}

/// Tool name → spec, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct ToolTable {
    tools: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolTable {
    /// One tool per core scenario plus the generic tools.
    pub fn build(registry: &ScenarioRegistry) -> Self {
        let all_ids = registry.list_all_ids();
        let mut tools = vec![ToolSpec {
            name: LIST_SCENARIOS.to_string(),
            title: "List scenarios".to_string(),
            description: "List every available stuck-agent scenario with its tier and languages."
                .to_string(),
            input_schema: input_schema::<ListScenariosInput>(),
            route: Route::ListScenarios,
        }];

        for entry in registry.entries() {
            if !registry.is_core(&entry.id) {
                continue;
            }
            let Some(template) = entry.template(None) else {
                continue;
            };
            tools.push(ToolSpec {
                name: entry.id.clone(),
                title: template.title.clone(),
                description: template.description.clone(),
                input_schema: input_schema::<ScenarioInput>(),
                route: Route::Scenario(entry.id.clone()),
            });
        }

        let mut get_prompt = input_schema::<GetPromptInput>();
        constrain_scenario(&mut get_prompt, &all_ids);
        let mut get_static = input_schema::<GetStaticPromptInput>();
        constrain_scenario(&mut get_static, &all_ids);
        let mut generate = input_schema::<GenerateQuestionsInput>();
        constrain_scenario(&mut generate, &all_ids);

        tools.extend([
            ToolSpec {
                name: GET_PROMPT.to_string(),
                title: "Get prompt".to_string(),
                description: "Get the prompt or clarifying questions for any scenario, core or extended."
                    .to_string(),
                input_schema: get_prompt,
                route: Route::GetPrompt,
            },
            ToolSpec {
                name: GET_STATIC_PROMPT.to_string(),
                title: "Get static prompt".to_string(),
                description: "Get the pre-authored prompt template for a scenario.".to_string(),
                input_schema: get_static,
                route: Route::GetStaticPrompt,
            },
            ToolSpec {
                name: GENERATE_CLARIFYING_QUESTIONS.to_string(),
                title: "Generate clarifying questions".to_string(),
                description: "Generate clarifying questions for the human user, using the client's model when available."
                    .to_string(),
                input_schema: generate,
                route: Route::GenerateQuestions,
            },
        ]);

        let index = tools
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self { tools, index }
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.tools[i])
    }
}

fn decode<T: DeserializeOwned>(args: Value) -> Result<T, ToolResult> {
    serde_json::from_value(args).map_err(|e| ResolveError::InvalidArguments(e.to_string()).into())
}

fn ensure_known(resolver: &Resolver, scenario: &str) -> Result<(), ToolResult> {
    if resolver.registry().contains(scenario) {
        Ok(())
    } else {
        Err(ResolveError::UnknownScenario(scenario.to_string()).into())
    }
}

/// Run one tool call. Every failure comes back as an error result.
pub async fn dispatch(route: &Route, args: Value, resolver: &Resolver) -> ToolResult {
    match try_dispatch(route, args, resolver).await {
        Ok(result) | Err(result) => result,
    }
}

async fn try_dispatch(
    route: &Route,
    args: Value,
    resolver: &Resolver,
) -> Result<ToolResult, ToolResult> {
    Ok(match route {
        Route::ListScenarios => {
            let input: ListScenariosInput = decode(args)?;
            ToolResult::success(&resolver.list_scenarios(input.language.as_deref()))
        }
        Route::Scenario(id) => {
            let input: ScenarioInput = decode(args)?;
            resolver.resolve(id, &input.into()).await
        }
        Route::GetPrompt => {
            let input: GetPromptInput = decode(args)?;
            ensure_known(resolver, &input.scenario)?;
            resolver
                .resolve(&input.scenario, &input.request.into())
                .await
        }
        Route::GetStaticPrompt => {
            let input: GetStaticPromptInput = decode(args)?;
            ensure_known(resolver, &input.scenario)?;
            match resolver.static_prompt(&input.scenario, input.language.as_deref()) {
                Ok(prompt) => ToolResult::success(&prompt),
                Err(e) => e.into(),
            }
        }
        Route::GenerateQuestions => {
            let input: GenerateQuestionsInput = decode(args)?;
            ensure_known(resolver, &input.scenario)?;
            let request = ScenarioRequest {
                mode: Mode::Sampling,
                context_summary: input.context_summary,
                max_questions: input.max_questions,
                language: input.language,
            };
            resolver.resolve(&input.scenario, &request).await
        }
    })
}
