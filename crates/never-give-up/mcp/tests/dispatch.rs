use never_give_up_core::{Resolver, ResolverSettings, ScenarioRegistry};
use never_give_up_mcp::tools::{GENERATE_CLARIFYING_QUESTIONS, GET_PROMPT, GET_STATIC_PROMPT, LIST_SCENARIOS};
use never_give_up_mcp::{ToolTable, dispatch};
use serde_json::{Value, json};
use std::sync::Arc;

fn setup() -> (ToolTable, Resolver) {
    let (registry, report) = ScenarioRegistry::builtin();
    assert!(report.is_ok());
    let table = ToolTable::build(&registry);
    (table, Resolver::new(Arc::new(registry), ResolverSettings::default()))
}

async fn call(tool: &str, args: Value) -> (Value, bool) {
    let (table, resolver) = setup();
    let spec = table.get(tool).expect("tool exists");
    let result = dispatch(&spec.route, args, &resolver).await;
    (result.body, result.is_error)
}

#[tokio::test]
async fn list_scenarios_includes_both_tiers() {
    let (body, is_error) = call(LIST_SCENARIOS, json!({})).await;
    assert!(!is_error);
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 6);
    let scope = scenarios.iter().find(|s| s["id"] == "scope-creep").unwrap();
    assert_eq!(scope["tier"], "extended");
    assert_eq!(scope["languages"], json!(["en", "zh-CN"]));
}

#[tokio::test]
async fn core_tool_defaults_to_static() {
    let (body, is_error) = call("bug-fix-always-failed", json!({})).await;
    assert!(!is_error);
    assert_eq!(body["template"]["title"], "Bug fix keeps failing");
    assert_eq!(body["template"]["guidanceBullets"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn core_tool_sampling_requires_context() {
    let (body, is_error) = call("missing-requirements", json!({ "mode": "sampling" })).await;
    assert!(is_error);
    assert!(body["error"].as_str().unwrap().contains("contextSummary is required"));
}

#[tokio::test]
async fn get_prompt_rejects_unknown_scenario() {
    let (body, is_error) = call(GET_PROMPT, json!({ "scenario": "not-a-scenario" })).await;
    assert!(is_error);
    assert_eq!(body["error"], "No template found for scenario: not-a-scenario");
}

#[tokio::test]
async fn get_prompt_reaches_extended_tier() {
    let (body, is_error) = call(
        GET_PROMPT,
        json!({ "scenario": "scope-creep", "language": "zh-CN" }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(body["template"]["title"], "范围不断扩大");
}

#[tokio::test]
async fn get_static_prompt_ignores_mode() {
    let (body, is_error) = call(
        GET_STATIC_PROMPT,
        json!({ "scenario": "analysis-too-long", "mode": "sampling" }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(body["template"]["scenario"], "analysis-too-long");
}

#[tokio::test]
async fn generate_questions_without_sampler_falls_back() {
    let (body, is_error) = call(
        GENERATE_CLARIFYING_QUESTIONS,
        json!({
            "scenario": "logic-is-too-complex",
            "contextSummary": "Recursion over a graph keeps looping",
            "maxQuestions": 2
        }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(
        body["rawSamplingResponse"],
        "Sampling not available - using fallback questions"
    );
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["type"], "free-text");
}

#[tokio::test]
async fn generate_questions_rejects_out_of_range_limit() {
    let (body, is_error) = call(
        GENERATE_CLARIFYING_QUESTIONS,
        json!({ "scenario": "logic-is-too-complex", "contextSummary": "x", "maxQuestions": 11 }),
    )
    .await;
    assert!(is_error);
    assert_eq!(body["error"], "maxQuestions must be between 1 and 10 (got 11)");
}

#[tokio::test]
async fn malformed_arguments_are_error_results() {
    let (body, is_error) = call("missing-requirements", json!({ "mode": "telepathy" })).await;
    assert!(is_error);
    assert!(body["error"].as_str().unwrap().starts_with("invalid arguments:"));
}

#[test]
fn tool_schemas_are_valid_json_schema() {
    let (table, _) = setup();
    for spec in table.tools() {
        let schema = Value::Object(spec.input_schema.clone());
        assert!(
            jsonschema::validator_for(&schema).is_ok(),
            "schema for {} should compile",
            spec.name
        );
    }
}

#[test]
fn get_prompt_schema_accepts_known_ids_only() {
    let (table, _) = setup();
    let schema = Value::Object(table.get(GET_PROMPT).unwrap().input_schema.clone());
    let validator = jsonschema::validator_for(&schema).unwrap();
    assert!(validator.is_valid(&json!({ "scenario": "missing-requirements" })));
    assert!(!validator.is_valid(&json!({ "scenario": "nope" })));
}
