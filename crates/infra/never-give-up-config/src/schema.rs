//! JSON Schema for `never-give-up.json`, for editor completion.

use crate::types::NeverGiveUpConfig;
use schemars::{Schema, generate::SchemaSettings};

pub fn schema() -> Schema {
    SchemaSettings::default()
        .into_generator()
        .into_root_schema_for::<NeverGiveUpConfig>()
}

pub fn schema_json_pretty() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schema())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> jsonschema::Validator {
        jsonschema::validator_for(&serde_json::to_value(schema()).unwrap()).unwrap()
    }

    #[test]
    fn test_schema_lists_sections() {
        let json: serde_json::Value = serde_json::from_str(&schema_json_pretty().unwrap()).unwrap();
        let props = json["properties"].as_object().unwrap();
        for key in ["prompts", "sampling", "server", "logging"] {
            assert!(props.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_default_config_validates_against_schema() {
        let config_json = serde_json::to_value(NeverGiveUpConfig::default()).unwrap();
        let result = validator().validate(&config_json);
        assert!(result.is_ok(), "default config should validate: {:?}", result.err());
    }

    #[test]
    fn test_partial_config_validates() {
        assert!(validator().is_valid(&json!({
            "$schema": "./schema.json",
            "server": { "static_format": "messages" }
        })));
    }

    #[test]
    fn test_unknown_static_format_rejected() {
        assert!(!validator().is_valid(&json!({ "server": { "static_format": "html" } })));
    }
}
