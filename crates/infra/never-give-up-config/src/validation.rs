//! Advisory validation.
//!
//! Problems are reported as warnings and never block loading. Hard failures
//! (bad JSON, wrong field types) are errors in [`crate::loader`].

use crate::types::NeverGiveUpConfig;
use never_give_up_core::SUPPORTED_LANGUAGES;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,
    pub message: String,
    /// Dotted path to the offending field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate(cfg: &NeverGiveUpConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    if !SUPPORTED_LANGUAGES.contains(&cfg.prompts.default_language.as_str()) {
        warnings.push(AdvisoryWarning {
            code: "prompts.default_language.unsupported",
            path: "prompts.default_language",
            message: format!(
                "'{}' has no built-in content; lookups fall back to 'en'. Supported: {}",
                cfg.prompts.default_language,
                SUPPORTED_LANGUAGES.join(", ")
            ),
        });
    }

    for dir in &cfg.prompts.dirs {
        if !dir.is_dir() {
            warnings.push(AdvisoryWarning {
                code: "prompts.dirs.missing",
                path: "prompts.dirs",
                message: format!("'{}' is not a directory", dir.display()),
            });
        }
    }

    if cfg.sampling.max_tokens == 0 {
        warnings.push(AdvisoryWarning {
            code: "sampling.max_tokens.zero",
            path: "sampling.max_tokens",
            message: "max_tokens is 0; sampled responses will be empty".to_string(),
        });
    }

    if cfg.sampling.timeout_secs == 0 {
        warnings.push(AdvisoryWarning {
            code: "sampling.timeout_secs.zero",
            path: "sampling.timeout_secs",
            message: "timeout_secs is 0; every sampling request will fall back".to_string(),
        });
    }

    let priorities = [
        ("speed_priority", cfg.sampling.speed_priority),
        ("cost_priority", cfg.sampling.cost_priority),
        ("intelligence_priority", cfg.sampling.intelligence_priority),
    ];
    for (name, value) in priorities {
        if !(0.0..=1.0).contains(&value) {
            warnings.push(AdvisoryWarning {
                code: "sampling.priority.range",
                path: "sampling",
                message: format!("{name} must be within 0.0..=1.0 (got {value})"),
            });
        }
    }

    if !LOG_LEVELS.contains(&cfg.logging.level.to_lowercase().as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: format!(
                "Unknown log level '{}'. Expected one of: {}",
                cfg.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if cfg.server.name.trim().is_empty() {
        warnings.push(AdvisoryWarning {
            code: "server.name.empty",
            path: "server.name",
            message: "server name is empty".to_string(),
        });
    }

    warnings
}
