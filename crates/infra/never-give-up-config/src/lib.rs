//! Configuration for the never-give-up server.
//!
//! - [`NeverGiveUpConfig`]: prompts, sampling, server and logging sections
//! - [`load_merged`]: global + local JSON files with env overrides
//! - [`schema`]: JSON Schema for editor completion
//! - [`validation`]: advisory warnings
//!
//! # Configuration Precedence (lowest to highest)
//! 1. Default values
//! 2. Global config (`~/.config/never-give-up/never-give-up.json`)
//! 3. Local config (`./never-give-up.json`)
//! 4. Environment variables
//!
//! # Example
//! ```no_run
//! use never_give_up_config::load_merged;
//! use std::path::Path;
//!
//! let loaded = load_merged(Path::new(".")).unwrap();
//! println!("Default language: {}", loaded.config.prompts.default_language);
//! for warning in &loaded.warnings {
//!     eprintln!("Warning: {}", warning);
//! }
//! ```
//!
//! # Environment Variables
//! - `NEVER_GIVE_UP_PROMPTS_DIR`: Definition roots, as a platform path list
//! - `NEVER_GIVE_UP_DEFAULT_LANGUAGE`: Override the default language
//! - `NEVER_GIVE_UP_SAMPLING`: Enable or disable sampling ("true"/"1"/"false"/"0")
//! - `NEVER_GIVE_UP_LOG_LEVEL`: Override log level
//! - `NEVER_GIVE_UP_LOG_JSON`: Enable JSON logging ("true" or "1")

pub mod loader;
pub mod merge;
pub mod schema;
pub mod types;
pub mod validation;

pub use loader::{ConfigPaths, LoadedConfig, load_from, load_merged};
pub use schema::schema_json_pretty;
pub use types::NeverGiveUpConfig;
pub use validation::AdvisoryWarning;
