//! MCP server for never-give-up scenario prompts.
//!
//! [`ScenarioServer`] exposes one tool per core scenario plus the generic
//! `list_scenarios`, `get_prompt`, `get_static_prompt` and
//! `generate_clarifying_questions` tools. Sampling goes through the connected
//! client via [`PeerSampler`] when the client supports it.

mod sampler;
mod server;
pub mod tools;

pub use sampler::{PeerSampler, request_params, response_text};
pub use server::{SERVER_NAME, ScenarioServer};
pub use tools::{Route, ToolSpec, ToolTable, dispatch};

// Re-export rmcp types for convenience
pub use rmcp::transport::stdio;
pub use rmcp::{ServerHandler, service::ServiceExt};
