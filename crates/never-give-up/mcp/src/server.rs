//! MCP server handler backed by a [`Resolver`].

use crate::sampler::PeerSampler;
use crate::tools::{ToolTable, dispatch};
use never_give_up_core::Resolver;
use rmcp::model as m;
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use std::sync::Arc;

/// Name advertised in `initialize`.
pub const SERVER_NAME: &str = "agent-never-give-up-mcp";

const INSTRUCTIONS: &str = "Call a scenario tool when you are stuck: looping on a bug fix, \
over-analyzing, or missing requirements. Use mode 'sampling' with a contextSummary to get \
clarifying questions for the human user.";

/// Serves the scenario tools.
///
/// The tool table is built once from the resolver's registry. Each call gets a
/// resolver wired to the calling client for sampling.
pub struct ScenarioServer {
    resolver: Resolver,
    tools: Arc<ToolTable>,
    name: String,
    version: String,
}

impl ScenarioServer {
    pub fn new(resolver: Resolver) -> Self {
        let tools = Arc::new(ToolTable::build(resolver.registry()));
        Self {
            resolver,
            tools,
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Set the server name and version.
    pub fn with_info(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tool_table(&self) -> &ToolTable {
        &self.tools
    }
}

// Allow manual_async_fn because the trait signature uses `impl Future` return types
#[allow(clippy::manual_async_fn)]
impl ServerHandler for ScenarioServer {
    fn initialize(
        &self,
        params: m::InitializeRequestParam,
        ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::InitializeResult, m::ErrorData>> + Send + '_
    {
        async move {
            if ctx.peer.peer_info().is_none() {
                ctx.peer.set_peer_info(params);
            }
            Ok(m::InitializeResult {
                server_info: m::Implementation {
                    name: self.name.clone(),
                    title: self.name.clone().into(),
                    version: self.version.clone(),
                    website_url: None,
                    icons: None,
                },
                capabilities: m::ServerCapabilities::builder().enable_tools().build(),
                instructions: Some(INSTRUCTIONS.to_string()),
                ..Default::default()
            })
        }
    }

    fn list_tools(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListToolsResult, m::ErrorData>> + Send + '_
    {
        async move {
            let tools = self
                .tools
                .tools()
                .iter()
                .map(|spec| m::Tool {
                    name: spec.name.clone().into(),
                    title: spec.title.clone().into(),
                    description: Some(spec.description.clone().into()),
                    input_schema: Arc::new(spec.input_schema.clone()),
                    annotations: None,
                    output_schema: None,
                    icons: None,
                    meta: None,
                })
                .collect();
            Ok(m::ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        req: m::CallToolRequestParam,
        ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CallToolResult, m::ErrorData>> + Send + '_
    {
        async move {
            let Some(spec) = self.tools.get(&req.name) else {
                return Ok(m::CallToolResult::error(vec![m::Content::text(format!(
                    "Unknown tool '{}'",
                    req.name
                ))]));
            };

            tracing::debug!("call_tool {}", spec.name);
            let args = serde_json::Value::Object(req.arguments.unwrap_or_default());
            let resolver = self
                .resolver
                .clone()
                .with_sampler(Arc::new(PeerSampler::new(ctx.peer.clone())));
            let result = dispatch(&spec.route, args, &resolver).await;

            Ok(m::CallToolResult {
                content: vec![m::Content::text(result.to_text())],
                structured_content: None,
                is_error: Some(result.is_error),
                meta: None,
            })
        }
    }

    fn ping(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }

    fn list_prompts(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListPromptsResult, m::ErrorData>> + Send + '_
    {
        async {
            Ok(m::ListPromptsResult {
                prompts: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn list_resources(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListResourcesResult, m::ErrorData>> + Send + '_
    {
        async {
            Ok(m::ListResourcesResult {
                resources: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }
}
