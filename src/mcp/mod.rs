//! MCP server exposing the coding assistant commands.

mod types;

use std::sync::Arc;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};

use crate::assistant::{Assistant, Invocation};
use crate::catalog::{self, Command};

/// Prefix on every successful generation.
pub const RESPONSE_PREFIX: &str = "🤖 GEMINI RESPONSE:\n\n";

/// Catalog commands plus `gchelp` and `server_info`.
pub const TOOL_COUNT: usize = Command::ALL.len() + 2;

#[derive(Clone)]
pub struct GeminiCodingServer {
    assistant: Arc<Assistant>,
    tool_router: ToolRouter<Self>,
}

impl GeminiCodingServer {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self {
            assistant,
            tool_router: Self::tool_router(),
        }
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Run a command and wrap the outcome as a tool result.
    ///
    /// Command failures become `isError` results rather than protocol errors,
    /// so one bad call never disturbs the session.
    pub async fn execute(&self, invocation: Invocation) -> CallToolResult {
        let tool = invocation.command.tool_name();
        match self.assistant.invoke(invocation).await {
            Ok(text) => CallToolResult::success(vec![Content::text(format!(
                "{}{}",
                RESPONSE_PREFIX, text
            ))]),
            Err(e) => {
                tracing::warn!(tool, kind = e.kind(), "command failed: {}", e);
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    pub fn help(&self, category: Option<&str>) -> String {
        catalog::help_text(
            category.unwrap_or("all"),
            self.assistant.resolver().env_var(),
        )
    }

    /// Usage notes sent to clients at initialization.
    pub fn instructions(&self) -> String {
        format!(
            r#"IDE coding assistant backed by Gemini. All commands are prefixed with 'gc'.

Start with gchelp to see every command with examples.

INPUT: every command that analyzes text takes it from, in order:
1. its text parameter (prompt, code, specification, ...)
2. file_path (a missing or unreadable file is an error, not a fallback)
3. the {} environment variable
4. the clipboard

Set fast=true to use the faster model. Responses to low-temperature commands
are cached for a few minutes, so repeating a review is instant."#,
            self.assistant.resolver().env_var()
        )
    }

    pub fn status(&self) -> ServerStatus {
        let models = self.assistant.models();
        ServerStatus {
            name: crate::SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_key_configured: self.assistant.generator_configured(),
            clipboard: self.assistant.resolver().clipboard_status(),
            input_env_var: self.assistant.resolver().env_var().to_string(),
            pro_model: models.pro.clone(),
            fast_model: models.fast.clone(),
            cache_entries: self.assistant.cache().len(),
            cache_temperature_cutoff: self.assistant.cache().temperature_cutoff(),
            tool_count: TOOL_COUNT,
        }
    }
}

#[tool_router]
impl GeminiCodingServer {
    // ============================================================
    // Basic Tools
    // ============================================================

    #[tool(description = "Show available commands and usage examples")]
    async fn gchelp(
        &self,
        params: Parameters<HelpRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        Ok(CallToolResult::success(vec![Content::text(
            self.help(req.category.as_deref()),
        )]))
    }

    #[tool(
        description = "Get server status: version, whether GEMINI_API_KEY is configured, clipboard support, models and cache size"
    )]
    async fn server_info(&self) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(&self.status())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Ask Gemini any question. Input: prompt, else file_path, else the configured input environment variable (GEMINI_INPUT by default), else the clipboard. Set fast=true for the faster model."
    )]
    async fn gcask(&self, params: Parameters<AskRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    // ============================================================
    // Specification & Design
    // ============================================================

    #[tool(description = "Analyze requirements and specifications")]
    async fn gcspec(&self, params: Parameters<SpecRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Review system architecture")]
    async fn gcarch(&self, params: Parameters<ArchRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Design API interfaces. Requires type (REST, GraphQL, ...)")]
    async fn gcapi(&self, params: Parameters<ApiRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    // ============================================================
    // Code Analysis & Improvement
    // ============================================================

    #[tool(description = "Review code quality and best practices")]
    async fn gcreview(
        &self,
        params: Parameters<ReviewRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Suggest code improvements. Requires goal")]
    async fn gcrefactor(
        &self,
        params: Parameters<RefactorRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Analyze code performance")]
    async fn gcperf(&self, params: Parameters<PerfRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Security audit and vulnerability analysis")]
    async fn gcsecurity(
        &self,
        params: Parameters<SecurityRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Generate test strategies and cases")]
    async fn gctest(&self, params: Parameters<TestRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    // ============================================================
    // Debug & Understanding
    // ============================================================

    #[tool(description = "Debug errors and issues")]
    async fn gcdebug(
        &self,
        params: Parameters<DebugRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Explain code functionality")]
    async fn gcexplain(
        &self,
        params: Parameters<ExplainRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    // ============================================================
    // Utility Tools
    // ============================================================

    #[tool(description = "Analyze project dependencies")]
    async fn gcdeps(&self, params: Parameters<DepsRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Complete code with AI assistance. Requires request")]
    async fn gccomplete(
        &self,
        params: Parameters<CompleteRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }

    #[tool(description = "Generate documentation")]
    async fn gcdocs(&self, params: Parameters<DocsRequest>) -> Result<CallToolResult, McpError> {
        Ok(self.execute(params.0.into()).await)
    }
}

#[tool_handler]
impl ServerHandler for GeminiCodingServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: crate::SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Gemini Coding".into()),
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(assistant: Arc<Assistant>) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = GeminiCodingServer::new(assistant);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}

/// Serve MCP over streamable HTTP at `/mcp`.
pub async fn run_http_server(assistant: Arc<Assistant>, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    };
    use tower_http::trace::TraceLayer;

    let service = StreamableHttpService::new(
        move || Ok(GeminiCodingServer::new(assistant.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let app = axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("MCP server listening on http://127.0.0.1:{}/mcp", port);

    axum::serve(listener, app).await?;
    Ok(())
}
