//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assistant::Invocation;
use crate::catalog::Command;
use crate::input::InputRequest;
use crate::prompts::PromptOptions;

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HelpRequest {
    #[schemars(
        description = "Category to show help for (basic, spec, code, debug, utility, ide, all)"
    )]
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AskRequest {
    #[schemars(description = "Your question (or leave empty to use file_path/env/clipboard)")]
    pub prompt: Option<String>,
    #[schemars(description = "Path to file to read as input")]
    pub file_path: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
    #[schemars(
        description = "Sampling temperature (0.0-2.0). Defaults to 0.5; values of 0.3 or lower are cached for 5 minutes"
    )]
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SpecRequest {
    #[schemars(description = "The specification to analyze (or use file_path/clipboard)")]
    pub specification: Option<String>,
    #[schemars(description = "Path to specification file")]
    pub file_path: Option<String>,
    #[schemars(description = "Type (api, feature, system). Defaults to general")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ArchRequest {
    #[schemars(description = "Architecture description (or use file_path/clipboard)")]
    pub architecture: Option<String>,
    #[schemars(description = "Path to architecture file")]
    pub file_path: Option<String>,
    #[schemars(description = "Focus area (scalability, security, performance)")]
    pub focus: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ApiRequest {
    #[schemars(description = "API type (REST, GraphQL, etc.)")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schemars(description = "API requirements (or use file_path/clipboard)")]
    pub requirements: Option<String>,
    #[schemars(description = "Path to requirements file")]
    pub file_path: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ReviewRequest {
    #[schemars(description = "Code to review (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Focus (security, performance, style)")]
    pub focus: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RefactorRequest {
    #[schemars(description = "Code to refactor (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Goal (readability, performance, maintainability). Required")]
    pub goal: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PerfRequest {
    #[schemars(description = "Code to analyze (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Performance context (e.g. database, web, embedded)")]
    pub context: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SecurityRequest {
    #[schemars(description = "Code to audit (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Security level (basic, enterprise, critical)")]
    pub level: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TestRequest {
    #[schemars(description = "Code to test (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Test type (unit, integration, e2e)")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DebugRequest {
    #[schemars(description = "Error message or stack trace (or use file_path/clipboard)")]
    pub error: Option<String>,
    #[schemars(description = "Path to a log or trace file")]
    pub file_path: Option<String>,
    #[schemars(description = "Code context")]
    pub context: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ExplainRequest {
    #[schemars(description = "Code to explain (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Level (beginner, intermediate, advanced)")]
    pub level: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DepsRequest {
    #[schemars(description = "Dependencies list (or use file_path/clipboard)")]
    pub dependencies: Option<String>,
    #[schemars(description = "Path to Cargo.toml, package.json, requirements.txt, etc.")]
    pub file_path: Option<String>,
    #[schemars(description = "Focus (security, performance, size)")]
    pub focus: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CompleteRequest {
    #[schemars(description = "Existing code context (or use file_path/clipboard)")]
    pub context: Option<String>,
    #[schemars(description = "Path to context file")]
    pub file_path: Option<String>,
    #[schemars(description = "What to complete. Required")]
    pub request: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DocsRequest {
    #[schemars(description = "Code to document (or use file_path/clipboard)")]
    pub code: Option<String>,
    #[schemars(description = "Path to code file")]
    pub file_path: Option<String>,
    #[schemars(description = "Doc type (api, readme, inline, comprehensive)")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schemars(description = "Use the faster model")]
    #[serde(default)]
    pub fast: bool,
}

// ============================================================
// Request -> Invocation
// ============================================================

impl From<AskRequest> for Invocation {
    fn from(r: AskRequest) -> Self {
        Invocation::new(Command::Ask, InputRequest::new(r.prompt, r.file_path))
            .fast(r.fast)
            .temperature(r.temperature)
    }
}

impl From<SpecRequest> for Invocation {
    fn from(r: SpecRequest) -> Self {
        Invocation::new(Command::Spec, InputRequest::new(r.specification, r.file_path))
            .with_options(PromptOptions {
                kind: r.kind,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<ArchRequest> for Invocation {
    fn from(r: ArchRequest) -> Self {
        Invocation::new(Command::Arch, InputRequest::new(r.architecture, r.file_path))
            .with_options(PromptOptions {
                focus: r.focus,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<ApiRequest> for Invocation {
    fn from(r: ApiRequest) -> Self {
        Invocation::new(Command::Api, InputRequest::new(r.requirements, r.file_path))
            .with_options(PromptOptions {
                kind: r.kind,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<ReviewRequest> for Invocation {
    fn from(r: ReviewRequest) -> Self {
        Invocation::new(Command::Review, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                focus: r.focus,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<RefactorRequest> for Invocation {
    fn from(r: RefactorRequest) -> Self {
        Invocation::new(Command::Refactor, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                goal: r.goal,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<PerfRequest> for Invocation {
    fn from(r: PerfRequest) -> Self {
        Invocation::new(Command::Perf, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                context: r.context,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<SecurityRequest> for Invocation {
    fn from(r: SecurityRequest) -> Self {
        Invocation::new(Command::Security, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                level: r.level,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<TestRequest> for Invocation {
    fn from(r: TestRequest) -> Self {
        Invocation::new(Command::Test, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                kind: r.kind,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<DebugRequest> for Invocation {
    fn from(r: DebugRequest) -> Self {
        Invocation::new(Command::Debug, InputRequest::new(r.error, r.file_path))
            .with_options(PromptOptions {
                context: r.context,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<ExplainRequest> for Invocation {
    fn from(r: ExplainRequest) -> Self {
        Invocation::new(Command::Explain, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                level: r.level,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<DepsRequest> for Invocation {
    fn from(r: DepsRequest) -> Self {
        Invocation::new(Command::Deps, InputRequest::new(r.dependencies, r.file_path))
            .with_options(PromptOptions {
                focus: r.focus,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<CompleteRequest> for Invocation {
    fn from(r: CompleteRequest) -> Self {
        Invocation::new(Command::Complete, InputRequest::new(r.context, r.file_path))
            .with_options(PromptOptions {
                request: r.request,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

impl From<DocsRequest> for Invocation {
    fn from(r: DocsRequest) -> Self {
        Invocation::new(Command::Docs, InputRequest::new(r.code, r.file_path))
            .with_options(PromptOptions {
                kind: r.kind,
                ..Default::default()
            })
            .fast(r.fast)
    }
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    /// Whether GEMINI_API_KEY is set
    pub api_key_configured: bool,
    pub clipboard: String,
    pub input_env_var: String,
    pub pro_model: String,
    pub fast_model: String,
    pub cache_entries: usize,
    pub cache_temperature_cutoff: f32,
    pub tool_count: usize,
}
