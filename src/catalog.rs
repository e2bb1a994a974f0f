//! The fixed command catalog and the help text rendered from it.

/// A generation command exposed as an MCP tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Ask,
    Spec,
    Arch,
    Api,
    Review,
    Refactor,
    Perf,
    Security,
    Test,
    Debug,
    Explain,
    Deps,
    Complete,
    Docs,
}

/// Help grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Basic,
    Spec,
    Code,
    Debug,
    Utility,
}

impl Category {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Basic => "🚀 **BASIC COMMANDS**",
            Self::Spec => "📋 **SPECIFICATION & DESIGN**",
            Self::Code => "💻 **CODE ANALYSIS & IMPROVEMENT**",
            Self::Debug => "🔍 **DEBUG & UNDERSTANDING**",
            Self::Utility => "🛠️ **UTILITY TOOLS**",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "spec" => Some(Self::Spec),
            "code" => Some(Self::Code),
            "debug" => Some(Self::Debug),
            "utility" => Some(Self::Utility),
            _ => None,
        }
    }
}

const CATEGORIES: [Category; 5] = [
    Category::Basic,
    Category::Spec,
    Category::Code,
    Category::Debug,
    Category::Utility,
];

impl Command {
    pub const ALL: [Command; 14] = [
        Command::Ask,
        Command::Spec,
        Command::Arch,
        Command::Api,
        Command::Review,
        Command::Refactor,
        Command::Perf,
        Command::Security,
        Command::Test,
        Command::Debug,
        Command::Explain,
        Command::Deps,
        Command::Complete,
        Command::Docs,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Ask => "gcask",
            Self::Spec => "gcspec",
            Self::Arch => "gcarch",
            Self::Api => "gcapi",
            Self::Review => "gcreview",
            Self::Refactor => "gcrefactor",
            Self::Perf => "gcperf",
            Self::Security => "gcsecurity",
            Self::Test => "gctest",
            Self::Debug => "gcdebug",
            Self::Explain => "gcexplain",
            Self::Deps => "gcdeps",
            Self::Complete => "gccomplete",
            Self::Docs => "gcdocs",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tool_name() == name)
    }

    /// Sampling temperature used unless the request overrides it.
    pub fn default_temperature(&self) -> f32 {
        match self {
            Self::Ask => 0.5,
            Self::Security => 0.1,
            Self::Arch | Self::Test | Self::Explain | Self::Docs => 0.3,
            Self::Spec
            | Self::Api
            | Self::Review
            | Self::Refactor
            | Self::Perf
            | Self::Debug
            | Self::Deps
            | Self::Complete => 0.2,
        }
    }

    /// Name of the request field carrying direct text.
    pub fn input_param(&self) -> &'static str {
        match self {
            Self::Ask => "prompt",
            Self::Spec => "specification",
            Self::Arch => "architecture",
            Self::Api => "requirements",
            Self::Debug => "error",
            Self::Deps => "dependencies",
            Self::Complete => "context",
            Self::Review
            | Self::Refactor
            | Self::Perf
            | Self::Security
            | Self::Test
            | Self::Explain
            | Self::Docs => "code",
        }
    }

    /// What the input is called in "no input" messages.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Ask => "input",
            Self::Spec => "specification",
            Self::Arch => "architecture description",
            Self::Api => "API requirements",
            Self::Debug => "error message",
            Self::Deps => "dependencies",
            Self::Complete => "code context",
            _ => "code",
        }
    }

    /// Whether the command may run with no resolved input at all.
    pub fn input_optional(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Ask => Category::Basic,
            Self::Spec | Self::Arch | Self::Api => Category::Spec,
            Self::Review | Self::Refactor | Self::Perf | Self::Security | Self::Test => {
                Category::Code
            }
            Self::Debug | Self::Explain => Category::Debug,
            Self::Deps | Self::Complete | Self::Docs => Category::Utility,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Ask => "Ask Gemini any question",
            Self::Spec => "Analyze requirements and specifications",
            Self::Arch => "Review system architecture",
            Self::Api => "Design API interfaces",
            Self::Review => "Review code quality",
            Self::Refactor => "Suggest code improvements",
            Self::Perf => "Analyze code performance",
            Self::Security => "Security audit",
            Self::Test => "Generate test strategies",
            Self::Debug => "Debug errors and issues",
            Self::Explain => "Explain code functionality",
            Self::Deps => "Analyze project dependencies",
            Self::Complete => "Complete code with AI",
            Self::Docs => "Generate documentation",
        }
    }

    /// Example invocations shown in help.
    fn examples(&self) -> &'static [&'static str] {
        match self {
            Self::Ask => &[
                r#"Example: gcask prompt="How to optimize Python loops?""#,
                r#"IDE Usage: Select text in editor → copy → gcask prompt="Explain this code""#,
            ],
            Self::Spec => &[
                r#"Example: gcspec specification="User auth with JWT" type="api""#,
                r#"IDE Usage: gcspec file_path="requirements.md""#,
            ],
            Self::Arch => &[
                r#"Example: gcarch architecture="Microservices with Docker""#,
                r#"IDE Usage: Copy architecture diagram → gcarch focus="scalability""#,
            ],
            Self::Api => &[r#"Example: gcapi type="REST" requirements="User CRUD operations""#],
            Self::Review => &[
                r#"Example: gcreview file_path="src/auth.py" focus="security""#,
                r#"IDE Usage: Select code → copy → gcreview focus="performance""#,
            ],
            Self::Refactor => &[
                r#"Example: gcrefactor goal="readability" file_path="legacy.py""#,
                r#"IDE Usage: Select function → copy → gcrefactor goal="performance""#,
            ],
            Self::Perf => &[
                r#"Example: gcperf file_path="slow_function.py""#,
                r#"IDE Usage: Copy slow code → gcperf context="database""#,
            ],
            Self::Security => &[
                r#"Example: gcsecurity file_path="login.py" level="enterprise""#,
                r#"IDE Usage: Select auth code → copy → gcsecurity level="critical""#,
            ],
            Self::Test => &[
                r#"Example: gctest file_path="utils.py" type="unit""#,
                r#"IDE Usage: Copy function → gctest type="integration""#,
            ],
            Self::Debug => &[
                r#"Example: gcdebug error="TypeError: 'str' not callable""#,
                "IDE Usage: Copy error from terminal → gcdebug",
            ],
            Self::Explain => &[
                r#"Example: gcexplain file_path="complex.py" level="beginner""#,
                r#"IDE Usage: Select complex code → copy → gcexplain level="advanced""#,
            ],
            Self::Deps => &[r#"Example: gcdeps file_path="package.json" focus="security""#],
            Self::Complete => &[
                r#"Example: gccomplete context="class User:" request="add login method""#,
                r#"IDE Usage: Select partial code → copy → gccomplete request="finish this""#,
            ],
            Self::Docs => &[
                r#"Example: gcdocs file_path="api.py" type="readme""#,
                r#"IDE Usage: Select functions → copy → gcdocs type="api""#,
            ],
        }
    }
}

fn render_category(category: Category) -> String {
    let mut out = format!("{}\n", category.heading());
    if category == Category::Basic {
        out.push_str(
            "• `gchelp` - Show this help (add category: basic, spec, code, debug, utility, ide)\n",
        );
    }
    for command in Command::ALL.iter().filter(|c| c.category() == category) {
        out.push_str(&format!("• `{}` - {}\n", command.tool_name(), command.summary()));
        for example in command.examples() {
            out.push_str(&format!("  {}\n", example));
        }
    }
    out
}

fn render_ide_tips(env_var: &str) -> String {
    format!(
        "💡 **IDE WORKFLOW TIPS**
• All commands support multiple input methods, tried in this order:
  1. Direct text: gcask prompt=\"your question\"
  2. File path: gcreview file_path=\"/path/to/file.py\"
  3. Environment variable: {env_var}=\"text\" gcask
  4. Clipboard: Copy text in IDE → run command without text param

• Common IDE workflows:
  - Select code → Copy → gcreview (auto-uses clipboard)
  - Copy error message → gcdebug (auto-uses clipboard)
  - gcexplain file_path=\"complex_file.py\" (reads entire file)
  - Add fast=true to any command for the faster model

• Commands are prefixed with 'gc' to avoid conflicts with other tools
"
    )
}

/// Help text for a category name; unknown names render everything.
pub fn help_text(category: &str, env_var: &str) -> String {
    let normalized = category.trim().to_lowercase();
    let body = if normalized == "ide" {
        render_ide_tips(env_var)
    } else if let Some(c) = Category::from_str(&normalized) {
        render_category(c)
    } else {
        let mut all: Vec<String> = CATEGORIES.iter().map(|c| render_category(*c)).collect();
        all.push(render_ide_tips(env_var));
        all.join("\n")
    };

    format!(
        "# 🤖 Gemini Coding MCP Server v{}\n\n{}\n🔗 **Quick Examples:**\n\
         - `gcask prompt=\"Best Python frameworks\"`\n\
         - `gcreview focus=\"security\"` (uses clipboard)\n\
         - `gcdebug` (uses clipboard for error)\n\
         - `gchelp category=ide` (IDE workflow tips)\n",
        env!("CARGO_PKG_VERSION"),
        body
    )
}
