//! Prompt templates for each command.

use crate::catalog::Command;

/// Free-form modifiers a command may carry.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub focus: Option<String>,
    pub level: Option<String>,
    pub kind: Option<String>,
    pub goal: Option<String>,
    pub context: Option<String>,
    pub request: Option<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fenced(code: &str) -> String {
    format!("```\n{}\n```", code)
}

/// Render the full prompt sent to the model.
pub fn render(command: Command, input: &str, options: &PromptOptions) -> String {
    match command {
        Command::Ask => input.to_string(),
        Command::Spec => {
            let kind = or_default(&options.kind, "general");
            format!(
                "As a requirements analyst, analyze this {kind} specification:\n\n{input}\n\nProvide analysis covering:\n{}",
                numbered(&[
                    "Completeness - what's missing or unclear?",
                    "Consistency - any contradictions?",
                    "Testability - can requirements be verified?",
                    "Feasibility - technical considerations",
                    "Clarity - areas needing clarification",
                    "Recommendations for improvement",
                ])
            )
        }
        Command::Arch => {
            let focus = or_default(&options.focus, "general");
            format!(
                "As a software architect, analyze this architecture with focus on {focus}:\n\n{input}\n\nProvide analysis covering:\n{}",
                numbered(&[
                    "Strengths and weaknesses",
                    "Scalability considerations",
                    "Performance implications",
                    "Security architecture",
                    "Maintainability concerns",
                    "Improvement recommendations",
                    "Alternative patterns to consider",
                ])
            )
        }
        Command::Api => {
            let kind = or_default(&options.kind, "");
            format!(
                "As an API design expert, design a {kind} API:\n\nRequirements: {input}\n\nProvide:\n{}",
                numbered(&[
                    "API structure and endpoints",
                    "Data models and schemas",
                    "Authentication approach",
                    "Error handling strategy",
                    "Example requests/responses",
                    "Best practices implementation",
                ])
            )
        }
        Command::Review => {
            let focus = or_default(&options.focus, "general");
            format!(
                "As an expert code reviewer, analyze this code with focus on {focus}:\n\n{}\n\nProvide structured feedback:\n{}",
                fenced(input),
                numbered(&[
                    "Code quality and potential bugs",
                    "Security vulnerabilities",
                    "Performance opportunities",
                    "Best practices adherence",
                    "Maintainability improvements",
                    "Specific recommendations with examples",
                ])
            )
        }
        Command::Refactor => {
            let goal = or_default(&options.goal, "maintainability");
            format!(
                "As a refactoring expert, improve this code for {goal}:\n\n{}\n\nProvide:\n{}",
                fenced(input),
                numbered(&[
                    "Specific refactoring recommendations",
                    "Before/after code examples",
                    "Explanation of improvements",
                    &format!("Impact on {goal}"),
                    "Step-by-step approach",
                    "Testing considerations",
                ])
            )
        }
        Command::Perf => {
            let context = or_default(&options.context, "general");
            format!(
                "As a performance expert, analyze this code for {context} performance:\n\n{}\n\nProvide analysis:\n{}",
                fenced(input),
                numbered(&[
                    "Performance bottlenecks",
                    "Time/space complexity",
                    "Optimization recommendations",
                    "Optimized code examples",
                    "Profiling strategies",
                    "Scalability considerations",
                ])
            )
        }
        Command::Security => {
            let level = or_default(&options.level, "basic");
            format!(
                "As a security expert, audit this code for {level}-level security:\n\n{}\n\nProvide security analysis:\n{}",
                fenced(input),
                numbered(&[
                    "Vulnerability identification",
                    "Input validation issues",
                    "Authentication/authorization flaws",
                    "Data exposure risks",
                    "Injection attack vectors",
                    "Remediation recommendations",
                    "Security testing strategies",
                ])
            )
        }
        Command::Test => {
            let kind = or_default(&options.kind, "unit");
            format!(
                "As a testing expert, create {kind} testing strategy:\n\n{}\n\nProvide:\n{}",
                fenced(input),
                numbered(&[
                    "Test plan and strategy",
                    "Specific test cases",
                    "Edge cases and boundaries",
                    "Mock/stub strategies",
                    "Test data requirements",
                    "Framework recommendations",
                    "Coverage expectations",
                ])
            )
        }
        Command::Debug => {
            let context = or_default(&options.context, "");
            format!(
                "As a debugging expert, help solve this error:\n\nError: {input}\nContext: {context}\n\nProvide:\n{}",
                numbered(&[
                    "Root cause analysis",
                    "Step-by-step debugging approach",
                    "Specific solutions with examples",
                    "Prevention strategies",
                    "Debugging tools to use",
                    "Common variations of this error",
                ])
            )
        }
        Command::Explain => {
            let level = or_default(&options.level, "intermediate");
            format!(
                "As a code mentor, explain this code at {level} level:\n\n{}\n\nProvide explanation:\n{}",
                fenced(input),
                numbered(&[
                    "High-level purpose and functionality",
                    "Step-by-step logic breakdown",
                    "Key concepts and patterns",
                    "Data and control flow",
                    "Important design decisions",
                    "Potential gotchas",
                    "Related concepts to learn",
                ])
            )
        }
        Command::Deps => {
            let focus = or_default(&options.focus, "general");
            format!(
                "As a dependency expert, analyze these dependencies for {focus}:\n\n{input}\n\nProvide analysis:\n{}",
                numbered(&[
                    "Security vulnerability assessment",
                    "Maintenance and community health",
                    "Performance impact",
                    "Size and bundle analysis",
                    "Alternative recommendations",
                    "Version compatibility",
                    "License compliance",
                    "Upgrade suggestions",
                ])
            )
        }
        Command::Complete => {
            let request = or_default(&options.request, "");
            format!(
                "As a code completion expert, complete this code:\n\nContext:\n{}\n\nRequest: {request}\n\nProvide:\n{}",
                fenced(input),
                numbered(&[
                    "Complete implementation",
                    "Explanation of approach",
                    "Alternative options",
                    "Best practices incorporated",
                    "Error handling",
                    "Testing suggestions",
                ])
            )
        }
        Command::Docs => {
            let kind = or_default(&options.kind, "comprehensive");
            format!(
                "As a documentation expert, create {kind} documentation:\n\n{}\n\nGenerate documentation:\n{}",
                fenced(input),
                numbered(&[
                    "Clear overview and purpose",
                    "Installation/setup instructions",
                    "Usage examples",
                    "API reference",
                    "Configuration options",
                    "Common use cases",
                    "Troubleshooting guide",
                ])
            )
        }
    }
}
