//! Errors reported back to the MCP caller.

use thiserror::Error;

use crate::gemini::GenerateError;

/// Failure of a single command invocation.
///
/// None of these are fatal to the server. The MCP layer turns each one into a
/// tool result flagged `isError` with the `Display` text as its message.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(
        "No {subject} provided. Use the {param} parameter, file_path, the {env_var} environment variable, or the clipboard."
    )]
    NoInputProvided {
        subject: &'static str,
        param: &'static str,
        env_var: String,
    },

    #[error("File not found or unreadable: {path} ({reason})")]
    FileUnreadable { path: String, reason: String },

    #[error("Missing required argument '{name}': {hint}")]
    MissingArgument {
        name: &'static str,
        hint: &'static str,
    },

    #[error("Gemini unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gemini error: {0}")]
    ServiceError(String),
}

impl CommandError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoInputProvided { .. } => "no_input_provided",
            Self::FileUnreadable { .. } => "file_unreadable",
            Self::MissingArgument { .. } => "missing_argument",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::ServiceError(_) => "service_error",
        }
    }
}

impl From<GenerateError> for CommandError {
    fn from(e: GenerateError) -> Self {
        if e.is_unavailable() {
            Self::ServiceUnavailable(e.to_string())
        } else {
            Self::ServiceError(e.to_string())
        }
    }
}
