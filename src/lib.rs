//! Gemini-backed coding assistant commands exposed over MCP.
//!
//! # Core Concepts
//!
//! - [`input::InputResolver`]: picks one input source per request, in a fixed
//!   precedence (direct text, file, environment variable, clipboard).
//! - [`cache::ResponseCache`]: short-lived store for low-temperature responses.
//! - [`assistant::Assistant`]: resolves input, renders the prompt, consults the
//!   cache and calls the [`gemini::TextGenerator`] on a miss.
//! - [`mcp::GeminiCodingServer`]: the MCP tool surface over the assistant.

pub mod assistant;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gemini;
pub mod input;
pub mod mcp;
pub mod prompts;

/// Name reported to MCP clients.
pub const SERVER_NAME: &str = "gemini-coding";
