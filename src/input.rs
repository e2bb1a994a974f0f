//! Input resolution for commands that accept free text.
//!
//! A request may carry direct text and a file path; the environment and the
//! clipboard are consulted only when neither is supplied. Sources are tried in
//! [`PRECEDENCE`] order and the first non-blank one wins.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Default variable read by the environment source.
pub const DEFAULT_INPUT_ENV_VAR: &str = "GEMINI_INPUT";

/// Default cap on file content, in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 100_000;

const CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(2);

/// Where the resolved text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Direct,
    File,
    Environment,
    Clipboard,
}

impl InputSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::File => "file",
            Self::Environment => "environment",
            Self::Clipboard => "clipboard",
        }
    }
}

/// Order in which sources are tried.
pub const PRECEDENCE: [InputSource; 4] = [
    InputSource::Direct,
    InputSource::File,
    InputSource::Environment,
    InputSource::Clipboard,
];

/// Text chosen for a request and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub text: String,
    pub source: InputSource,
}

/// The input-bearing parts of a request.
#[derive(Debug, Clone, Default)]
pub struct InputRequest {
    pub direct: Option<String>,
    pub file_path: Option<String>,
}

impl InputRequest {
    pub fn new(direct: Option<String>, file_path: Option<String>) -> Self {
        Self { direct, file_path }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no input provided")]
    NotProvided,

    #[error("file not found or unreadable: {path} ({reason})")]
    FileUnreadable { path: String, reason: String },
}

/// Read access to clipboard text.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Current clipboard text, or `None` when empty or unreadable.
    async fn read_text(&self) -> Option<String>;

    /// Human-readable status for diagnostics.
    fn describe(&self) -> String;
}

/// Clipboard that is always empty.
#[derive(Debug, Default, Clone)]
pub struct NoClipboard;

#[async_trait]
impl Clipboard for NoClipboard {
    async fn read_text(&self) -> Option<String> {
        None
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}

/// Clipboard with fixed contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard(pub String);

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn read_text(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Reads the desktop clipboard through the platform's paste utility.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: Option<(String, Vec<String>)>,
}

impl SystemClipboard {
    /// Locate the first usable paste tool on `PATH`.
    pub fn detect() -> Self {
        let program = paste_candidates()
            .into_iter()
            .find(|(bin, _)| which::which(bin).is_ok())
            .map(|(bin, args)| {
                (
                    bin.to_string(),
                    args.iter().map(|a| a.to_string()).collect(),
                )
            });
        if program.is_none() {
            tracing::debug!("no clipboard utility found on PATH");
        }
        Self { program }
    }
}

fn paste_candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![("pbpaste", vec![])]
    } else if cfg!(target_os = "windows") {
        vec![(
            "powershell",
            vec!["-NoProfile", "-NonInteractive", "-Command", "Get-Clipboard"],
        )]
    } else {
        let mut candidates = Vec::new();
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            candidates.push(("wl-paste", vec!["--no-newline"]));
        }
        candidates.push(("xclip", vec!["-selection", "clipboard", "-o"]));
        candidates.push(("xsel", vec!["--clipboard", "--output"]));
        candidates
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn read_text(&self) -> Option<String> {
        let (bin, args) = self.program.as_ref()?;
        let output = Command::new(bin).args(args).kill_on_drop(true).output();
        match tokio::time::timeout(CLIPBOARD_TIMEOUT, output).await {
            Ok(Ok(out)) if out.status.success() => String::from_utf8(out.stdout).ok(),
            Ok(Ok(out)) => {
                tracing::debug!("{} exited with {}", bin, out.status);
                None
            }
            Ok(Err(e)) => {
                tracing::debug!("failed to run {}: {}", bin, e);
                None
            }
            Err(_) => {
                tracing::debug!("{} timed out", bin);
                None
            }
        }
    }

    fn describe(&self) -> String {
        match &self.program {
            Some((bin, _)) => format!("enabled ({})", bin),
            None => "unavailable (no pbpaste, wl-paste, xclip or xsel found)".to_string(),
        }
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves the text a command operates on.
#[derive(Clone)]
pub struct InputResolver {
    env_var: String,
    max_bytes: usize,
    env: EnvLookup,
    clipboard: Arc<dyn Clipboard>,
}

impl std::fmt::Debug for InputResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputResolver")
            .field("env_var", &self.env_var)
            .field("max_bytes", &self.max_bytes)
            .field("clipboard", &self.clipboard.describe())
            .finish()
    }
}

impl InputResolver {
    /// Resolver reading the process environment and the given clipboard.
    pub fn new(env_var: impl Into<String>, max_bytes: usize, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            env_var: env_var.into(),
            max_bytes,
            env: Arc::new(|name: &str| std::env::var(name).ok()),
            clipboard,
        }
    }

    /// Replace the environment lookup, e.g. with a fixed map in tests.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn clipboard_status(&self) -> String {
        self.clipboard.describe()
    }

    /// Return the first non-blank input in [`PRECEDENCE`] order.
    ///
    /// A supplied file path that cannot be read is an error; it never falls
    /// through to the environment or the clipboard.
    pub async fn resolve(&self, request: &InputRequest) -> Result<ResolvedInput, InputError> {
        for source in PRECEDENCE {
            let text = match source {
                InputSource::Direct => non_blank(request.direct.as_deref()),
                InputSource::File => match non_blank(request.file_path.as_deref()) {
                    Some(path) => self.read_file(&path).await?,
                    None => None,
                },
                InputSource::Environment => non_blank((self.env)(&self.env_var).as_deref()),
                InputSource::Clipboard => non_blank(self.clipboard.read_text().await.as_deref()),
            };

            if let Some(text) = text {
                tracing::debug!(source = source.as_str(), bytes = text.len(), "resolved input");
                return Ok(ResolvedInput { text, source });
            }
        }

        Err(InputError::NotProvided)
    }

    async fn read_file(&self, path: &str) -> Result<Option<String>, InputError> {
        let unreadable = |reason: String| InputError::FileUnreadable {
            path: path.to_string(),
            reason,
        };

        let meta = tokio::fs::metadata(Path::new(path))
            .await
            .map_err(|e| unreadable(e.to_string()))?;
        if !meta.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| unreadable(e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(truncate(content, self.max_bytes)))
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn truncate(mut content: String, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content;
    }
    let mut cut = max_bytes;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    content.truncate(cut);
    content.push_str(&format!("\n\n[Content truncated at {} limit]", limit_label(max_bytes)));
    content
}

fn limit_label(max_bytes: usize) -> String {
    if max_bytes >= 1000 && max_bytes % 1000 == 0 {
        format!("{}KB", max_bytes / 1000)
    } else {
        format!("{} bytes", max_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn resolver(env: Option<&'static str>, clipboard: &str) -> InputResolver {
        InputResolver::new(
            DEFAULT_INPUT_ENV_VAR,
            DEFAULT_MAX_INPUT_BYTES,
            Arc::new(MemoryClipboard(clipboard.to_string())),
        )
        .with_env(move |_| env.map(str::to_string))
    }

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn direct_text_wins_over_everything() {
        let file = temp_file("from file");
        let r = resolver(Some("from env"), "from clipboard");
        let input = r
            .resolve(&InputRequest::new(
                Some("  direct  ".into()),
                Some(file.path().display().to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(input.text, "direct");
        assert_eq!(input.source, InputSource::Direct);
    }

    #[tokio::test]
    async fn whitespace_direct_text_falls_through_to_file() {
        let file = temp_file("fn main() {}\n");
        let r = resolver(Some("from env"), "from clipboard");
        let input = r
            .resolve(&InputRequest::new(
                Some(" \n\t ".into()),
                Some(file.path().display().to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(input.text, "fn main() {}\n");
        assert_eq!(input.source, InputSource::File);
    }

    #[tokio::test]
    async fn environment_beats_clipboard() {
        let r = resolver(Some("  from env "), "from clipboard");
        let input = r.resolve(&InputRequest::default()).await.unwrap();
        assert_eq!(input.text, "from env");
        assert_eq!(input.source, InputSource::Environment);
    }

    #[tokio::test]
    async fn clipboard_is_last_resort() {
        let r = resolver(Some("   "), "copied code");
        let input = r.resolve(&InputRequest::default()).await.unwrap();
        assert_eq!(input.text, "copied code");
        assert_eq!(input.source, InputSource::Clipboard);
    }

    #[tokio::test]
    async fn nothing_available_is_not_provided() {
        let r = resolver(None, "");
        let err = r.resolve(&InputRequest::default()).await.unwrap_err();
        assert_eq!(err, InputError::NotProvided);
    }

    #[tokio::test]
    async fn missing_file_does_not_fall_back() {
        let r = resolver(Some("from env"), "from clipboard");
        let err = r
            .resolve(&InputRequest::new(
                None,
                Some("/definitely/not/here.rs".into()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::FileUnreadable { ref path, .. } if path == "/definitely/not/here.rs"));
    }

    #[tokio::test]
    async fn directory_path_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(None, "");
        let err = r
            .resolve(&InputRequest::new(
                None,
                Some(dir.path().display().to_string()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::FileUnreadable { .. }));
    }

    #[tokio::test]
    async fn blank_file_path_counts_as_absent() {
        let r = resolver(Some("from env"), "");
        let input = r
            .resolve(&InputRequest::new(None, Some("   ".into())))
            .await
            .unwrap();
        assert_eq!(input.source, InputSource::Environment);
    }

    #[tokio::test]
    async fn blank_file_content_falls_through() {
        let file = temp_file("\n\n  \n");
        let r = resolver(None, "clip");
        let input = r
            .resolve(&InputRequest::new(
                None,
                Some(file.path().display().to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(input.source, InputSource::Clipboard);
    }

    #[tokio::test]
    async fn large_files_are_truncated() {
        let file = temp_file(&"a".repeat(50));
        let r = InputResolver::new(DEFAULT_INPUT_ENV_VAR, 10, Arc::new(NoClipboard))
            .with_env(|_| None);
        let input = r
            .resolve(&InputRequest::new(
                None,
                Some(file.path().display().to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(input.text, "aaaaaaaaaa\n\n[Content truncated at 10 bytes limit]");
    }

    #[test]
    fn truncation_notice_names_configured_limit() {
        let out = truncate("b".repeat(3000), 2000);
        assert!(out.ends_with("[Content truncated at 2KB limit]"));
        assert_eq!(limit_label(DEFAULT_MAX_INPUT_BYTES), "100KB");
        assert_eq!(limit_label(1500), "1500 bytes");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let out = truncate("héllo".to_string(), 2);
        assert!(out.starts_with('h'));
        assert!(out.ends_with("limit]"));
    }

    #[test]
    fn env_lookup_uses_configured_name() {
        let r = InputResolver::new("MY_INPUT", 10, Arc::new(NoClipboard))
            .with_env(|name| (name == "MY_INPUT").then(|| "yes".to_string()));
        assert_eq!(r.env_var(), "MY_INPUT");
        assert_eq!((r.env)("MY_INPUT"), Some("yes".to_string()));
        assert_eq!((r.env)("OTHER"), None);
    }
}
