//! Command execution: input resolution, prompt rendering, caching, generation.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, ResponseCache};
use crate::catalog::Command;
use crate::config::Config;
use crate::error::CommandError;
use crate::gemini::{GeminiClient, GenerationRequest, TextGenerator};
use crate::input::{
    Clipboard, InputError, InputRequest, InputResolver, NoClipboard, SystemClipboard,
};
use crate::prompts::{self, PromptOptions};

/// Highest temperature accepted from callers.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Which model a command runs on.
#[derive(Debug, Clone)]
pub struct Models {
    pub pro: String,
    pub fast: String,
}

/// One fully-specified command call.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: Command,
    pub input: InputRequest,
    pub options: PromptOptions,
    pub fast: bool,
    /// Overrides the command's default temperature.
    pub temperature: Option<f32>,
}

impl Invocation {
    pub fn new(command: Command, input: InputRequest) -> Self {
        Self {
            command,
            input,
            options: PromptOptions::default(),
            fast: false,
            temperature: None,
        }
    }

    pub fn with_options(mut self, options: PromptOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Shared state behind every MCP tool.
pub struct Assistant {
    resolver: InputResolver,
    cache: ResponseCache,
    generator: Arc<dyn TextGenerator>,
    models: Models,
    cache_ttl: Duration,
    max_output_tokens: u32,
}

impl Assistant {
    pub fn new(
        resolver: InputResolver,
        cache: ResponseCache,
        generator: Arc<dyn TextGenerator>,
        models: Models,
    ) -> Self {
        Self {
            resolver,
            cache,
            generator,
            models,
            cache_ttl: crate::cache::DEFAULT_TTL,
            max_output_tokens: 8192,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Build the production assistant: Gemini over HTTP, system clipboard.
    pub fn from_config(config: &Config) -> Self {
        let clipboard: Arc<dyn Clipboard> = if config.clipboard {
            Arc::new(SystemClipboard::detect())
        } else {
            Arc::new(NoClipboard)
        };
        let resolver =
            InputResolver::new(&config.input_env_var, config.max_input_bytes, clipboard);
        let cache = ResponseCache::new(config.cache.capacity, config.cache.temperature_cutoff);
        let generator = Arc::new(GeminiClient::new(&config.api_base, config.api_key.clone()));

        Self::new(
            resolver,
            cache,
            generator,
            Models {
                pro: config.pro_model.clone(),
                fast: config.fast_model.clone(),
            },
        )
        .with_cache_ttl(config.cache.ttl())
        .with_max_output_tokens(config.max_output_tokens)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn resolver(&self) -> &InputResolver {
        &self.resolver
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn generator_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Run a command end to end and return the model's text.
    pub async fn invoke(&self, invocation: Invocation) -> Result<String, CommandError> {
        let command = invocation.command;
        check_required(command, &invocation.options)?;

        let text = match self.resolver.resolve(&invocation.input).await {
            Ok(resolved) => resolved.text,
            Err(InputError::NotProvided) if command.input_optional() => String::new(),
            Err(InputError::NotProvided) => {
                return Err(CommandError::NoInputProvided {
                    subject: command.subject(),
                    param: command.input_param(),
                    env_var: self.resolver.env_var().to_string(),
                })
            }
            Err(InputError::FileUnreadable { path, reason }) => {
                return Err(CommandError::FileUnreadable { path, reason })
            }
        };

        let prompt = prompts::render(command, &text, &invocation.options);
        let model = if invocation.fast {
            &self.models.fast
        } else {
            &self.models.pro
        };
        let temperature = invocation
            .temperature
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, MAX_TEMPERATURE))
            .unwrap_or_else(|| command.default_temperature());

        self.generate(GenerationRequest {
            prompt,
            model: model.clone(),
            temperature,
            max_output_tokens: self.max_output_tokens,
        })
        .await
    }

    /// Call the generator, going through the cache when the temperature allows.
    pub async fn generate(&self, request: GenerationRequest) -> Result<String, CommandError> {
        let key = self.cache.is_eligible(request.temperature).then(|| {
            CacheKey::new(
                &request.prompt,
                &request.model,
                request.temperature,
                request.max_output_tokens,
            )
        });

        if let Some(ref key) = key {
            if let Some(hit) = self.cache.get(key) {
                tracing::debug!(key = %key, "cache hit");
                return Ok(hit);
            }
            tracing::debug!(key = %key, "cache miss");
        }

        let response = self.generator.generate(&request).await?;

        if let Some(key) = key {
            self.cache.insert(key, response.clone(), self.cache_ttl);
        }
        Ok(response)
    }
}

fn check_required(command: Command, options: &PromptOptions) -> Result<(), CommandError> {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

    match command {
        Command::Refactor if blank(&options.goal) => Err(CommandError::MissingArgument {
            name: "goal",
            hint: "provide a refactoring goal (readability, performance, maintainability, ...)",
        }),
        Command::Complete if blank(&options.request) => Err(CommandError::MissingArgument {
            name: "request",
            hint: "describe what you want completed",
        }),
        Command::Api if blank(&options.kind) => Err(CommandError::MissingArgument {
            name: "type",
            hint: "provide the API style (REST, GraphQL, gRPC, ...)",
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerateError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}|{}|{}", request.model, request.temperature, request.prompt))
        }
    }

    fn assistant() -> (Assistant, Arc<Echo>) {
        let echo = Arc::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let resolver = InputResolver::new("GEMINI_INPUT", 1000, Arc::new(NoClipboard))
            .with_env(|_| None);
        let assistant = Assistant::new(
            resolver,
            ResponseCache::default(),
            echo.clone(),
            Models {
                pro: "pro".into(),
                fast: "flash".into(),
            },
        );
        (assistant, echo)
    }

    fn direct(text: &str) -> InputRequest {
        InputRequest::new(Some(text.into()), None)
    }

    #[tokio::test]
    async fn fast_selects_fast_model() {
        let (assistant, _) = assistant();
        let out = assistant
            .invoke(Invocation::new(Command::Ask, direct("hi")).fast(true))
            .await
            .unwrap();
        assert!(out.starts_with("flash|"));
    }

    #[tokio::test]
    async fn temperature_override_is_clamped() {
        let (assistant, _) = assistant();
        let out = assistant
            .invoke(Invocation::new(Command::Ask, direct("hi")).temperature(Some(9.0)))
            .await
            .unwrap();
        assert!(out.starts_with("pro|2|"));
    }

    #[tokio::test]
    async fn nan_temperature_uses_default() {
        let (assistant, _) = assistant();
        let out = assistant
            .invoke(Invocation::new(Command::Ask, direct("hi")).temperature(Some(f32::NAN)))
            .await
            .unwrap();
        assert!(out.starts_with("pro|0.5|"));
    }

    #[tokio::test]
    async fn missing_goal_is_rejected_before_generation() {
        let (assistant, echo) = assistant();
        let err = assistant
            .invoke(Invocation::new(Command::Refactor, direct("fn f() {}")))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { name: "goal", .. }));
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn complete_runs_without_input() {
        let (assistant, _) = assistant();
        let out = assistant
            .invoke(
                Invocation::new(Command::Complete, InputRequest::default()).with_options(
                    PromptOptions {
                        request: Some("write a parser".into()),
                        ..Default::default()
                    },
                ),
            )
            .await
            .unwrap();
        assert!(out.contains("Request: write a parser"));
    }

    #[tokio::test]
    async fn no_input_names_the_command_param() {
        let (assistant, _) = assistant();
        let err = assistant
            .invoke(Invocation::new(Command::Review, InputRequest::default()))
            .await
            .unwrap_err();
        match err {
            CommandError::NoInputProvided { subject, param, env_var } => {
                assert_eq!(subject, "code");
                assert_eq!(param, "code");
                assert_eq!(env_var, "GEMINI_INPUT");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
