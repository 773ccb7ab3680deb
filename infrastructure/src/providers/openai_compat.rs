//! OpenAI-compatible chat completions adapter.
//!
//! Perplexity and Groq both speak the OpenAI wire format:
//!
//! - `POST {base_url}/chat/completions` with a Bearer token
//! - `GET {base_url}/models` (Groq only; Perplexity has no listing endpoint)

use super::{ProviderAdapter, ProviderError};
use answer_quorum_application::ports::provider_gateway::{GatewayError, ProviderRequest};
use answer_quorum_domain::Provider;
use answer_quorum_domain::core::string::clip_chars;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Perplexity models known to accept chat completions
pub const PERPLEXITY_MODELS: &[&str] = &["sonar-pro", "sonar", "sonar-reasoning-pro", "sonar-reasoning"];

/// Groq models tried when the listing endpoint is unavailable
pub const GROQ_FALLBACK_MODELS: &[&str] = &[
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "reasoning-gpt-oss-120b",
    "llama-2-70b-4096",
    "gemma-7b-it",
    "mixtral-8x7b-32768",
];

/// Characters of an error body kept in a gateway error
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upper bound for `GET /models` unless configured
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(20);

/// Keys shorter than this are almost certainly truncated
const MIN_PLAUSIBLE_KEY_CHARS: usize = 10;

/// Where the candidate model list comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCatalog {
    /// A fixed list
    Fixed(Vec<String>),
    /// `GET /models`, falling back to the given list on failure
    Listed { fallback: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub catalog: ModelCatalog,
    /// A listing slower than this falls back to the catalog's list
    pub list_timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn perplexity(api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::Perplexity,
            api_key: api_key.into(),
            base_url: PERPLEXITY_BASE_URL.to_string(),
            catalog: ModelCatalog::Fixed(to_strings(PERPLEXITY_MODELS)),
            list_timeout: DEFAULT_LIST_TIMEOUT,
        }
    }

    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::Groq,
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
            catalog: ModelCatalog::Listed {
                fallback: to_strings(GROQ_FALLBACK_MODELS),
            },
            list_timeout: DEFAULT_LIST_TIMEOUT,
        }
    }

    /// Build the config for `provider` from its `*_API_KEY` environment variable
    pub fn from_env(provider: Provider) -> Result<Self, ProviderError> {
        Self::from_env_var(provider, &api_key_env(provider))
    }

    /// Build the config for `provider` reading the key from `env`
    pub fn from_env_var(provider: Provider, env: &str) -> Result<Self, ProviderError> {
        let key = std::env::var(env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider,
                env: env.to_string(),
            })?;
        if key.chars().count() < MIN_PLAUSIBLE_KEY_CHARS {
            warn!("{} looks too short to be a valid API key", env);
        }
        Ok(Self::for_provider(provider, key))
    }

    pub fn for_provider(provider: Provider, api_key: impl Into<String>) -> Self {
        match provider {
            Provider::Perplexity => Self::perplexity(api_key),
            Provider::Groq => Self::groq(api_key),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    /// Replace the catalog with a fixed list (ignored when empty)
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.catalog = ModelCatalog::Fixed(models);
        }
        self
    }
}

/// Environment variable holding the API key for `provider`
pub fn api_key_env(provider: Provider) -> String {
    format!("{}_API_KEY", provider.tag())
}

fn to_strings(models: &[&str]) -> Vec<String> {
    models.iter().map(|m| m.to_string()).collect()
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

// ==================== Adapter ====================

pub struct OpenAiCompatAdapter {
    config: OpenAiCompatConfig,
    client: Client,
}

impl OpenAiCompatAdapter {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey {
                provider: config.provider,
                env: api_key_env(config.provider),
            });
        }
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key)
    }

    async fn fetch_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("Authorization", self.bearer())
            .timeout(self.config.list_timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let list: ModelList = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn provider(&self) -> Provider {
        self.config.provider
    }

    async fn complete(
        &self,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<String, GatewayError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_instruction {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_content,
        });

        let body = ChatRequest {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        debug!("Sending chat request to {}:{}", self.config.provider, model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", self.bearer())
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(GatewayError::EmptyResponse)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        match &self.config.catalog {
            ModelCatalog::Fixed(models) => Ok(models.clone()),
            ModelCatalog::Listed { fallback } => match self.fetch_models().await {
                Ok(models) if !models.is_empty() => Ok(models),
                Ok(_) => {
                    warn!("{} listed no models, using fallback list", self.config.provider);
                    Ok(fallback.clone())
                }
                Err(e) => {
                    warn!(
                        "Could not fetch {} models ({}), using fallback list",
                        self.config.provider, e
                    );
                    Ok(fallback.clone())
                }
            },
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = format!("HTTP {}: {}", status.as_u16(), clip_chars(body.trim(), MAX_ERROR_BODY_CHARS));
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(detail),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(detail),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(detail),
        _ => GatewayError::RequestFailed(detail),
    })
}
