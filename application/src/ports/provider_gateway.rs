//! Provider gateway port
//!
//! Defines the interface for sending one prompt to one model of a provider.

use answer_quorum_domain::{ModelIdentity, Provider};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during provider gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(Provider),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,
}

/// One chat-style request to a model
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system_instruction: Option<String>,
    pub user_content: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Per-call timeout, enforced by both the adapter and the caller
    pub timeout: Duration,
}

impl ProviderRequest {
    pub fn new(user_content: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            user_content: user_content.into(),
            temperature: 0.2,
            max_output_tokens: 100,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gateway to the LLM providers
///
/// This port defines how the application layer talks to providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Send one request to one model and return the reply text
    async fn submit(
        &self,
        identity: &ModelIdentity,
        request: &ProviderRequest,
    ) -> Result<String, GatewayError>;

    /// Models worth probing for a provider, in preference order
    async fn candidate_models(&self, provider: Provider) -> Result<Vec<String>, GatewayError>;

    /// Providers this gateway can reach
    fn providers(&self) -> Vec<Provider>;
}
