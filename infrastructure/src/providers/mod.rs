//! Provider adapters
//!
//! One [`ProviderAdapter`] per LLM provider; [`RoutingGateway`] dispatches
//! each model identity to the adapter for its provider.

pub mod openai_compat;
pub mod routing;

pub use openai_compat::{ModelCatalog, OpenAiCompatAdapter, OpenAiCompatConfig, api_key_env};
pub use routing::RoutingGateway;

use answer_quorum_application::ports::provider_gateway::{GatewayError, ProviderRequest};
use answer_quorum_domain::Provider;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while building provider adapters
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} API key not found (set {env})")]
    MissingApiKey { provider: Provider, env: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Send one chat request to `model` and return the reply text
    async fn complete(&self, model: &str, request: &ProviderRequest)
    -> Result<String, GatewayError>;

    /// Models worth probing, in preference order
    async fn list_models(&self) -> Result<Vec<String>, GatewayError>;
}
