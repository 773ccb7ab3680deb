//! Provider configuration from TOML (`[providers]` section)
//!
//! ```toml
//! [providers.perplexity]
//! api_key_env = "PERPLEXITY_API_KEY"
//!
//! [providers.groq]
//! base_url = "https://api.groq.com/openai/v1"
//! models = []   # empty: GET /models, then the fallback list
//! ```

use crate::providers::{OpenAiCompatConfig, ProviderError, api_key_env};
use answer_quorum_domain::Provider;
use serde::{Deserialize, Serialize};

/// Settings for one OpenAI-compatible provider.
///
/// Unset fields fall back to the provider's built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Set to `false` to skip this provider even when its key is present
    pub enabled: bool,
    /// Environment variable name for the API key
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    /// Candidate models. Empty means the built-in list (or `GET /models`).
    pub models: Vec<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: None,
            base_url: None,
            models: Vec::new(),
        }
    }
}

impl FileProviderConfig {
    pub fn key_env(&self, provider: Provider) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| api_key_env(provider))
    }

    /// Resolve into an adapter config, reading the key from the environment
    pub fn to_adapter_config(
        &self,
        provider: Provider,
    ) -> Result<OpenAiCompatConfig, ProviderError> {
        let mut config = OpenAiCompatConfig::from_env_var(provider, &self.key_env(provider))?
            .with_models(self.models.clone());
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub perplexity: FileProviderConfig,
    pub groq: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, provider: Provider) -> &FileProviderConfig {
        match provider {
            Provider::Perplexity => &self.perplexity,
            Provider::Groq => &self.groq,
        }
    }
}
