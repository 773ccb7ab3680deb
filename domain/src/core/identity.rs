//! Provider and model identity value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// An LLM API backend that models are queried through (Value Object)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Perplexity (search-grounded `sonar` family). The default primary provider.
    #[default]
    Perplexity,
    /// Groq (hosted open-weight models)
    Groq,
}

impl Provider {
    /// Every integrated provider, in the order models are listed for a poll
    pub const ALL: [Provider; 2] = [Provider::Perplexity, Provider::Groq];

    /// Lowercase identifier used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Perplexity => "perplexity",
            Provider::Groq => "groq",
        }
    }

    /// Uppercase tag used when displaying a model identity
    pub fn tag(&self) -> &'static str {
        match self {
            Provider::Perplexity => "PERPLEXITY",
            Provider::Groq => "GROQ",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perplexity" | "pplx" => Ok(Provider::Perplexity),
            "groq" => Ok(Provider::Groq),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// A (provider, model) pair naming one queryable model
///
/// Used as the stable key for a model throughout a poll.
///
/// # Example
///
/// ```
/// use answer_quorum_domain::{ModelIdentity, Provider};
///
/// let id: ModelIdentity = "perplexity:sonar-pro".parse().unwrap();
/// assert_eq!(id.provider(), Provider::Perplexity);
/// assert_eq!(id.to_string(), "PERPLEXITY:sonar-pro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelIdentity {
    provider: Provider,
    model: String,
}

impl ModelIdentity {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider.tag(), self.model)
    }
}

impl std::str::FromStr for ModelIdentity {
    type Err = DomainError;

    /// Parse `provider:model`. Model names may themselves contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidIdentity(s.to_string()))?;
        let model = model.trim();
        if model.is_empty() {
            return Err(DomainError::InvalidIdentity(s.to_string()));
        }
        Ok(Self::new(provider.parse()?, model))
    }
}

/// Drop repeated identities, keeping the first occurrence of each.
///
/// A model polled twice would vote twice.
pub fn dedup_identities<I>(identities: I) -> Vec<ModelIdentity>
where
    I: IntoIterator<Item = ModelIdentity>,
{
    let mut seen = HashSet::new();
    identities
        .into_iter()
        .filter(|identity| seen.insert(identity.clone()))
        .collect()
}
