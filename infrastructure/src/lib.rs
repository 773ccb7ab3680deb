//! Infrastructure layer for answer-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlAnswerLogger;
pub use providers::{
    ModelCatalog, OpenAiCompatAdapter, OpenAiCompatConfig, ProviderAdapter, ProviderError,
    RoutingGateway, api_key_env,
};
