//! Configuration file loading for answer-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ANSWER_QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./answer-quorum.toml` or `./.answer-quorum.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/answer-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConsensusConfig, FileDiscoveryConfig,
    FileLoggingConfig, FilePollConfig, FileProviderConfig, FileProvidersConfig, FileQueryConfig,
    FileRetryConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
