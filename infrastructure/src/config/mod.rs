//! Configuration file loading for archivist
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ARCHIVIST_*` environment variables (`ARCHIVIST_AGENT__MAX_STEPS=4`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./archivist.toml` or `./.archivist.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/archivist/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileAuditConfig, FileConfig, FileOutputConfig,
    FileReasoningConfig, FileRetrievalConfig, FileSearchToolConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
