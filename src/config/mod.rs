//! Configuration subsystem for curio
//!
//! One JSON file, loaded once at startup, validated before anything else
//! runs. Any problem is FATAL.

mod engine_config;
mod errors;

pub use engine_config::EngineConfig;
pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};
