//! Configuration system for Deepbound.
//!
//! Provides runtime-configurable world and generator settings that persist to
//! disk as RON files. Supports CLI overrides via clap, hot-reload detection,
//! and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CacheConfig, CaveConfig, ClimateConfig, Config, DebugConfig, StrataConfig, TerrainConfig,
    WorkerConfig, WorldConfig,
};
pub use error::ConfigError;
