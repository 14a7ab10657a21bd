//! Configuration for the Terrella core.
//!
//! Runtime-tunable settings that persist to disk as RON files, with CLI
//! overrides via clap and the quality-tier ordinal consumed by the shadow
//! and culling optimizers.

mod cli;
mod config;
mod error;
mod quality;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GraphicsConfig, GridConfig, PhysicsConfig};
pub use error::ConfigError;
pub use quality::QualityTier;
