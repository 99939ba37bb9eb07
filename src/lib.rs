pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use core::engine::{ClassificationEngine, RegressionEngine};
pub use utils::error::{GatewayError, PredictError, Result, ServeError, ValidationError};
