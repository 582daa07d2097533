pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use api::AppState;
pub use config::{lambda::LambdaConfig, toml_config::TomlConfig};
pub use core::orchestrator::{AggregationOutcome, ContactAggregator};
pub use domain::services::CrmServices;
pub use utils::error::{FacadeError, Result};
