//! Configuration for netdeploy.toml
//!
//! The file lists the networks the deploy task may target and the settings
//! that govern how deployments fan out.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_config, parse_config_str};
pub use schema::{DeploySettings, NetdeployConfig, NetworkConfig};
pub use store::{CONFIG_FILE_NAME, ConfigStore};
