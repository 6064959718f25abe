//! Configuration loading and env substitution.
//!
//! Config files: `botwire.toml`, `botwire.yaml`, or `botwire.json`,
//! searched in `./` then the user config directory.
//!
//! Supports `${ENV_VAR}` substitution anywhere in the file.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{BotwireConfig, ChannelsConfig, ServerConfig},
};
