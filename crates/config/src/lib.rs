//! Run configuration: `regsnipe.toml` discovery plus env-sourced credentials.
//!
//! Config file searched in `./` then `~/.config/regsnipe/`. Credentials come
//! exclusively from `NET_ID` / `PASSWORD` (a `.env` file is honored by the
//! binary) and are validated before any browser work.

pub mod credentials;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    credentials::Credentials,
    error::ConfigError,
    loader::{CONFIG_FILENAME, config_dir, discover_and_load, find_config_file, load_config},
    schema::{BrowserConfig, EnrollmentConfig, RegsnipeConfig},
};
