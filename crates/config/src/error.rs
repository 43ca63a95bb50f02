use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling the run configuration.
///
/// All of these surface before the browser is launched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NET_ID is not set; export it or add it to a .env file")]
    MissingNetId,

    #[error("PASSWORD is not set; export it or add it to a .env file")]
    MissingPassword,

    #[error("semester must not be empty")]
    EmptySemester,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
