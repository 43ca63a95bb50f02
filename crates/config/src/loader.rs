use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{error::ConfigError, schema::RegsnipeConfig};

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "regsnipe.toml";

/// Load config from the given TOML file.
pub fn load_config(path: &Path) -> Result<RegsnipeConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./regsnipe.toml` (project-local)
/// 2. `~/.config/regsnipe/regsnipe.toml` (user-global)
///
/// Returns `RegsnipeConfig::default()` if no config file is found or the
/// file fails to parse (with a warning).
pub fn discover_and_load() -> RegsnipeConfig {
    match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_or_default(&path)
        },
        None => {
            debug!("no config file found, using defaults");
            RegsnipeConfig::default()
        },
    }
}

/// Load the file, falling back to defaults (with a warning) on any error.
fn load_or_default(path: &Path) -> RegsnipeConfig {
    load_config(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        RegsnipeConfig::default()
    })
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    // User-global: ~/.config/regsnipe/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "regsnipe") {
        let p = dirs.config_dir().join(CONFIG_FILENAME);
        if p.exists() {
            return Some(p);
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/regsnipe/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "regsnipe").map(|d| d.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regsnipe.toml");
        std::fs::write(&path, "[enrollment]\nsemester = \"Summer 2026\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.enrollment.semester, "Summer 2026");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regsnipe.toml");
        std::fs::write(&path, "[enrollment\nsemester = !!").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn falls_back_to_defaults_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regsnipe.toml");
        std::fs::write(&path, "not toml at all [[[").unwrap();

        let config = load_or_default(&path);
        assert_eq!(config.enrollment.semester, "Fall 2025");
    }
}
