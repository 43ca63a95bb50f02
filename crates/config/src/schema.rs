//! Config schema types (enrollment run, browser launch).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegsnipeConfig {
    pub enrollment: EnrollmentConfig,
    pub browser: BrowserConfig,
}

/// Enrollment run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    /// Registration term, matched by substring against the visible text of
    /// the term dropdown options.
    pub semester: String,
    /// Directory receiving the per-attempt audit screenshots.
    pub screenshots_dir: PathBuf,
    /// Upper bound on enrollment attempts. `None` retries until the site
    /// yields a definitive outcome.
    pub max_attempts: Option<u32>,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            semester: "Fall 2025".into(),
            screenshots_dir: PathBuf::from("screenshots"),
            max_attempts: None,
        }
    }
}

impl EnrollmentConfig {
    /// Fail fast on values the attempt loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.semester.trim().is_empty() {
            return Err(ConfigError::EmptySemester);
        }
        Ok(())
    }
}

/// Browser launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Headful by default: the login flow may interpose a Duo prompt that
    /// needs a visible window.
    pub headless: bool,
    /// Persistent profile directory, reused across runs so session cookies
    /// survive and login becomes a no-op.
    pub profile_dir: PathBuf,
    /// Viewport width in CSS pixels.
    pub viewport_width: u32,
    /// Viewport height in CSS pixels.
    pub viewport_height: u32,
    /// Bound on every navigation and element wait, in seconds.
    pub op_timeout_secs: u64,
    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: false,
            profile_dir: PathBuf::from("chrome_profile"),
            viewport_width: 1280,
            viewport_height: 720,
            op_timeout_secs: 180,
            chrome_args: Vec::new(),
        }
    }
}
