//! Audit screenshots, one per resolved enrollment attempt.

use std::path::{Path, PathBuf};

use {chrono::Utc, tracing::debug};

use crate::error::EnrollError;

/// Writes attempt screenshots into a single output directory.
///
/// Filenames encode the outcome prefix, the attempt number, and a unix
/// timestamp, so a run's audit trail sorts and reads chronologically.
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one PNG screenshot, returning the path it landed at.
    pub async fn save(
        &self,
        prefix: &str,
        attempt: u32,
        png: &[u8],
    ) -> Result<PathBuf, EnrollError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| EnrollError::ScreenshotWrite {
                path: self.dir.clone(),
                source,
            })?;

        let path = self
            .dir
            .join(file_name(prefix, attempt, Utc::now().timestamp()));
        tokio::fs::write(&path, png)
            .await
            .map_err(|source| EnrollError::ScreenshotWrite {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = png.len(), "wrote screenshot");
        Ok(path)
    }
}

fn file_name(prefix: &str, attempt: u32, timestamp: i64) -> String {
    format!("{prefix}_{attempt}_{timestamp}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_encodes_prefix_attempt_and_timestamp() {
        assert_eq!(
            file_name("enrollment_retry", 3, 1755993600),
            "enrollment_retry_3_1755993600.png"
        );
    }

    #[tokio::test]
    async fn save_creates_the_directory_and_writes_the_png() {
        let root = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(root.path().join("shots"));

        let path = store.save("enrollment_success", 1, b"png-bytes").await.unwrap();

        assert!(path.starts_with(store.dir()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("enrollment_success_1_"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn save_into_unwritable_location_reports_the_path() {
        let store = ScreenshotStore::new("/proc/no-such-place/shots");
        let err = store.save("enrollment_retry", 1, b"png").await.unwrap_err();
        match err {
            EnrollError::ScreenshotWrite { path, .. } => {
                assert!(path.starts_with("/proc/no-such-place"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
