//! Enrollment flow error types.

use std::path::PathBuf;

use {regsnipe_browser::BrowserError, thiserror::Error};

/// Errors that abort an enrollment run.
#[derive(Debug, Error)]
pub enum EnrollError {
    /// The configured term never showed up in the term dropdown.
    #[error("term {term:?} is not available in the term dropdown")]
    TermUnavailable {
        term: String,
        #[source]
        source: BrowserError,
    },

    /// The cart view rendered without any course checkboxes.
    #[error("no courses found in the cart")]
    EmptyCart,

    /// The configured attempt cap was reached without a definitive outcome.
    #[error("gave up after {attempts} enrollment attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error("failed to write screenshot {}: {source}", path.display())]
    ScreenshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
