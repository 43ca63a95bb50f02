//! Course enrollment flow for the UW-Madison enrollment site.
//!
//! Login, term and cart selection, and the attempt loop that keeps
//! re-submitting the cart until the site yields a definitive outcome,
//! capturing one audit screenshot per attempt along the way.

pub mod error;
pub mod flow;
pub mod outcome;
pub mod selectors;
pub mod shots;

pub use {
    error::EnrollError,
    flow::EnrollmentFlow,
    outcome::{AttemptOutcome, RunOutcome, classify},
    shots::ScreenshotStore,
};
