//! Chromium automation for the enrollment flow.
//!
//! One local browser, one page: [`BrowserSession`] owns the Chromium process
//! and its persistent profile, [`CdpPage`] drives the page over CDP, and the
//! [`PageDriver`] trait is the seam the flow logic consumes so it can be
//! tested without a browser.

pub mod detect;
pub mod error;
pub mod page;
pub mod session;

pub use {
    error::BrowserError,
    page::{CdpPage, PageDriver, TextQuery},
    session::BrowserSession,
};
