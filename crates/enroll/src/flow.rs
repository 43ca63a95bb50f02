//! The enrollment state machine: login, term and cart selection, then
//! attempt-until-resolved.
//!
//! Every browser interaction goes through [`PageDriver`], so the whole flow
//! runs unchanged against a scripted page in tests.

use {
    regsnipe_browser::{BrowserError, PageDriver},
    regsnipe_config::{Credentials, EnrollmentConfig},
    secrecy::ExposeSecret,
    tracing::{debug, error, info, warn},
};

use crate::{
    error::EnrollError,
    outcome::{AttemptOutcome, RunOutcome, classify},
    selectors, shots::ScreenshotStore,
};

/// One enrollment run against a single page.
pub struct EnrollmentFlow<'a, P> {
    page: &'a P,
    credentials: &'a Credentials,
    config: &'a EnrollmentConfig,
    shots: &'a ScreenshotStore,
    attempt: u32,
}

impl<'a, P: PageDriver> EnrollmentFlow<'a, P> {
    pub fn new(
        page: &'a P,
        credentials: &'a Credentials,
        config: &'a EnrollmentConfig,
        shots: &'a ScreenshotStore,
    ) -> Self {
        Self {
            page,
            credentials,
            config,
            shots,
            attempt: 0,
        }
    }

    /// Drive the run to a terminal outcome.
    pub async fn run(&mut self) -> Result<RunOutcome, EnrollError> {
        self.sign_in().await?;
        self.select_term().await?;
        self.open_cart().await?;
        self.attempt_until_resolved().await
    }

    /// Navigate to the enrollment page and log in if the NetID form shows.
    ///
    /// With a warm profile the session cookie is still valid, the form never
    /// renders, and this is a pure navigation. Duo approval (when the site
    /// interposes one) happens in the visible window; the term dropdown wait
    /// that follows absorbs the delay.
    async fn sign_in(&self) -> Result<(), EnrollError> {
        self.page.goto(selectors::ENROLLMENT_URL).await?;
        self.page.reload().await?;

        if self.page.is_visible(selectors::USERNAME_FIELD).await? {
            info!(net_id = %self.credentials.net_id, "logging in");
            self.page
                .fill(selectors::USERNAME_FIELD, &self.credentials.net_id)
                .await?;
            self.page
                .fill(
                    selectors::PASSWORD_FIELD,
                    self.credentials.password.expose_secret(),
                )
                .await?;
            self.page.click(selectors::LOGIN_BUTTON).await?;
        } else {
            debug!("login form not shown, reusing existing session");
        }

        Ok(())
    }

    /// Pick the configured term from the dropdown.
    async fn select_term(&self) -> Result<(), EnrollError> {
        let term = self.config.semester.as_str();
        info!(term, "selecting term");

        self.try_select_term(term).await.map_err(|source| {
            error!(term, "term not found in the dropdown");
            EnrollError::TermUnavailable {
                term: term.to_string(),
                source,
            }
        })
    }

    async fn try_select_term(&self, term: &str) -> Result<(), BrowserError> {
        self.page.wait_visible(selectors::TERM_DROPDOWN).await?;
        self.page.click(selectors::TERM_DROPDOWN).await?;

        let option = selectors::term_option(term);
        self.page.wait_text_visible(&option).await?;
        self.page.click_text(&option).await
    }

    /// Open the course cart view.
    async fn open_cart(&self) -> Result<(), EnrollError> {
        self.page.wait_visible(selectors::CART_BUTTON).await?;
        self.page.click(selectors::CART_BUTTON).await?;
        debug!("opened course cart");
        Ok(())
    }

    /// Run enrollment attempts until the site yields a definitive outcome.
    ///
    /// Each retry dismisses the dialog and goes straight into the next
    /// attempt, no backoff: the appointment window opening is a fixed
    /// point in time and the goal is to enroll the moment it does.
    async fn attempt_until_resolved(&mut self) -> Result<RunOutcome, EnrollError> {
        loop {
            self.attempt += 1;
            debug!(
                attempt = self.attempt,
                term = %self.config.semester,
                "starting enrollment attempt"
            );

            self.check_cart_courses().await?;
            self.submit_cart().await?;

            // The Close affordance appearing is the dialog's resolution
            // signal; only then are the outcome indicators meaningful.
            let close = selectors::dialog_close();
            self.page.wait_text_visible(&close).await?;

            let invalid = self
                .page
                .text_visible(&selectors::dialog_invalid_appointment())
                .await?;
            let rejected = self
                .page
                .text_visible(&selectors::dialog_rejected_icon())
                .await?;
            let outcome = classify(invalid, rejected);

            self.capture(outcome).await?;

            match outcome {
                AttemptOutcome::Retry => {
                    warn!(
                        attempt = self.attempt,
                        "no valid enrollment appointment yet, retrying"
                    );
                    self.page.click_text(&close).await?;
                    if let Some(max) = self.config.max_attempts {
                        if self.attempt >= max {
                            return Err(EnrollError::AttemptsExhausted {
                                attempts: self.attempt,
                            });
                        }
                    }
                },
                AttemptOutcome::Rejected => {
                    error!(attempt = self.attempt, "enrollment rejected by the site");
                    return Ok(RunOutcome::Rejected {
                        attempts: self.attempt,
                    });
                },
                AttemptOutcome::Success => {
                    self.page.click_text(&close).await?;
                    info!(attempt = self.attempt, "enrollment successful");
                    return Ok(RunOutcome::Enrolled {
                        attempts: self.attempt,
                    });
                },
            }
        }
    }

    /// Check every unchecked course checkbox, leaving checked ones alone.
    async fn check_cart_courses(&self) -> Result<(), EnrollError> {
        self.page.wait_visible(selectors::CART_CHECKBOXES).await?;

        let states = self.page.checkbox_states(selectors::CART_CHECKBOXES).await?;
        if states.is_empty() {
            error!("cart has no course checkboxes");
            return Err(EnrollError::EmptyCart);
        }

        for (index, &checked) in states.iter().enumerate() {
            if !checked {
                self.page.click_nth(selectors::CART_CHECKBOXES, index).await?;
            }
        }
        debug!(courses = states.len(), "cart courses checked");
        Ok(())
    }

    /// Revalidate, click enroll, and confirm in the dialog.
    async fn submit_cart(&self) -> Result<(), EnrollError> {
        info!("revalidating cart");
        self.page.wait_visible(selectors::REVALIDATE_BUTTON).await?;
        self.page.click(selectors::REVALIDATE_BUTTON).await?;

        info!("submitting enrollment");
        self.page.wait_visible(selectors::ENROLL_BUTTON).await?;
        self.page.click(selectors::ENROLL_BUTTON).await?;

        let confirm = selectors::dialog_confirm();
        self.page.wait_text_visible(&confirm).await?;
        self.page.click_text(&confirm).await?;
        info!("enrollment in progress");
        Ok(())
    }

    /// Capture the audit screenshot for a resolved attempt.
    async fn capture(&self, outcome: AttemptOutcome) -> Result<(), EnrollError> {
        let png = self.page.screenshot().await?;
        let path = self
            .shots
            .save(outcome.screenshot_prefix(), self.attempt, &png)
            .await?;
        info!(path = %path.display(), "captured attempt screenshot");
        Ok(())
    }
}
