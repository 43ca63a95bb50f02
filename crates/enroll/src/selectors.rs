//! The DOM contract with the enrollment site.
//!
//! These locators are the fragile part of the whole system: the site is an
//! Angular Material app and any markup change lands here first. Keep every
//! selector in this module so a breakage is a one-file fix.

use regsnipe_browser::TextQuery;

/// Entry point; also the post-login landing page.
pub const ENROLLMENT_URL: &str = "https://enroll.wisc.edu/my-courses";

/// NetID login form. Absent when the profile still holds a valid session.
pub const USERNAME_FIELD: &str = "#j_username";
pub const PASSWORD_FIELD: &str = "#j_password";
pub const LOGIN_BUTTON: &str = "button[name='_eventId_proceed']";

/// Closed term dropdown on the landing page.
pub const TERM_DROPDOWN: &str = "#mat-select-value-1 > span";

/// First category tile, which opens the course cart.
pub const CART_BUTTON: &str = "#categories cse-category-indicator:nth-child(1) button span.left.grow";

/// Course rows in the cart view.
pub const CART_CHECKBOXES: &str = "input[type='checkbox']";

/// Cart action bar: revalidate then enroll.
pub const REVALIDATE_BUTTON: &str = "#list cse-category-actions-component button:nth-child(2)";
pub const ENROLL_BUTTON: &str =
    "#list cse-category-actions-component button:nth-child(3) span.mdc-button__label";

/// Open confirmation dialog; all dialog text probes are scoped beneath it.
pub const DIALOG: &str = "mat-dialog-container.mdc-dialog--open";
const DIALOG_SCOPE: &str = "mat-dialog-container.mdc-dialog--open *";
const DIALOG_ICONS: &str = "mat-dialog-container.mdc-dialog--open mat-icon";

/// Appointment-window-not-open message shown in the dialog.
pub const INVALID_APPOINTMENT_TEXT: &str =
    "You do not have a valid enrollment appointment at this time.";

/// Dropdown option carrying the term name, e.g. "Fall 2025".
pub fn term_option(term: &str) -> TextQuery {
    TextQuery::contains("mat-option", term)
}

/// The dialog's confirm button.
pub fn dialog_confirm() -> TextQuery {
    TextQuery::exact(DIALOG_SCOPE, "Enroll")
}

/// The dialog's dismiss button, visible once the attempt has resolved.
pub fn dialog_close() -> TextQuery {
    TextQuery::exact(DIALOG_SCOPE, "Close")
}

/// Retry signal: the appointment window has not opened yet.
pub fn dialog_invalid_appointment() -> TextQuery {
    TextQuery::contains(DIALOG_SCOPE, INVALID_APPOINTMENT_TEXT)
}

/// Rejection signal: a cancel icon rendered inside the dialog.
pub fn dialog_rejected_icon() -> TextQuery {
    TextQuery::contains(DIALOG_ICONS, "cancel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_buttons_match_exact_text() {
        assert!(dialog_confirm().exact);
        assert!(dialog_close().exact);
        assert_eq!(dialog_confirm().text, "Enroll");
        assert_eq!(dialog_close().text, "Close");
    }

    #[test]
    fn outcome_probes_are_substring_matches() {
        assert!(!dialog_invalid_appointment().exact);
        assert!(!dialog_rejected_icon().exact);
    }

    #[test]
    fn outcome_probes_are_scoped_to_the_dialog() {
        assert!(dialog_invalid_appointment().css.starts_with(DIALOG));
        assert!(dialog_rejected_icon().css.starts_with(DIALOG));
        assert!(dialog_rejected_icon().css.ends_with("mat-icon"));
    }

    #[test]
    fn term_option_embeds_the_term() {
        let q = term_option("Spring 2026");
        assert_eq!(q.css, "mat-option");
        assert_eq!(q.text, "Spring 2026");
        assert!(!q.exact);
    }
}
