//! Three-way classification of a resolved enrollment dialog.

/// How a single enrollment attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Appointment window not open yet; dismiss and try again.
    Retry,
    /// The site rejected the enrollment outright; stop immediately.
    Rejected,
    /// No failure indicator in the dialog; enrollment went through.
    Success,
}

impl AttemptOutcome {
    /// Screenshot filename prefix for this outcome.
    pub fn screenshot_prefix(self) -> &'static str {
        match self {
            AttemptOutcome::Retry => "enrollment_retry",
            AttemptOutcome::Rejected => "enrollment_rejected",
            AttemptOutcome::Success => "enrollment_success",
        }
    }
}

/// Classify a resolved dialog from its two failure indicators.
///
/// The invalid-appointment message wins when both indicators are present,
/// so a not-yet-open window is never mistaken for a hard rejection.
pub fn classify(invalid_appointment: bool, rejected: bool) -> AttemptOutcome {
    if invalid_appointment {
        AttemptOutcome::Retry
    } else if rejected {
        AttemptOutcome::Rejected
    } else {
        AttemptOutcome::Success
    }
}

/// Terminal result of a whole enrollment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Enrollment succeeded on the given attempt.
    Enrolled { attempts: u32 },
    /// The site signalled a hard rejection on the given attempt.
    Rejected { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_dialog_is_success() {
        assert_eq!(classify(false, false), AttemptOutcome::Success);
    }

    #[test]
    fn invalid_appointment_is_retry() {
        assert_eq!(classify(true, false), AttemptOutcome::Retry);
    }

    #[test]
    fn cancel_icon_is_rejected() {
        assert_eq!(classify(false, true), AttemptOutcome::Rejected);
    }

    #[test]
    fn invalid_appointment_wins_over_cancel_icon() {
        assert_eq!(classify(true, true), AttemptOutcome::Retry);
    }

    #[test]
    fn prefixes_are_distinct_per_outcome() {
        let prefixes = [
            AttemptOutcome::Retry.screenshot_prefix(),
            AttemptOutcome::Rejected.screenshot_prefix(),
            AttemptOutcome::Success.screenshot_prefix(),
        ];
        assert_eq!(prefixes[0], "enrollment_retry");
        assert_eq!(prefixes[1], "enrollment_rejected");
        assert_eq!(prefixes[2], "enrollment_success");
        assert_ne!(prefixes[0], prefixes[1]);
        assert_ne!(prefixes[1], prefixes[2]);
    }
}
