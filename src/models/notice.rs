//! User-facing notices (toasts).

use std::sync::atomic::{AtomicUsize, Ordering};

use msgview_core::Severity;

/// A single notice with a unique ID.
#[derive(Clone, Debug)]
pub struct Notice {
    /// Unique ID for keying in For loops and dismissal
    pub id: usize,
    pub severity: Severity,
    pub text: String,
}

// Global counter for generating unique IDs
static NOTICE_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Notice {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            id: NOTICE_COUNTER.fetch_add(1, Ordering::Relaxed),
            severity,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }
}

impl PartialEq for Notice {
    fn eq(&self, other: &Self) -> bool {
        // Only compare content, not ID
        self.severity == other.severity && self.text == other.text
    }
}

/// Append `notice`, dropping the oldest entries beyond `cap`.
pub fn push_capped(notices: &mut Vec<Notice>, notice: Notice, cap: usize) {
    notices.push(notice);
    if notices.len() > cap {
        let excess = notices.len() - cap;
        notices.drain(..excess);
    }
}

/// Remove the notice with `id`. Unknown ids are ignored.
pub fn dismiss(notices: &mut Vec<Notice>, id: usize) {
    notices.retain(|n| n.id != id);
}
