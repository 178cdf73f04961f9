use tracing::debug;

use super::domain::ApplicationFormData;

pub const UNLOAD_WARNING: &str =
    "You have an application in progress. Leaving now may discard unsaved changes.";

/// True once the applicant has entered anything worth protecting.
pub fn is_dirty(form: &ApplicationFormData) -> bool {
    let has_text = [
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.phone_number,
        &form.short_bio,
        &form.property_id,
    ]
    .iter()
    .any(|value| !value.trim().is_empty());

    let has_records = !form.occupants.is_empty()
        || !form.pets.is_empty()
        || !form.vehicles.is_empty()
        || !form.residences.is_empty()
        || !form.incomes.is_empty();

    has_text || has_records || form.dob.is_some() || form.move_in_date.is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardChange {
    Installed,
    Removed,
}

/// Tracks the page-unload interceptor, which only exists while the form is dirty.
#[derive(Debug, Default)]
pub struct DirtyGuard {
    unload_interceptor: bool,
}

impl DirtyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or remove the interceptor to match `dirty`, reporting any change.
    pub fn sync(&mut self, dirty: bool) -> Option<GuardChange> {
        if dirty == self.unload_interceptor {
            return None;
        }
        self.unload_interceptor = dirty;
        let change = if dirty {
            GuardChange::Installed
        } else {
            GuardChange::Removed
        };
        debug!(?change, "unload interceptor updated");
        Some(change)
    }

    pub fn is_installed(&self) -> bool {
        self.unload_interceptor
    }

    /// Prompt to show when the page is about to unload, if any.
    pub fn unload_warning(&self) -> Option<&'static str> {
        self.unload_interceptor.then_some(UNLOAD_WARNING)
    }
}

/// Destructive actions that need the user's explicit go-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRequest {
    /// "Back" from the first screen.
    AbandonApplication,
    /// The "Cancel Application" control.
    CancelApplication,
}

impl ConfirmRequest {
    pub const fn message(self) -> &'static str {
        match self {
            ConfirmRequest::AbandonApplication => {
                "Going back will discard this application. Continue?"
            }
            ConfirmRequest::CancelApplication => {
                "Cancel this application? Everything entered so far will be lost."
            }
        }
    }
}

/// Confirmation dialog seam.
pub trait Confirmer {
    fn confirm(&self, request: ConfirmRequest) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(ConfirmRequest) -> bool,
{
    fn confirm(&self, request: ConfirmRequest) -> bool {
        self(request)
    }
}
