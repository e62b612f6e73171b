//! Staged guest registration.
//!
//! Registering a guest is irreversible, so it takes two tool calls:
//! `prepare` checks the four fields and returns a summary for the user,
//! `confirm` re-checks everything (including the email) and only then calls the backend.
//! Nothing is stored between the two calls; the agent re-sends all four fields.

use crate::backend::{BackendApi, Guest};
use crate::error::Result;
use std::sync::Arc;

pub mod audit;
pub mod validate;

pub use audit::{AuditStats, CorrelationKey, RegistrationAudit, RegistrationStage};
pub use validate::{FIELD_NAMES, GuestDraft, GuestForm, ValidationError, is_valid_email};

pub struct GuestRegistration {
    backend: Arc<dyn BackendApi>,
    audit: Arc<RegistrationAudit>,
}

impl GuestRegistration {
    pub fn new(backend: Arc<dyn BackendApi>, audit: Arc<RegistrationAudit>) -> Self {
        Self { backend, audit }
    }

    pub fn audit(&self) -> &RegistrationAudit {
        &self.audit
    }

    /// Unstaged -> Prepared. Structural validation only, no network call.
    pub fn prepare(&self, form: GuestForm) -> Result<String> {
        let draft = match form.into_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.audit.record_rejected(RegistrationStage::Unstaged, "missing fields");
                return Err(e.into());
            }
        };

        self.audit.record_prepared(CorrelationKey::for_draft(&draft));
        Ok(render_summary(&draft))
    }

    /// Prepared -> Committed. Full validation, then exactly one `create_guest` call.
    pub async fn confirm(&self, form: GuestForm) -> Result<String> {
        let draft = match form.into_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.audit.record_rejected(RegistrationStage::Prepared, "missing fields");
                return Err(e.into());
            }
        };

        if !is_valid_email(&draft.email) {
            self.audit.record_rejected(RegistrationStage::Prepared, "invalid email");
            return Err(ValidationError::InvalidEmail { email: draft.email }.into());
        }

        let key = CorrelationKey::for_draft(&draft);
        let guest = Guest {
            name: draft.name,
            surname: draft.surname,
            email: draft.email,
            phone: draft.phone,
        };

        // The backend text is relayed verbatim.
        let response = self.backend.create_guest(&guest).await?;
        self.audit.record_committed(key);
        Ok(response)
    }
}

fn render_summary(draft: &GuestDraft) -> String {
    format!(
        "Guest registration prepared with the following details:\n\
         - Name: {}\n\
         - Surname: {}\n\
         - Email: {}\n\
         - Phone: {}\n\
         \n\
         Please show these details to the user and ask them to confirm that everything is correct. \
         Only call confirmGuestRegistration with these same values after the user explicitly confirms.",
        draft.name, draft.surname, draft.email, draft.phone
    )
}
