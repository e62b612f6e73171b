use super::Tool;
use crate::error::Result;
use crate::registration::{FIELD_NAMES, GuestForm, GuestRegistration};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

// Both guest tools take the same four arguments.
fn guest_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Guest first name" },
            "surname": { "type": "string", "description": "Guest last name" },
            "email": { "type": "string", "description": "Guest email address" },
            "phone": { "type": "string", "description": "Guest phone number" }
        },
        "required": FIELD_NAMES
    })
}

/// First step of the staged registration. Never touches the backend.
pub struct PrepareGuestRegistration {
    registration: Arc<GuestRegistration>,
}

impl PrepareGuestRegistration {
    pub fn new(registration: Arc<GuestRegistration>) -> Self {
        Self { registration }
    }
}

#[async_trait]
impl Tool for PrepareGuestRegistration {
    fn name(&self) -> &str {
        "prepareGuestRegistration"
    }

    fn description(&self) -> &str {
        "Prepare guest registration by collecting and validating all required information. \
        Call this tool ONLY when you have ALL the required information: name, surname, email, phone. \
        If any information is missing, ask the user for it first - DO NOT call this tool. \
        This tool does not register anyone; it returns a summary that you must show to the user for confirmation."
    }

    fn parameters(&self) -> Value {
        guest_parameters()
    }

    async fn execute(&self, args: Value) -> Result<String> {
        self.registration.prepare(GuestForm::from_args(&args))
    }
}

/// Second step: the only path that creates a guest ticket.
pub struct ConfirmGuestRegistration {
    registration: Arc<GuestRegistration>,
}

impl ConfirmGuestRegistration {
    pub fn new(registration: Arc<GuestRegistration>) -> Self {
        Self { registration }
    }
}

#[async_trait]
impl Tool for ConfirmGuestRegistration {
    fn name(&self) -> &str {
        "confirmGuestRegistration"
    }

    fn description(&self) -> &str {
        "Actually register the guest after confirmation. This action cannot be undone. \
        This tool should ONLY be called after prepareGuestRegistration and explicit user confirmation. \
        Do NOT call this tool without first showing the details to the user and receiving confirmation. \
        Pass the same name, surname, email and phone that were confirmed; all four are required and the email must be a valid address."
    }

    fn parameters(&self) -> Value {
        guest_parameters()
    }

    async fn execute(&self, args: Value) -> Result<String> {
        self.registration.confirm(GuestForm::from_args(&args)).await
    }
}
