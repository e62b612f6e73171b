use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpBackend;

/// A document waiting for signature. Owned by the backend; the gateway only relays it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub signed: bool,
}

/// Guest payload for `POST /create-guest-ticket`.
///
/// Only built by [`crate::registration::GuestRegistration::confirm`] once every field
/// is non-blank and the email is well formed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
}

/// The three operations the AskMe backend exposes.
/// Tools depend on this trait, not on the reqwest client.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /check-unsigned-documents`. Safe to repeat.
    async fn fetch_unsigned_documents(&self) -> Result<Vec<Document>>;

    /// `POST /sign-document?documentId=..`. The backend decides whether the id exists.
    async fn sign_document(&self, document_id: &str) -> Result<String>;

    /// `POST /create-guest-ticket`. No validation here; callers pass a checked [`Guest`].
    async fn create_guest(&self, guest: &Guest) -> Result<String>;
}
