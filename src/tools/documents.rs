use super::{Tool, required_str};
use crate::backend::{BackendApi, Document};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// Lists documents waiting for signature. Read-only, safe to repeat.
pub struct FetchDocuments {
    backend: Arc<dyn BackendApi>,
}

impl FetchDocuments {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for FetchDocuments {
    fn name(&self) -> &str {
        "fetchDocuments"
    }

    fn description(&self) -> &str {
        "Fetch all the documents ready to be signed from the AskMe API. \
        Takes no arguments and changes nothing, so it is safe to call whenever the user asks about pending documents. \
        Use the returned id with signDocument."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: Value) -> Result<String> {
        let documents = self.backend.fetch_unsigned_documents().await?;
        Ok(render_documents(&documents))
    }
}

/// Signs one document by id. The backend is authoritative on whether the id exists.
pub struct SignDocument {
    backend: Arc<dyn BackendApi>,
}

impl SignDocument {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for SignDocument {
    fn name(&self) -> &str {
        "signDocument"
    }

    fn description(&self) -> &str {
        "Sign a document by its ID using the AskMe API. \
        Pass the id exactly as returned by fetchDocuments; do not guess ids."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "documentId": {
                    "type": "string",
                    "description": "The id of the document to sign, as returned by fetchDocuments"
                }
            },
            "required": ["documentId"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let document_id = required_str(&args, "documentId")?;
        self.backend.sign_document(document_id).await
    }
}

fn render_documents(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No unsigned documents.".to_string();
    }

    let mut out = format!("{} unsigned document(s):\n", documents.len());
    for doc in documents {
        let state = if doc.signed { "signed" } else { "unsigned" };
        out.push_str(&format!(
            "- [{}] {}: {} ({})\n",
            doc.id, doc.title, doc.description, state
        ));
    }
    out
}
