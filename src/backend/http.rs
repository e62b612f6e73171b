use super::{BackendApi, Document, Guest};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;

// Thin wrapper around reqwest for the AskMe backend.
// One request per call: no retries and no caching at this layer.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

// Spring-style error body; either field may carry the human message.
#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.backend_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins `path` onto the base address, keeping any path prefix the base already has.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| GatewayError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    /// Turns a non-2xx response into `GatewayError::Backend`, keeping the backend's own message.
    async fn check_status(res: Response) -> Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<BackendErrorResponse>(&body)
            .ok()
            .and_then(|payload| payload.message.or(payload.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(body);

        tracing::warn!(%status, %message, "backend rejected request");
        Err(GatewayError::Backend { status, message })
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    #[tracing::instrument(name = "fetch_unsigned_documents", skip_all)]
    async fn fetch_unsigned_documents(&self) -> Result<Vec<Document>> {
        let url = self.endpoint("/check-unsigned-documents")?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(GatewayError::BackendUnavailable)?;
        let res = Self::check_status(res).await?;

        let documents = res
            .json::<Vec<Document>>()
            .await
            .map_err(GatewayError::Decode)?;
        tracing::debug!(count = documents.len(), "fetched unsigned documents");
        Ok(documents)
    }

    #[tracing::instrument(name = "sign_document", skip(self))]
    async fn sign_document(&self, document_id: &str) -> Result<String> {
        let mut url = self.endpoint("/sign-document")?;
        url.query_pairs_mut().append_pair("documentId", document_id);

        let res = self
            .http
            .post(url)
            .send()
            .await
            .map_err(GatewayError::BackendUnavailable)?;
        let res = Self::check_status(res).await?;

        res.text().await.map_err(GatewayError::Decode)
    }

    #[tracing::instrument(name = "create_guest", skip_all)]
    async fn create_guest(&self, guest: &Guest) -> Result<String> {
        let url = self.endpoint("/create-guest-ticket")?;
        let res = self
            .http
            .post(url)
            .json(guest)
            .send()
            .await
            .map_err(GatewayError::BackendUnavailable)?;
        let res = Self::check_status(res).await?;

        let text = res.text().await.map_err(GatewayError::Decode)?;
        tracing::info!("guest ticket created");
        Ok(text)
    }
}
