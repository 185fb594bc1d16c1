//! services/docvault/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the document backend, the
//! concrete implementation of the `DocumentApi` port from the `core` crate.
//! Every failure, whatever the operation, is normalized into an `ApiError`
//! here.

use async_trait::async_trait;
use docvault_core::domain::{
    BatchProcessOutcome, CategoryDraft, CategoryId, Document, DocumentCategory, DocumentId,
    DocumentPatch, DocumentQuery, ExportFormat, NewDocument, StatusMessage, UserId,
};
use docvault_core::ports::{ApiError, DocumentApi, PortResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct UserIdsBody<'a> {
    user_ids: &'a [UserId],
}

#[derive(Serialize)]
struct DocumentIdsBody<'a> {
    document_ids: &'a [DocumentId],
}

#[derive(Serialize)]
struct ExportBody<'a> {
    document_ids: &'a [DocumentId],
    format: ExportFormat,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct DownloadBody {
    file_url: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `DocumentApi` port over the backend's REST API.
#[derive(Clone)]
pub struct HttpDocumentApi {
    client: Client,
    base_url: String,
}

impl HttpDocumentApi {
    /// Creates a new `HttpDocumentApi` from an existing client and base URL.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Builds the client once at startup, attaching the session credentials to
    /// every request.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(e) => warn!("Ignoring session cookie that is not a valid header: {}", e),
            }
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self::new(client, config.api_url.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}", method, path);
        self.client.request(method, self.url(path))
    }

    /// Sends the request and decodes a JSON body on success.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PortResult<T> {
        let response = Self::send(builder).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read response body: {}", e);
            ApiError::network().with_code(status.as_u16().to_string())
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Failed to decode response body: {}", e);
            ApiError::new(format!("Failed to decode response: {}", e))
                .with_code(status.as_u16().to_string())
        })
    }

    /// Sends the request and discards the body on success.
    async fn send_empty(&self, builder: RequestBuilder) -> PortResult<()> {
        Self::send(builder).await.map(|_| ())
    }

    async fn send(builder: RequestBuilder) -> PortResult<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response was received: {}", e);
            ApiError::network()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!("Backend returned {}: {}", status, err.message);
        Err(err)
    }
}

//=========================================================================================
// `DocumentApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentApi for HttpDocumentApi {
    async fn list_documents(&self, query: DocumentQuery) -> PortResult<Vec<Document>> {
        self.send_json(self.request(Method::GET, "/documents/").query(&query))
            .await
    }

    async fn get_document(&self, id: DocumentId) -> PortResult<Document> {
        self.send_json(self.request(Method::GET, &format!("/documents/{}/", id)))
            .await
    }

    async fn create_document(&self, upload: NewDocument) -> PortResult<Document> {
        let title = upload.effective_title();
        let file = Part::bytes(upload.content.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::new(format!("Failed to build upload: {}", e)))?;

        let mut form = Form::new().text("title", title).part("file", file);
        if let Some(category) = upload.category {
            form = form.text("category", category.to_string());
        }

        self.send_json(self.request(Method::POST, "/documents/").multipart(form))
            .await
    }

    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> PortResult<Document> {
        self.send_json(
            self.request(Method::PATCH, &format!("/documents/{}/", id))
                .json(patch),
        )
        .await
    }

    async fn delete_document(&self, id: DocumentId) -> PortResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/documents/{}/", id)))
            .await
    }

    async fn list_versions(&self, id: DocumentId) -> PortResult<Vec<Document>> {
        self.send_json(self.request(Method::GET, &format!("/documents/{}/versions/", id)))
            .await
    }

    async fn download_url(&self, id: DocumentId) -> PortResult<String> {
        let body: DownloadBody = self
            .send_json(self.request(Method::GET, &format!("/documents/{}/download/", id)))
            .await?;
        Ok(body.file_url)
    }

    async fn share_document(&self, id: DocumentId, user_ids: &[UserId]) -> PortResult<StatusMessage> {
        self.send_json(
            self.request(Method::POST, &format!("/documents/{}/share/", id))
                .json(&UserIdsBody { user_ids }),
        )
        .await
    }

    async fn unshare_document(
        &self,
        id: DocumentId,
        user_ids: &[UserId],
    ) -> PortResult<StatusMessage> {
        self.send_json(
            self.request(Method::POST, &format!("/documents/{}/unshare/", id))
                .json(&UserIdsBody { user_ids }),
        )
        .await
    }

    async fn search_documents(&self, q: &str, query: DocumentQuery) -> PortResult<Vec<Document>> {
        self.send_json(
            self.request(Method::GET, "/documents/search/")
                .query(&SearchParams { q })
                .query(&query),
        )
        .await
    }

    async fn batch_process(&self, ids: &[DocumentId]) -> PortResult<Vec<BatchProcessOutcome>> {
        self.send_json(
            self.request(Method::POST, "/documents/batch_process/")
                .json(&DocumentIdsBody { document_ids: ids }),
        )
        .await
    }

    async fn batch_export(
        &self,
        ids: &[DocumentId],
        format: ExportFormat,
    ) -> PortResult<serde_json::Value> {
        self.send_json(
            self.request(Method::POST, "/documents/batch_export/")
                .json(&ExportBody {
                    document_ids: ids,
                    format,
                }),
        )
        .await
    }

    async fn list_categories(&self) -> PortResult<Vec<DocumentCategory>> {
        self.send_json(self.request(Method::GET, "/documents/categories/"))
            .await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> PortResult<DocumentCategory> {
        self.send_json(
            self.request(Method::POST, "/documents/categories/")
                .json(draft),
        )
        .await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> PortResult<DocumentCategory> {
        self.send_json(
            self.request(Method::PATCH, &format!("/documents/categories/{}/", id))
                .json(draft),
        )
        .await
    }

    async fn delete_category(&self, id: CategoryId) -> PortResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/documents/categories/{}/", id)))
            .await
    }
}
