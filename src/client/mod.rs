//! HTTP client for the EMOS backend.
//!
//! The shell talks to the backend through [`ProcessBackend`] so that runs can
//! be driven by the real [`BackendClient`], by [`Offline`], or by a test
//! double. Every failure is handed back to the caller; nothing here retries.

mod resolve;

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use emos_core::models::*;

pub use resolve::{resolve_backend_url, HealthProbe, HttpProbe, ResolveOptions, DEV_STATIC_PORTS};

/// Base URL used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:5001";

/// Backend client errors.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Backend disabled")]
    Offline,
}

/// Remote half of a panel run.
pub trait ProcessBackend: Send + Sync + 'static {
    /// `POST /api/process/{id}` with the panel's flat inputs.
    fn submit(
        &self,
        id: FeatureId,
        inputs: &PanelInputs,
    ) -> impl Future<Output = Result<ProcessResponse, BackendError>> + Send;

    /// `POST /api/process/toggle_generator`; answers the server's message.
    fn toggle_generator(
        &self,
        class_name: &str,
        active: bool,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// A backend that refuses everything, so every run uses the local mock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl ProcessBackend for Offline {
    async fn submit(&self, _: FeatureId, _: &PanelInputs) -> Result<ProcessResponse, BackendError> {
        Err(BackendError::Offline)
    }

    async fn toggle_generator(&self, _: &str, _: bool) -> Result<String, BackendError> {
        Err(BackendError::Offline)
    }
}

/// HTTP client for the EMOS backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create with an explicit base URL (no `/api` suffix).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to BackendError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            match status {
                StatusCode::NOT_FOUND => Err(BackendError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(BackendError::BadRequest(message)),
                _ => Err(BackendError::Server(format!("{}: {}", status, message))),
            }
        }
    }

    // ============================================================
    // Operations
    // ============================================================

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    /// Descriptors the backend knows about.
    pub async fn features(&self) -> Result<Vec<FeatureDescriptor>, BackendError> {
        let response = self
            .request(reqwest::Method::GET, "/features")
            .send()
            .await?;
        self.handle_response(response).await
    }
}

impl ProcessBackend for BackendClient {
    async fn submit(
        &self,
        id: FeatureId,
        inputs: &PanelInputs,
    ) -> Result<ProcessResponse, BackendError> {
        tracing::debug!(feature = %id, url = %self.base_url, "Submitting to backend");
        let response = self
            .request(reqwest::Method::POST, &format!("/process/{}", id))
            .json(inputs)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn toggle_generator(&self, class_name: &str, active: bool) -> Result<String, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "/process/toggle_generator")
            .json(&json!({ "class_name": class_name, "active": active }))
            .send()
            .await?;
        let body: serde_json::Value = self.handle_response(response).await?;
        Ok(body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
