//! Auth Service collaborator.
//!
//! The service only moves bytes: it posts the request body and hands back the
//! raw status, content type and body. Interpreting the reply is the flow
//! controller's job (see `auth::response`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::AuthFlowError;
use crate::identity::{AuthMode, AuthRequestBody};

/// Raw reply from the Auth Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl AuthReply {
    /// A reply with an `application/json` content type.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }
}

#[async_trait]
pub trait BaseAuthService: Send + Sync {
    /// Post a login or signup body.
    ///
    /// Returns `Err(AuthFlowError::Transport)` only when no reply was received.
    async fn submit(&self, mode: AuthMode, body: &AuthRequestBody)
        -> Result<AuthReply, AuthFlowError>;
}

/// `reqwest`-backed Auth Service client.
#[derive(Clone)]
pub struct HttpAuthService {
    client: Client,
    base_url: String,
}

impl HttpAuthService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthFlowError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthFlowError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthFlowError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, mode: AuthMode) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), mode.path())
    }
}

#[async_trait]
impl BaseAuthService for HttpAuthService {
    async fn submit(
        &self,
        mode: AuthMode,
        body: &AuthRequestBody,
    ) -> Result<AuthReply, AuthFlowError> {
        let url = self.endpoint(mode);
        debug!(%url, %mode, role = %body.role, "Posting auth request");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AuthFlowError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| AuthFlowError::Transport(e.to_string()))?;

        debug!(status, content_type = ?content_type, "Auth reply received");

        Ok(AuthReply {
            status,
            content_type,
            body,
        })
    }
}
