// Mock collaborators for tests
//
// Available under `cfg(test)` and to downstream crates through the `testing`
// feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{AuthReply, BaseAuthService};
use crate::error::AuthFlowError;
use crate::identity::{AuthMode, AuthRequestBody};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock Auth Service
// =============================================================================

/// One request seen by [`MockAuthService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub mode: AuthMode,
    /// The request body as it would go over the wire.
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockAuthService {
    replies: Arc<Mutex<VecDeque<Result<AuthReply, AuthFlowError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply
    pub fn with_reply(self, reply: AuthReply) -> Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    /// Queue an `application/json` reply
    pub fn with_json_reply(self, status: u16, body: Value) -> Self {
        self.with_reply(AuthReply::json(status, &body))
    }

    /// Queue a failure to reach the service
    pub fn with_transport_error(self, message: impl Into<String>) -> Self {
        lock(&self.replies).push_back(Err(AuthFlowError::Transport(message.into())));
        self
    }

    /// Get all requests that were sent
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl BaseAuthService for MockAuthService {
    async fn submit(
        &self,
        mode: AuthMode,
        body: &AuthRequestBody,
    ) -> Result<AuthReply, AuthFlowError> {
        let body = serde_json::to_value(body).map_err(|e| AuthFlowError::Transport(e.to_string()))?;
        lock(&self.calls).push(RecordedCall { mode, body });

        // Unscripted calls behave like an unreachable service
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(AuthFlowError::Transport("no mock reply queued".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replies_are_served_in_order() {
        let service = MockAuthService::new()
            .with_json_reply(500, json!({"error": "boom"}))
            .with_transport_error("refused");
        let body = AuthRequestBody::default();

        let first = service.submit(AuthMode::Login, &body).await.unwrap();
        assert_eq!(first.status, 500);

        let second = service.submit(AuthMode::Signup, &body).await.unwrap_err();
        assert_eq!(second, AuthFlowError::Transport("refused".to_string()));

        assert!(service.submit(AuthMode::Login, &body).await.is_err());
        assert_eq!(service.call_count(), 3);
        assert_eq!(service.last_call().unwrap().mode, AuthMode::Login);
    }
}
