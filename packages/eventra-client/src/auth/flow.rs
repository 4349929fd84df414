//! Auth flow controller.
//!
//! ```text
//! Idle | Failed | Succeeded --begin--> Submitting
//! Submitting --reply ok--> Succeeded              (user published to the session)
//! Submitting --reply ok, organizer signup--> AwaitingAck
//! AwaitingAck --acknowledge | window elapsed--> Succeeded
//! Submitting --reply error | transport error--> Failed
//! ```
//!
//! A rejected validation leaves the state where it was and fills the message
//! slot. `begin` refuses while a submission is in flight or while an issued
//! Organization ID is waiting to be acknowledged, so a form can never have
//! two submissions outstanding.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::response::{interpret_reply, resolve_user};
use super::service::{AuthReply, BaseAuthService};
use crate::error::{AuthFlowError, ValidationError};
use crate::identity::{
    validate_auth_submission, AuthForm, AuthMode, AuthPayload, AuthRequestBody, OrganizationId,
    Role, User,
};
use crate::session::{DashboardView, SessionStore};

/// Default acknowledgment window for a freshly issued Organization ID.
pub const DEFAULT_ACK_WINDOW: std::time::Duration = std::time::Duration::from_secs(5);

/// Organizer signup that succeeded but has not been published yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAck {
    pub organizer_id: OrganizationId,
    pub user: User,
    pub message: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlowState {
    Idle,
    Submitting { mode: AuthMode, role: Role },
    AwaitingAck(PendingAck),
    Succeeded { message: String },
    Failed { error: AuthFlowError },
}

impl AuthFlowState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthFlowState::Idle => "idle",
            AuthFlowState::Submitting { .. } => "submitting",
            AuthFlowState::AwaitingAck(_) => "awaiting_ack",
            AuthFlowState::Succeeded { .. } => "succeeded",
            AuthFlowState::Failed { .. } => "failed",
        }
    }
}

/// Request handed to the Auth Service after `begin`.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub body: AuthRequestBody,
}

/// Result of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The user was published to the session store.
    SignedIn { view: DashboardView },
    /// Organizer signup: the ID must be acknowledged before publishing.
    AwaitingAck { organizer_id: OrganizationId },
}

pub struct AuthFlow {
    state: AuthFlowState,
    pending: Option<AuthPayload>,
    rejected: Option<ValidationError>,
    clock: Arc<dyn Clock>,
    ack_window: chrono::Duration,
}

impl AuthFlow {
    pub fn new(clock: Arc<dyn Clock>, ack_window: std::time::Duration) -> Self {
        Self {
            state: AuthFlowState::Idle,
            pending: None,
            rejected: None,
            clock,
            ack_window: chrono::Duration::from_std(ack_window)
                .unwrap_or_else(|_| chrono::Duration::seconds(5)),
        }
    }

    pub fn state(&self) -> &AuthFlowState {
        &self.state
    }

    /// Whether the form's submit control should be enabled.
    pub fn is_trigger_enabled(&self) -> bool {
        !matches!(
            self.state,
            AuthFlowState::Submitting { .. } | AuthFlowState::AwaitingAck(_)
        )
    }

    /// The Organization ID waiting to be acknowledged, if any.
    pub fn organizer_id(&self) -> Option<&OrganizationId> {
        match &self.state {
            AuthFlowState::AwaitingAck(pending) => Some(&pending.organizer_id),
            _ => None,
        }
    }

    /// Contents of the form's single message slot.
    pub fn message(&self) -> Option<String> {
        if let Some(rejected) = &self.rejected {
            return Some(rejected.to_string());
        }
        match &self.state {
            AuthFlowState::Failed { error } => Some(error.user_message()),
            AuthFlowState::AwaitingAck(pending) => Some(pending.message.clone()),
            AuthFlowState::Succeeded { message } => Some(message.clone()),
            AuthFlowState::Idle | AuthFlowState::Submitting { .. } => None,
        }
    }

    /// Reopen the auth surface. Ignored while a submission is in flight.
    pub fn reset(&mut self) -> bool {
        if matches!(self.state, AuthFlowState::Submitting { .. }) {
            return false;
        }
        self.state = AuthFlowState::Idle;
        self.pending = None;
        self.rejected = None;
        true
    }

    /// Validate the form and enter `Submitting`.
    pub fn begin(
        &mut self,
        mode: AuthMode,
        role: Role,
        form: &AuthForm,
    ) -> Result<AuthRequest, AuthFlowError> {
        match self.state {
            AuthFlowState::Submitting { .. } => return Err(AuthFlowError::SubmissionInFlight),
            AuthFlowState::AwaitingAck(_) => return Err(AuthFlowError::AwaitingAcknowledgment),
            _ => {}
        }

        self.rejected = None;
        let payload = match validate_auth_submission(mode, role, form) {
            Ok(payload) => payload,
            Err(e) => {
                info!(%mode, %role, field = %e.field(), "Auth submission rejected locally");
                self.rejected = Some(e.clone());
                return Err(e.into());
            }
        };

        let request = AuthRequest {
            mode,
            body: payload.to_request_body(),
        };
        self.pending = Some(payload);
        self.state = AuthFlowState::Submitting { mode, role };
        info!(%mode, %role, "Auth submission started");

        Ok(request)
    }

    /// Resolve the in-flight submission with the service's reply.
    pub fn complete(
        &mut self,
        reply: Result<AuthReply, AuthFlowError>,
        session: &mut SessionStore,
    ) -> Result<AuthOutcome, AuthFlowError> {
        let Some(payload) = self.pending.take() else {
            warn!(state = self.state.name(), "Auth reply arrived with nothing in flight");
            return Err(AuthFlowError::Transport(
                "Reply received without a pending submission".to_string(),
            ));
        };

        let resolved = reply
            .and_then(|reply| interpret_reply(&reply))
            .and_then(|success| {
                resolve_user(&payload, &success).map(|user| (success.message, user))
            });

        let (message, user) = match resolved {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(mode = %payload.mode(), role = %payload.role(), error = %error, "Auth submission failed");
                self.state = AuthFlowState::Failed {
                    error: error.clone(),
                };
                return Err(error);
            }
        };

        if payload.is_organizer_signup() {
            let organizer_id = user.organization_id().clone();
            let deadline = self.clock.now() + self.ack_window;
            info!(%organizer_id, %deadline, "Organization ID issued, awaiting acknowledgment");
            self.state = AuthFlowState::AwaitingAck(PendingAck {
                organizer_id: organizer_id.clone(),
                user,
                message: message.unwrap_or_else(|| "Organization registered".to_string()),
                deadline,
            });
            return Ok(AuthOutcome::AwaitingAck { organizer_id });
        }

        let message = message.unwrap_or_else(|| "Success!".to_string());
        Ok(self.publish(user, message, session))
    }

    /// User acknowledged the issued Organization ID.
    pub fn acknowledge(&mut self, session: &mut SessionStore) -> Option<AuthOutcome> {
        self.publish_pending(session)
    }

    /// Publish the pending organizer once the acknowledgment window elapsed.
    pub fn poll(&mut self, session: &mut SessionStore) -> Option<AuthOutcome> {
        let now = self.clock.now();
        let due = matches!(&self.state, AuthFlowState::AwaitingAck(pending) if now >= pending.deadline);
        if due {
            self.publish_pending(session)
        } else {
            None
        }
    }

    /// Time left before the pending organizer is published.
    pub fn ack_remaining(&self) -> Option<chrono::Duration> {
        match &self.state {
            AuthFlowState::AwaitingAck(pending) => {
                Some((pending.deadline - self.clock.now()).max(chrono::Duration::zero()))
            }
            _ => None,
        }
    }

    /// Validate, post and resolve in one call.
    pub async fn submit<S>(
        &mut self,
        service: &S,
        mode: AuthMode,
        role: Role,
        form: &AuthForm,
        session: &mut SessionStore,
    ) -> Result<AuthOutcome, AuthFlowError>
    where
        S: BaseAuthService + ?Sized,
    {
        let request = self.begin(mode, role, form)?;
        let reply = service.submit(request.mode, &request.body).await;
        self.complete(reply, session)
    }

    fn publish_pending(&mut self, session: &mut SessionStore) -> Option<AuthOutcome> {
        let state = std::mem::replace(&mut self.state, AuthFlowState::Idle);
        match state {
            AuthFlowState::AwaitingAck(pending) => {
                Some(self.publish(pending.user, pending.message, session))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    fn publish(&mut self, user: User, message: String, session: &mut SessionStore) -> AuthOutcome {
        let role = user.role();
        if let Err(e) = session.login(user) {
            warn!(error = %e, "Session persisted in memory only");
        }
        info!(%role, "User signed in");
        self.state = AuthFlowState::Succeeded { message };
        AuthOutcome::SignedIn {
            view: session.view(),
        }
    }
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_ACK_WINDOW)
    }
}
