//! Interpretation of Auth Service replies.
//!
//! Any status with a non-JSON content type is a protocol violation. A non-2xx
//! JSON reply surfaces `message`, then `error`, then a status-coded fallback.
//! A 2xx reply must carry a `user` object; the client's selected role, not the
//! reply, decides which `User` variant it becomes.

use serde_json::Value;

use super::service::AuthReply;
use crate::error::AuthFlowError;
use crate::identity::{
    AuthPayload, MemberProfile, OrganizationId, OrganizationType, OrganizerProfile, Role, User,
};

/// A 2xx reply that passed protocol checks.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSuccess {
    pub message: Option<String>,
    pub user: Value,
    pub token: Option<String>,
}

pub fn interpret_reply(reply: &AuthReply) -> Result<AuthSuccess, AuthFlowError> {
    let is_json = reply
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    if !is_json {
        return Err(AuthFlowError::Transport(format!(
            "Server returned invalid content type: {}",
            reply.content_type.as_deref().unwrap_or("none")
        )));
    }

    let body: Value = serde_json::from_str(&reply.body)
        .map_err(|e| AuthFlowError::Transport(format!("Invalid JSON response: {e}")))?;

    if !(200..300).contains(&reply.status) {
        let message = text_field(&body, "message")
            .or_else(|| text_field(&body, "error"))
            .unwrap_or_else(|| format!("Server Error: {}", reply.status));
        return Err(AuthFlowError::AuthService {
            status: Some(reply.status),
            message,
        });
    }

    let user = match body.get("user") {
        Some(user @ Value::Object(_)) => user.clone(),
        _ => {
            return Err(AuthFlowError::AuthService {
                status: Some(reply.status),
                message: "Server response is missing user details".to_string(),
            })
        }
    };

    Ok(AuthSuccess {
        message: text_field(&body, "message"),
        user,
        token: text_field(&body, "token"),
    })
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Loose view of the reply's `user` object. Unknown keys are ignored and
/// scalar fields of the wrong JSON type read as absent or as their text form.
#[derive(Debug, Default)]
struct ReplyUser {
    id: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    organization_id: Option<String>,
    organizer_id: Option<String>,
    organization_name: Option<String>,
    organization_type: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    description: Option<String>,
}

impl ReplyUser {
    fn read(user: &Value) -> Self {
        let text = |key: &str| user.get(key).and_then(scalar_text);
        Self {
            // `id` wins when the service sends both keys
            id: text("id").or_else(|| text("_id")),
            email: text("email"),
            full_name: text("fullName"),
            organization_id: text("organizationId"),
            organizer_id: text("organizerId"),
            organization_name: text("organizationName"),
            organization_type: text("organizationType"),
            phone: text("phone"),
            address: text("address"),
            city: text("city"),
            state: text("state"),
            zip_code: text("zipCode"),
            description: text("description"),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build the session `User` from a successful reply, tagged with the
/// submitted role. Missing reply fields fall back to what was submitted,
/// except an organizer signup's `organizerId`, which only the service can mint.
pub fn resolve_user(payload: &AuthPayload, success: &AuthSuccess) -> Result<User, AuthFlowError> {
    let reply = ReplyUser::read(&success.user);

    let id = reply.id.clone();
    let email = reply
        .email
        .clone()
        .unwrap_or_else(|| payload.credentials().email.clone());
    let full_name = reply
        .full_name
        .clone()
        .or_else(|| payload.full_name().map(str::to_string));

    let replied_id = |raw: &Option<String>| raw.as_deref().and_then(|s| OrganizationId::parse(s).ok());

    match payload.role() {
        role @ (Role::Student | Role::Faculty) => {
            let organization_id = replied_id(&reply.organization_id)
                .or_else(|| replied_id(&reply.organizer_id))
                .or_else(|| payload.organization_id().cloned())
                .ok_or_else(|| malformed("Server response is missing the Organization ID"))?;
            let profile = MemberProfile {
                id,
                email,
                full_name,
                organization_id,
            };
            Ok(if role == Role::Student {
                User::Student(profile)
            } else {
                User::Faculty(profile)
            })
        }
        Role::Organizer => {
            let minted = replied_id(&reply.organizer_id).or_else(|| replied_id(&reply.organization_id));
            let organizer_id = if payload.is_organizer_signup() {
                minted.ok_or_else(|| malformed("Server did not issue an Organization ID"))?
            } else {
                minted
                    .or_else(|| payload.organization_id().cloned())
                    .ok_or_else(|| malformed("Server response is missing the Organization ID"))?
            };

            let submitted = match payload {
                AuthPayload::OrganizerSignup { organization, .. } => Some(organization),
                _ => None,
            };

            Ok(User::Organizer(OrganizerProfile {
                id,
                email,
                full_name,
                organization_name: reply
                    .organization_name
                    .or_else(|| submitted.map(|o| o.name.clone())),
                organization_type: reply
                    .organization_type
                    .and_then(|raw| raw.parse::<OrganizationType>().ok())
                    .or_else(|| submitted.map(|o| o.organization_type)),
                organizer_id,
                phone: reply.phone.or_else(|| submitted.and_then(|o| o.phone.clone())),
                address: reply.address.or_else(|| submitted.and_then(|o| o.address.clone())),
                city: reply.city.or_else(|| submitted.and_then(|o| o.city.clone())),
                state: reply.state.or_else(|| submitted.and_then(|o| o.state.clone())),
                zip_code: reply.zip_code.or_else(|| submitted.and_then(|o| o.zip_code.clone())),
                description: reply
                    .description
                    .or_else(|| submitted.and_then(|o| o.description.clone())),
            }))
        }
    }
}

fn malformed(message: &str) -> AuthFlowError {
    AuthFlowError::AuthService {
        status: None,
        message: message.to_string(),
    }
}
