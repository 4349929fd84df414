//! Auth submissions: raw form input in, role-specific payload out.
//!
//! `validate_auth_submission` is a pure validating constructor. A fresh
//! [`AuthForm`] is built per submission and either becomes an [`AuthPayload`]
//! or yields the first unmet requirement. Requirements are checked in a fixed
//! order (identity fields first, organization-scoped fields last) because the
//! order decides which single message the user sees.

use std::fmt;

use serde::{Serialize, Serializer};

use super::organization_id::OrganizationId;
use super::role::{AuthMode, MemberRole, OrganizationType, Role};
use crate::error::{Field, ValidationError};

/// Opaque password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Raw auth form input as typed by the user.
///
/// Organizer profile fields are `Option`s: `None` means "not provided", and a
/// provided value is passed through verbatim.
#[derive(Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub organization_id: String,
    pub organization_name: String,
    pub organization_type: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub description: Option<String>,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("organization_id", &self.organization_id)
            .field("organization_name", &self.organization_name)
            .field("organization_type", &self.organization_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: Password,
}

/// Organizer signup profile. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationProfile {
    pub name: String,
    pub organization_type: OrganizationType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub description: Option<String>,
}

/// A validated, normalized auth submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPayload {
    /// Every role re-asserts its organization context at login.
    Login {
        role: Role,
        credentials: Credentials,
        organization_id: OrganizationId,
    },
    MemberSignup {
        role: MemberRole,
        credentials: Credentials,
        full_name: String,
        organization_id: OrganizationId,
    },
    OrganizerSignup {
        credentials: Credentials,
        full_name: String,
        organization: OrganizationProfile,
    },
}

impl AuthPayload {
    pub fn mode(&self) -> AuthMode {
        match self {
            AuthPayload::Login { .. } => AuthMode::Login,
            AuthPayload::MemberSignup { .. } | AuthPayload::OrganizerSignup { .. } => {
                AuthMode::Signup
            }
        }
    }

    pub fn role(&self) -> Role {
        match self {
            AuthPayload::Login { role, .. } => *role,
            AuthPayload::MemberSignup { role, .. } => (*role).into(),
            AuthPayload::OrganizerSignup { .. } => Role::Organizer,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        match self {
            AuthPayload::Login { credentials, .. }
            | AuthPayload::MemberSignup { credentials, .. }
            | AuthPayload::OrganizerSignup { credentials, .. } => credentials,
        }
    }

    /// Organization ID asserted by the submission, if the contract carries one.
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        match self {
            AuthPayload::Login {
                organization_id, ..
            }
            | AuthPayload::MemberSignup {
                organization_id, ..
            } => Some(organization_id),
            AuthPayload::OrganizerSignup { .. } => None,
        }
    }

    pub fn full_name(&self) -> Option<&str> {
        match self {
            AuthPayload::Login { .. } => None,
            AuthPayload::MemberSignup { full_name, .. }
            | AuthPayload::OrganizerSignup { full_name, .. } => Some(full_name),
        }
    }

    /// True for the one contract whose success mints an Organization ID.
    pub fn is_organizer_signup(&self) -> bool {
        matches!(self, AuthPayload::OrganizerSignup { .. })
    }

    /// JSON body sent to the Auth Service.
    pub fn to_request_body(&self) -> AuthRequestBody {
        let credentials = self.credentials();
        let mut body = AuthRequestBody {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            role: self.role(),
            full_name: self.full_name().map(str::to_string),
            organization_id: self.organization_id().cloned(),
            ..AuthRequestBody::default()
        };

        if let AuthPayload::OrganizerSignup { organization, .. } = self {
            body.organization_name = Some(organization.name.clone());
            body.organization_type = Some(organization.organization_type);
            body.phone = organization.phone.clone();
            body.address = organization.address.clone();
            body.city = organization.city.clone();
            body.state = organization.state.clone();
            body.zip_code = organization.zip_code.clone();
            body.description = organization.description.clone();
        }

        body
    }
}

/// Wire body for `POST /api/auth/{login|signup}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequestBody {
    pub email: String,
    pub password: Password,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<OrganizationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for AuthRequestBody {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: Password::new(""),
            role: Role::Student,
            full_name: None,
            organization_id: None,
            organization_name: None,
            organization_type: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            description: None,
        }
    }
}

/// Validate and normalize an auth form for the given mode and role.
pub fn validate_auth_submission(
    mode: AuthMode,
    role: Role,
    form: &AuthForm,
) -> Result<AuthPayload, ValidationError> {
    let credentials = credentials(form)?;

    match mode {
        AuthMode::Login => Ok(AuthPayload::Login {
            role,
            credentials,
            organization_id: OrganizationId::parse(&form.organization_id)?,
        }),
        AuthMode::Signup => {
            let full_name = required(&form.full_name, Field::FullName)?;
            match MemberRole::try_from(role) {
                Ok(member_role) => Ok(AuthPayload::MemberSignup {
                    role: member_role,
                    credentials,
                    full_name,
                    organization_id: OrganizationId::parse(&form.organization_id)?,
                }),
                Err(_) => Ok(AuthPayload::OrganizerSignup {
                    credentials,
                    full_name,
                    organization: organization_profile(form)?,
                }),
            }
        }
    }
}

fn credentials(form: &AuthForm) -> Result<Credentials, ValidationError> {
    let email = required(&form.email, Field::Email)?;
    if form.password.is_empty() {
        return Err(ValidationError::MissingField(Field::Password));
    }
    Ok(Credentials {
        email,
        password: Password::new(form.password.clone()),
    })
}

fn organization_profile(form: &AuthForm) -> Result<OrganizationProfile, ValidationError> {
    let name = required(&form.organization_name, Field::OrganizationName)?;
    let organization_type = match form.organization_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse()?,
        _ => OrganizationType::default(),
    };

    Ok(OrganizationProfile {
        name,
        organization_type,
        phone: form.phone.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        zip_code: form.zip_code.clone(),
        description: form.description.clone(),
    })
}

fn required(raw: &str, field: Field) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> AuthForm {
        AuthForm {
            email: "a@b.edu".to_string(),
            password: "x".to_string(),
            organization_id: " uni-abc123-4567 ".to_string(),
            ..AuthForm::default()
        }
    }

    fn missing(mode: AuthMode, role: Role, form: &AuthForm) -> Field {
        match validate_auth_submission(mode, role, form) {
            Err(ValidationError::MissingField(field)) => field,
            other => panic!("expected a missing field, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_login_reports_email_first_for_every_role() {
        for role in Role::variants() {
            assert_eq!(missing(AuthMode::Login, *role, &AuthForm::default()), Field::Email);
        }
    }

    #[test]
    fn test_login_reports_organization_id_after_credentials() {
        let form = AuthForm {
            email: "a@b.edu".to_string(),
            password: "x".to_string(),
            ..AuthForm::default()
        };
        for role in Role::variants() {
            assert_eq!(missing(AuthMode::Login, *role, &form), Field::OrganizationId);
        }
    }

    #[test]
    fn test_login_reports_password_before_organization_id() {
        let form = AuthForm {
            email: "a@b.edu".to_string(),
            ..AuthForm::default()
        };
        assert_eq!(missing(AuthMode::Login, Role::Student, &form), Field::Password);
    }

    #[test]
    fn test_login_normalizes_organization_id() {
        let payload = validate_auth_submission(AuthMode::Login, Role::Student, &login_form()).unwrap();
        assert_eq!(payload.organization_id().unwrap().as_str(), "UNI-ABC123-4567");
        assert_eq!(payload.mode(), AuthMode::Login);
        assert_eq!(payload.role(), Role::Student);
    }

    #[test]
    fn test_organizer_login_still_requires_organization_id() {
        let form = AuthForm {
            organization_id: String::new(),
            ..login_form()
        };
        assert_eq!(missing(AuthMode::Login, Role::Organizer, &form), Field::OrganizationId);
    }

    #[test]
    fn test_member_signup_checks_full_name_before_organization_id() {
        let form = AuthForm {
            email: "f@b.edu".to_string(),
            password: "pw".to_string(),
            ..AuthForm::default()
        };
        assert_eq!(missing(AuthMode::Signup, Role::Faculty, &form), Field::FullName);

        let form = AuthForm {
            full_name: "Ada Lovelace".to_string(),
            ..form
        };
        assert_eq!(missing(AuthMode::Signup, Role::Faculty, &form), Field::OrganizationId);
    }

    #[test]
    fn test_organizer_signup_requires_organization_name_not_id() {
        let form = AuthForm {
            email: "org@b.edu".to_string(),
            password: "pw".to_string(),
            full_name: "Grace Hopper".to_string(),
            ..AuthForm::default()
        };
        assert_eq!(
            missing(AuthMode::Signup, Role::Organizer, &form),
            Field::OrganizationName
        );

        let form = AuthForm {
            organization_name: "Tech University".to_string(),
            ..form
        };
        let payload = validate_auth_submission(AuthMode::Signup, Role::Organizer, &form).unwrap();
        assert!(payload.is_organizer_signup());
        assert!(payload.organization_id().is_none());
    }

    #[test]
    fn test_organizer_signup_passes_optional_fields_verbatim() {
        let form = AuthForm {
            email: "org@b.edu".to_string(),
            password: "pw".to_string(),
            full_name: "Grace Hopper".to_string(),
            organization_name: "Tech University".to_string(),
            organization_type: Some("university".to_string()),
            city: Some("  Springfield ".to_string()),
            ..AuthForm::default()
        };
        let body = validate_auth_submission(AuthMode::Signup, Role::Organizer, &form)
            .unwrap()
            .to_request_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["role"], "organizer");
        assert_eq!(json["organizationType"], "university");
        assert_eq!(json["city"], "  Springfield ");
        assert!(json.get("phone").is_none());
        assert!(json.get("organizationId").is_none());
    }

    #[test]
    fn test_organizer_signup_rejects_unknown_organization_type() {
        let form = AuthForm {
            email: "org@b.edu".to_string(),
            password: "pw".to_string(),
            full_name: "Grace Hopper".to_string(),
            organization_name: "Tech University".to_string(),
            organization_type: Some("agency".to_string()),
            ..AuthForm::default()
        };
        let err = validate_auth_submission(AuthMode::Signup, Role::Organizer, &form).unwrap_err();
        assert_eq!(err.field(), Field::OrganizationType);
    }

    #[test]
    fn test_login_body_shape() {
        let body = validate_auth_submission(AuthMode::Login, Role::Faculty, &login_form())
            .unwrap()
            .to_request_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "email": "a@b.edu",
                "password": "x",
                "role": "faculty",
                "organizationId": "UNI-ABC123-4567",
            })
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let payload = validate_auth_submission(AuthMode::Login, Role::Student, &login_form()).unwrap();
        let debug = format!("{:?}", payload.to_request_body());
        assert!(!debug.contains("\"x\""));
        assert!(debug.contains("<redacted>"));
    }
}
