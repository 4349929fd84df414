use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};

/// Account role. Decides the required fields and the post-login dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Organizer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Organizer => "organizer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Organizer => "Organizer",
        }
    }

    pub fn variants() -> &'static [Role] {
        &[Role::Student, Role::Faculty, Role::Organizer]
    }

    /// Organizers and faculty may author events; students may not.
    pub fn can_author_events(&self) -> bool {
        matches!(self, Role::Faculty | Role::Organizer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "organizer" => Ok(Role::Organizer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Roles that join an existing organization by its Organization ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Student,
    Faculty,
}

impl From<MemberRole> for Role {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Student => Role::Student,
            MemberRole::Faculty => Role::Faculty,
        }
    }
}

impl TryFrom<Role> for MemberRole {
    type Error = Role;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Student => Ok(MemberRole::Student),
            Role::Faculty => Ok(MemberRole::Faculty),
            Role::Organizer => Err(role),
        }
    }
}

/// Which auth contract a submission follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }

    /// Auth Service endpoint path for this mode.
    pub fn path(&self) -> &'static str {
        match self {
            AuthMode::Login => "/api/auth/login",
            AuthMode::Signup => "/api/auth/signup",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" => Ok(AuthMode::Login),
            "signup" => Ok(AuthMode::Signup),
            other => Err(format!("unknown auth mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    #[default]
    School,
    College,
    University,
    Private,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::School => "school",
            OrganizationType::College => "college",
            OrganizationType::University => "university",
            OrganizationType::Private => "private",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrganizationType::School => "School",
            OrganizationType::College => "College",
            OrganizationType::University => "University",
            OrganizationType::Private => "Private Organizer",
        }
    }
}

impl FromStr for OrganizationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "school" => Ok(OrganizationType::School),
            "college" => Ok(OrganizationType::College),
            "university" => Ok(OrganizationType::University),
            "private" => Ok(OrganizationType::Private),
            other => Err(ValidationError::invalid(
                Field::OrganizationType,
                format!("expected school, college, university or private, got {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("Faculty".parse::<Role>().unwrap(), Role::Faculty);
        assert_eq!(" organizer ".parse::<Role>().unwrap(), Role::Organizer);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_member_role_excludes_organizer() {
        assert_eq!(MemberRole::try_from(Role::Student), Ok(MemberRole::Student));
        assert_eq!(MemberRole::try_from(Role::Organizer), Err(Role::Organizer));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Faculty).unwrap(), "\"faculty\"");
    }

    #[test]
    fn test_organization_type_rejects_unknown() {
        let err = "agency".parse::<OrganizationType>().unwrap_err();
        assert_eq!(err.field(), Field::OrganizationType);
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(AuthMode::Login.path(), "/api/auth/login");
        assert_eq!(AuthMode::Signup.path(), "/api/auth/signup");
    }
}
