use serde::{Deserialize, Serialize};

use super::organization_id::OrganizationId;
use super::role::{OrganizationType, Role};

/// An authenticated account, tagged by role.
///
/// Students and faculty always reference exactly one organizer through
/// `organization_id`. An organizer always carries the `organizer_id` issued by
/// the Auth Service; the client never mints one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Student(MemberProfile),
    Faculty(MemberProfile),
    Organizer(OrganizerProfile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub organization_id: OrganizationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<OrganizationType>,
    pub organizer_id: OrganizationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        match self {
            User::Student(_) => Role::Student,
            User::Faculty(_) => Role::Faculty,
            User::Organizer(_) => Role::Organizer,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            User::Student(profile) | User::Faculty(profile) => &profile.email,
            User::Organizer(profile) => &profile.email,
        }
    }

    /// Name shown in the dashboard header.
    pub fn display_name(&self) -> &str {
        match self {
            User::Student(profile) | User::Faculty(profile) => {
                profile.full_name.as_deref().unwrap_or(&profile.email)
            }
            User::Organizer(profile) => profile
                .organization_name
                .as_deref()
                .or(profile.full_name.as_deref())
                .unwrap_or(&profile.email),
        }
    }

    /// The organization this account belongs to, or owns for organizers.
    pub fn organization_id(&self) -> &OrganizationId {
        match self {
            User::Student(profile) | User::Faculty(profile) => &profile.organization_id,
            User::Organizer(profile) => &profile.organizer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User::Student(MemberProfile {
            id: Some("u-1".to_string()),
            email: "a@b.edu".to_string(),
            full_name: Some("Alan Turing".to_string()),
            organization_id: OrganizationId::parse("UNI-1").unwrap(),
        })
    }

    #[test]
    fn test_serialized_user_carries_role_tag() {
        let json = serde_json::to_value(student()).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["organizationId"], "UNI-1");
        assert_eq!(json["fullName"], "Alan Turing");
    }

    #[test]
    fn test_user_json_roundtrip_keeps_variant() {
        let json = serde_json::to_string(&student()).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, student());
        assert_eq!(parsed.role(), Role::Student);
    }

    #[test]
    fn test_organizer_display_name_prefers_organization() {
        let organizer = User::Organizer(OrganizerProfile {
            id: None,
            email: "org@b.edu".to_string(),
            full_name: Some("Grace Hopper".to_string()),
            organization_name: Some("Tech University".to_string()),
            organization_type: Some(OrganizationType::University),
            organizer_id: OrganizationId::parse("uni-abc123-4567").unwrap(),
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            description: None,
        });
        assert_eq!(organizer.display_name(), "Tech University");
        assert_eq!(organizer.organization_id().as_str(), "UNI-ABC123-4567");
    }
}
