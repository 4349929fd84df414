//! Identity model - roles, Organization IDs and auth submissions
//!
//! Responsibilities:
//! - The three role variants and the fields each one requires
//! - Organization ID normalization (trim + upper-case)
//! - Pure validation of login/signup forms into wire payloads

pub mod organization_id;
pub mod role;
pub mod submission;
pub mod user;

pub use organization_id::OrganizationId;
pub use role::{AuthMode, MemberRole, OrganizationType, Role};
pub use submission::{
    validate_auth_submission, AuthForm, AuthPayload, AuthRequestBody, Credentials,
    OrganizationProfile, Password,
};
pub use user::{MemberProfile, OrganizerProfile, User};
