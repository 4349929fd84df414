//! Auth flow - login/signup against the Auth Service
//!
//! Architecture (machine decides, collaborator executes):
//!   form → AuthFlow::begin (validate) → BaseAuthService::submit → AuthFlow::complete → SessionStore
//!
//! Responsibilities:
//! - Single in-flight submission per form
//! - Reply interpretation (content type, status, `user` object)
//! - Organizer-ID acknowledgment window before the session is published

pub mod clock;
pub mod flow;
pub mod response;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use flow::{AuthFlow, AuthFlowState, AuthOutcome, AuthRequest, PendingAck, DEFAULT_ACK_WINDOW};
pub use response::{interpret_reply, resolve_user, AuthSuccess};
pub use service::{AuthReply, BaseAuthService, HttpAuthService};
