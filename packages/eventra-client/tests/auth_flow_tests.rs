//! End-to-end auth flow against a fake Auth Service over HTTP.
//!
//! Covers:
//! - Login rejection surfaces the server message and leaves the session empty
//! - Organizer signup holds the session until the acknowledgment window ends
//! - Non-JSON replies and unreachable services fail the submission
//! - A persisted session hydrates into a fresh store

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::{FakeAuthService, ScriptedReply};
use eventra_client::auth::{AuthFlow, AuthOutcome, HttpAuthService, ManualClock};
use eventra_client::identity::{AuthForm, AuthMode, OrganizationId, Role, User};
use eventra_client::session::{DashboardView, FileKeyValueStore, SessionStore};
use eventra_client::AuthFlowError;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
}

fn flow(clock: &ManualClock) -> AuthFlow {
    AuthFlow::new(Arc::new(clock.clone()), Duration::from_secs(5))
}

fn http(fake: &FakeAuthService) -> HttpAuthService {
    HttpAuthService::new(fake.base_url(), Duration::from_secs(5)).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn student_login_rejected_with_server_message() {
    let fake = FakeAuthService::start().await;
    fake.reply_with(ScriptedReply::json(401, json!({"message": "Invalid organization ID"})));

    let clock = clock();
    let mut flow = flow(&clock);
    let mut session = SessionStore::new();
    let form = AuthForm {
        email: "a@b.edu".to_string(),
        password: "x".to_string(),
        organization_id: " uni-abc123-4567 ".to_string(),
        ..AuthForm::default()
    };

    let err = flow
        .submit(&http(&fake), AuthMode::Login, Role::Student, &form, &mut session)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthFlowError::AuthService {
            status: Some(401),
            message: "Invalid organization ID".to_string()
        }
    );
    assert_eq!(flow.message().as_deref(), Some("Invalid organization ID"));
    assert!(session.current_user().is_none());
    assert_eq!(session.view(), DashboardView::Landing);

    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/api/auth/login");
    assert_eq!(received[0].body["organizationId"], "UNI-ABC123-4567");
    assert_eq!(received[0].body["role"], "student");
    assert_eq!(received[0].body["email"], "a@b.edu");
}

#[tokio::test]
async fn organizer_signup_publishes_after_ack_window() {
    let fake = FakeAuthService::start().await;
    fake.reply_with(ScriptedReply::json(
        201,
        json!({
            "message": "Organization registered successfully",
            "user": {"_id": "64f0", "email": "org@tech.edu", "organizerId": "TEC-9F2A-1100"},
            "token": "jwt"
        }),
    ));

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileKeyValueStore::new(dir.path()));
    let clock = clock();
    let mut flow = flow(&clock);
    let mut session = SessionStore::with_persistence(store.clone());
    let form = AuthForm {
        email: "org@tech.edu".to_string(),
        password: "pw".to_string(),
        full_name: "Grace Hopper".to_string(),
        organization_name: "Tech University".to_string(),
        city: Some("Arlington".to_string()),
        ..AuthForm::default()
    };

    let outcome = flow
        .submit(&http(&fake), AuthMode::Signup, Role::Organizer, &form, &mut session)
        .await
        .unwrap();

    let issued = OrganizationId::parse("TEC-9F2A-1100").unwrap();
    assert_eq!(
        outcome,
        AuthOutcome::AwaitingAck {
            organizer_id: issued.clone()
        }
    );
    assert_eq!(flow.organizer_id(), Some(&issued));
    assert!(session.current_user().is_none());

    let body = &fake.received()[0].body;
    assert_eq!(body["organizationName"], "Tech University");
    assert_eq!(body["organizationType"], "school");
    assert_eq!(body["city"], "Arlington");
    assert!(body.get("organizationId").is_none());
    assert!(body.get("phone").is_none());

    clock.advance(chrono::Duration::seconds(5));
    let published = flow.poll(&mut session).unwrap();
    assert_eq!(
        published,
        AuthOutcome::SignedIn {
            view: DashboardView::Organizer
        }
    );

    // A new process picks the organizer back up from disk
    let mut restarted = SessionStore::with_persistence(store);
    let user = restarted.hydrate().unwrap().cloned().unwrap();
    match user {
        User::Organizer(profile) => {
            assert_eq!(profile.organizer_id, issued);
            assert_eq!(profile.organization_name.as_deref(), Some("Tech University"));
            assert_eq!(profile.id.as_deref(), Some("64f0"));
        }
        other => panic!("expected organizer, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_reply_is_a_transport_failure() {
    let fake = FakeAuthService::start().await;
    fake.reply_with(ScriptedReply::html(502, "<html>Bad Gateway</html>"));

    let clock = clock();
    let mut flow = flow(&clock);
    let mut session = SessionStore::new();
    let form = AuthForm {
        email: "f@b.edu".to_string(),
        password: "x".to_string(),
        organization_id: "UNI-1".to_string(),
        ..AuthForm::default()
    };

    let err = flow
        .submit(&http(&fake), AuthMode::Login, Role::Faculty, &form, &mut session)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthFlowError::Transport(_)));
    assert!(flow
        .message()
        .unwrap()
        .starts_with("Network error: Server returned invalid content type"));
    assert!(flow.is_trigger_enabled());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn unreachable_service_fails_and_allows_retry() {
    // Grab a free port, then close it
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let service = HttpAuthService::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();

    let clock = clock();
    let mut flow = flow(&clock);
    let mut session = SessionStore::new();
    let form = AuthForm {
        email: "a@b.edu".to_string(),
        password: "x".to_string(),
        organization_id: "UNI-1".to_string(),
        ..AuthForm::default()
    };

    let err = flow
        .submit(&service, AuthMode::Login, Role::Student, &form, &mut session)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthFlowError::Transport(_)));
    assert_eq!(flow.state().name(), "failed");
    assert!(flow.begin(AuthMode::Login, Role::Student, &form).is_ok());
}
