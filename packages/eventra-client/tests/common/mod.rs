// Common test utilities
//
// A fake Auth Service served by axum on an ephemeral local port. Replies are
// scripted in order; every request body is recorded with its path.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ScriptedReply {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

impl ScriptedReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "application/json; charset=utf-8".to_string(),
            body: body.to_string(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "text/html".to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

pub struct FakeAuthService {
    pub addr: SocketAddr,
    state: FakeState,
    handle: JoinHandle<()>,
}

impl FakeAuthService {
    /// Bind to 127.0.0.1:0 and serve the login/signup routes.
    pub async fn start() -> Self {
        let state = FakeState::default();
        let app = Router::new()
            .route("/api/auth/login", post(handle))
            .route("/api/auth/signup", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn reply_with(&self, reply: ScriptedReply) -> &Self {
        self.state.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }
}

impl Drop for FakeAuthService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(State(state): State<FakeState>, uri: Uri, body: Bytes) -> Response {
    state.received.lock().unwrap().push(ReceivedRequest {
        path: uri.path().to_string(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let reply = state.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => (
            reply.status,
            [(header::CONTENT_TYPE, reply.content_type)],
            reply.body,
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no scripted reply").into_response(),
    }
}
