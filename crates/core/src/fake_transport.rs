//! In-memory [`Transport`] for unit testing session and batch logic.
//!
//! Replies are scripted per path and consumed in order; a path with no
//! remaining replies answers `404`. Every request is recorded together with
//! the cookie that was attached when it was sent.
//!
//! # Example
//!
//! ```ignore
//! let (transport, controller) = FakeTransportBuilder::new()
//!     .reply(LOGIN_PATH, FakeReply::ok(json!({})).with_cookie("unifises=abc"))
//!     .build();
//! let mut manager = SessionManager::new(transport);
//! manager.login(&creds).await;
//! let sent = controller.take_sent().await;
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::TransportError;
use crate::session::Session;
use crate::transport::{Response, Transport};

/// A scripted reply for one request.
#[derive(Debug, Clone)]
pub enum FakeReply {
	Ok {
		status: u16,
		body: Value,
		set_cookies: Vec<String>,
	},
	Status {
		status: u16,
		body: String,
	},
	Network(String),
	Timeout,
}

impl FakeReply {
	pub fn ok(body: Value) -> Self {
		FakeReply::Ok {
			status: 200,
			body,
			set_cookies: Vec::new(),
		}
	}

	pub fn status(status: u16, body: impl Into<String>) -> Self {
		FakeReply::Status { status, body: body.into() }
	}

	pub fn network(message: impl Into<String>) -> Self {
		FakeReply::Network(message.into())
	}

	/// Adds a `Set-Cookie` header to an `Ok` reply. No effect on other variants.
	pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
		if let FakeReply::Ok { set_cookies, .. } = &mut self {
			set_cookies.push(cookie.into());
		}
		self
	}
}

/// A request observed by the fake transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
	pub path: String,
	pub body: Option<Value>,
	pub cookie: Option<String>,
}

/// Builder for [`FakeTransport`] and its [`FakeTransportController`].
#[derive(Default)]
pub struct FakeTransportBuilder {
	replies: HashMap<String, VecDeque<FakeReply>>,
}

impl FakeTransportBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues `reply` for the next request to `path`.
	pub fn reply(mut self, path: impl Into<String>, reply: FakeReply) -> Self {
		self.replies.entry(path.into()).or_default().push_back(reply);
		self
	}

	pub fn build(self) -> (FakeTransport, FakeTransportController) {
		let sent = Arc::new(Mutex::new(Vec::new()));
		let transport = FakeTransport {
			replies: Mutex::new(self.replies),
			sent: Arc::clone(&sent),
			session: None,
		};
		(transport, FakeTransportController { sent })
	}
}

/// Handle for inspecting what a [`FakeTransport`] sent.
pub struct FakeTransportController {
	sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl FakeTransportController {
	/// Takes all sent requests, clearing the buffer.
	pub async fn take_sent(&self) -> Vec<SentRequest> {
		std::mem::take(&mut *self.sent.lock().await)
	}

	pub async fn sent_paths(&self) -> Vec<String> {
		self.sent.lock().await.iter().map(|r| r.path.clone()).collect()
	}
}

pub struct FakeTransport {
	replies: Mutex<HashMap<String, VecDeque<FakeReply>>>,
	sent: Arc<Mutex<Vec<SentRequest>>>,
	session: Option<Session>,
}

#[async_trait]
impl Transport for FakeTransport {
	fn attach_session(&mut self, session: Session) {
		self.session = Some(session);
	}

	fn clear_session(&mut self) {
		self.session = None;
	}

	fn session(&self) -> Option<&Session> {
		self.session.as_ref()
	}

	async fn post(&self, path: &str, body: Option<&Value>) -> Result<Response, TransportError> {
		self.sent.lock().await.push(SentRequest {
			path: path.to_string(),
			body: body.cloned(),
			cookie: self.session.as_ref().map(|s| s.cookie_header().to_string()),
		});

		let reply = self.replies.lock().await.get_mut(path).and_then(VecDeque::pop_front);

		match reply {
			Some(FakeReply::Ok { status, body, set_cookies }) => Ok(Response {
				status,
				body,
				set_cookies,
				csrf_token: None,
			}),
			Some(FakeReply::Status { status, body }) => Err(TransportError::Status {
				path: path.to_string(),
				status,
				body: Some(body),
			}),
			Some(FakeReply::Network(message)) => Err(TransportError::Network {
				path: path.to_string(),
				message,
			}),
			Some(FakeReply::Timeout) => Err(TransportError::Timeout { path: path.to_string() }),
			None => Err(TransportError::Status {
				path: path.to_string(),
				status: 404,
				body: None,
			}),
		}
	}
}
