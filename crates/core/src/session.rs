//! Controller session lifecycle: credentials, the session cookie, login and logout.
//!
//! Login and logout never fail past this module. A failed login leaves the
//! manager [`SessionState::Unauthenticated`] and later commands go out
//! without a cookie; a failed logout is logged and otherwise ignored.

use serde::Serialize;
use stakick_protocol::{LOGIN_PATH, LOGOUT_PATH, LoginRequest};
use tracing::{debug, info, warn};

use crate::error::{SessionError, TransportError};
use crate::transport::{Response, Transport};

/// Controller login credentials. Never logged.
#[derive(Clone)]
pub struct Credentials {
	username: String,
	password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	fn to_login_request(&self) -> LoginRequest {
		LoginRequest {
			username: self.username.clone(),
			password: self.password.clone(),
		}
	}
}

impl std::fmt::Debug for Credentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Opaque session credential returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
	cookie: String,
	csrf_token: Option<String>,
}

impl Session {
	pub fn new(cookie: impl Into<String>, csrf_token: Option<String>) -> Self {
		Self {
			cookie: cookie.into(),
			csrf_token,
		}
	}

	/// Builds a session from login response headers.
	///
	/// Keeps the `name=value` part of each `Set-Cookie` header, skipping
	/// cookies with an empty value, and joins them into a single `Cookie`
	/// header. Returns `None` when no usable cookie was set.
	pub fn from_response(response: &Response) -> Option<Self> {
		let pairs: Vec<&str> = response
			.set_cookies
			.iter()
			.filter_map(|raw| raw.split(';').next())
			.map(str::trim)
			.filter(|pair| pair.split_once('=').is_some_and(|(name, value)| !name.trim().is_empty() && !value.trim().is_empty()))
			.collect();

		if pairs.is_empty() {
			return None;
		}

		Some(Self::new(pairs.join("; "), response.csrf_token.clone()))
	}

	/// Value for the `Cookie` request header.
	pub fn cookie_header(&self) -> &str {
		&self.cookie
	}

	pub fn csrf_token(&self) -> Option<&str> {
		self.csrf_token.as_deref()
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("cookie", &"<redacted>")
			.field("has_csrf_token", &self.csrf_token.is_some())
			.finish()
	}
}

/// Authentication state of a [`SessionManager`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
	#[default]
	Unauthenticated,
	Authenticated,
}

/// Owns the transport and the lifetime of the session attached to it.
pub struct SessionManager<T: Transport> {
	transport: T,
	state: SessionState,
}

impl<T: Transport> SessionManager<T> {
	pub fn new(transport: T) -> Self {
		Self {
			transport,
			state: SessionState::Unauthenticated,
		}
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Logs in, attaching the session cookie to the transport on success.
	///
	/// Failures are logged and reported through the returned state only.
	pub async fn login(&mut self, credentials: &Credentials) -> SessionState {
		match self.try_login(credentials).await {
			Ok(()) => info!(target = "stakick.session", "logged in"),
			Err(err) => warn!(target = "stakick.session", error = %err, "login failed; continuing without a session"),
		}
		self.state
	}

	/// Login with the error surfaced, for callers that want to inspect it.
	pub async fn try_login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
		if self.state == SessionState::Authenticated {
			debug!(target = "stakick.session", "replacing existing session");
			self.transport.clear_session();
			self.state = SessionState::Unauthenticated;
		}

		let body = serde_json::to_value(credentials.to_login_request()).map_err(|e| TransportError::Decode {
			path: LOGIN_PATH.to_string(),
			message: e.to_string(),
		})?;
		let response = self.transport.post(LOGIN_PATH, Some(&body)).await?;

		let session = Session::from_response(&response).ok_or(SessionError::MissingCredential)?;
		self.transport.attach_session(session);
		self.state = SessionState::Authenticated;
		Ok(())
	}

	/// Logs out and clears the session. Returns `true` when the controller acknowledged it.
	///
	/// Always sends the request, whether or not login succeeded.
	pub async fn logout(&mut self) -> bool {
		let result = self.transport.post(LOGOUT_PATH, None).await;
		self.transport.clear_session();
		self.state = SessionState::Unauthenticated;

		match result {
			Ok(_) => {
				info!(target = "stakick.session", "logged out");
				true
			}
			Err(err) => {
				warn!(target = "stakick.session", error = %err, "logout failed");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::fake_transport::{FakeReply, FakeTransportBuilder};

	fn response_with_cookies(cookies: &[&str]) -> Response {
		Response {
			status: 200,
			set_cookies: cookies.iter().map(|c| c.to_string()).collect(),
			..Default::default()
		}
	}

	#[test]
	fn from_response_joins_cookie_pairs() {
		let resp = response_with_cookies(&["unifises=abc123; Path=/; HttpOnly", "csrf_token=xyz; Path=/; Secure"]);
		let session = Session::from_response(&resp).expect("session");
		assert_eq!(session.cookie_header(), "unifises=abc123; csrf_token=xyz");
	}

	#[test]
	fn from_response_skips_cleared_cookies() {
		let resp = response_with_cookies(&["unifises=; Max-Age=0", "TOKEN=eyJ; Path=/"]);
		let session = Session::from_response(&resp).expect("session");
		assert_eq!(session.cookie_header(), "TOKEN=eyJ");
	}

	#[test]
	fn from_response_without_cookies_is_none() {
		assert!(Session::from_response(&response_with_cookies(&[])).is_none());
		assert!(Session::from_response(&response_with_cookies(&["garbage"])).is_none());
	}

	#[test]
	fn from_response_keeps_csrf_token() {
		let mut resp = response_with_cookies(&["TOKEN=eyJ"]);
		resp.csrf_token = Some("csrf-1".into());
		let session = Session::from_response(&resp).expect("session");
		assert_eq!(session.csrf_token(), Some("csrf-1"));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let creds = Credentials::new("admin", "hunter2");
		let session = Session::new("unifises=topsecret", None);
		let rendered = format!("{creds:?} {session:?}");
		assert!(!rendered.contains("hunter2"));
		assert!(!rendered.contains("topsecret"));
	}

	#[tokio::test]
	async fn login_attaches_session_cookie() {
		let (transport, controller) = FakeTransportBuilder::new()
			.reply(LOGIN_PATH, FakeReply::ok(json!({ "meta": { "rc": "ok" } })).with_cookie("unifises=abc; Path=/"))
			.build();
		let mut manager = SessionManager::new(transport);

		let state = manager.login(&Credentials::new("admin", "pw")).await;

		assert_eq!(state, SessionState::Authenticated);
		assert_eq!(manager.transport().session().map(Session::cookie_header), Some("unifises=abc"));

		let sent = controller.take_sent().await;
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].path, LOGIN_PATH);
		assert_eq!(sent[0].body, Some(json!({ "username": "admin", "password": "pw" })));
		assert_eq!(sent[0].cookie, None);
	}

	#[derive(Clone, Default)]
	struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

	impl std::io::Write for CapturedLogs {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[tokio::test]
	async fn login_logs_never_include_credentials() {
		let logs = CapturedLogs::default();
		let writer = logs.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::TRACE)
			.with_ansi(false)
			.with_writer(move || writer.clone())
			.finish();
		let _guard = tracing::subscriber::set_default(subscriber);

		let (transport, _controller) = FakeTransportBuilder::new()
			.reply(LOGIN_PATH, FakeReply::ok(json!({ "meta": { "rc": "ok" } })).with_cookie("unifises=abc; Path=/"))
			.build();
		let mut manager = SessionManager::new(transport);
		let state = manager.login(&Credentials::new("netadmin", "s3cr3t-pass")).await;
		assert_eq!(state, SessionState::Authenticated);

		let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
		assert!(output.contains("logged in"), "logs: {output}");
		assert!(!output.contains("netadmin"), "logs: {output}");
		assert!(!output.contains("s3cr3t-pass"), "logs: {output}");
	}

	#[tokio::test]
	async fn login_failure_is_contained() {
		let (transport, _controller) = FakeTransportBuilder::new()
			.reply(LOGIN_PATH, FakeReply::status(400, r#"{"meta":{"rc":"error","msg":"api.err.Invalid"}}"#))
			.build();
		let mut manager = SessionManager::new(transport);

		let state = manager.login(&Credentials::new("admin", "wrong")).await;

		assert_eq!(state, SessionState::Unauthenticated);
		assert!(manager.transport().session().is_none());
	}

	#[tokio::test]
	async fn login_without_cookie_reports_missing_credential() {
		let (transport, _controller) = FakeTransportBuilder::new()
			.reply(LOGIN_PATH, FakeReply::ok(json!({ "meta": { "rc": "ok" } })))
			.build();
		let mut manager = SessionManager::new(transport);

		let err = manager.try_login(&Credentials::new("admin", "pw")).await.unwrap_err();

		assert!(matches!(err, SessionError::MissingCredential));
		assert_eq!(manager.state(), SessionState::Unauthenticated);
	}

	#[tokio::test]
	async fn logout_clears_session_even_on_failure() {
		let (transport, controller) = FakeTransportBuilder::new()
			.reply(LOGIN_PATH, FakeReply::ok(json!({})).with_cookie("unifises=abc"))
			.reply(LOGOUT_PATH, FakeReply::network("connection reset"))
			.build();
		let mut manager = SessionManager::new(transport);
		manager.login(&Credentials::new("admin", "pw")).await;

		let acknowledged = manager.logout().await;

		assert!(!acknowledged);
		assert_eq!(manager.state(), SessionState::Unauthenticated);
		assert!(manager.transport().session().is_none());

		let sent = controller.take_sent().await;
		assert_eq!(sent[1].path, LOGOUT_PATH);
		assert_eq!(sent[1].body, None);
		assert_eq!(sent[1].cookie.as_deref(), Some("unifises=abc"));
	}
}
