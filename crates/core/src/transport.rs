//! HTTP transport bound to a controller base address.
//!
//! [`HttpTransport`] sends JSON POSTs and attaches the session cookie once
//! [`Transport::attach_session`] has been called. The [`Transport`] trait is
//! the seam the session manager and batch executor are written against, so
//! they can be driven by [`FakeTransport`](crate::fake_transport) in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::TransportError;
use crate::session::Session;

/// Header carrying the CSRF token issued by UniFi OS consoles.
pub const CSRF_HEADER: &str = "x-csrf-token";

const USER_AGENT: &str = concat!("stakick/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
	pub base_url: Url,
	/// Trust self-signed and otherwise invalid certificates.
	pub insecure_skip_verify: bool,
	/// Per-request timeout. `None` leaves the HTTP client default in place.
	pub timeout: Option<Duration>,
	pub user_agent: String,
}

impl TransportConfig {
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			insecure_skip_verify: false,
			timeout: None,
			user_agent: USER_AGENT.to_string(),
		}
	}

	pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
		self.insecure_skip_verify = insecure;
		self
	}

	pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;
		self
	}
}

/// A successful (2xx) controller response.
#[derive(Debug, Clone, Default)]
pub struct Response {
	pub status: u16,
	/// Parsed JSON body; non-JSON text is kept as a string, an empty body is `Null`.
	pub body: Value,
	/// Raw `Set-Cookie` header values, in the order received.
	pub set_cookies: Vec<String>,
	pub csrf_token: Option<String>,
}

/// Request/response channel to the controller.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Stores `session` for all subsequent requests, replacing any prior value.
	fn attach_session(&mut self, session: Session);

	/// Drops the stored session.
	fn clear_session(&mut self);

	fn session(&self) -> Option<&Session>;

	/// POSTs `body` (or an empty body) to `path`.
	///
	/// Non-2xx responses are returned as [`TransportError::Status`].
	async fn post(&self, path: &str, body: Option<&Value>) -> Result<Response, TransportError>;
}

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
	config: TransportConfig,
	http: reqwest::Client,
	session: Option<Session>,
}

impl HttpTransport {
	/// Creates a transport for `base_url`, optionally trusting self-signed certificates.
	pub fn configure(base_url: Url, insecure_skip_verify: bool) -> Result<Self, TransportError> {
		Self::new(TransportConfig::new(base_url).with_insecure_skip_verify(insecure_skip_verify))
	}

	pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		let mut builder = reqwest::Client::builder()
			.default_headers(headers)
			.user_agent(config.user_agent.clone())
			.danger_accept_invalid_certs(config.insecure_skip_verify);
		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}
		let http = builder.build().map_err(|e| TransportError::Client(e.to_string()))?;

		debug!(
			target = "stakick.transport",
			base_url = %config.base_url,
			insecure = config.insecure_skip_verify,
			timeout_ms = config.timeout.map(|t| t.as_millis() as u64),
			"configured HTTP transport"
		);

		Ok(Self { config, http, session: None })
	}

	pub fn config(&self) -> &TransportConfig {
		&self.config
	}

	/// Joins `path` onto the base address, keeping any path prefix the base carries.
	fn url_for(&self, path: &str) -> Result<Url, TransportError> {
		let joined = format!("{}{}", self.config.base_url.as_str().trim_end_matches('/'), path);
		Url::parse(&joined).map_err(|e| TransportError::InvalidPath {
			path: path.to_string(),
			message: e.to_string(),
		})
	}
}

#[async_trait]
impl Transport for HttpTransport {
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
		let url = self.url_for(path)?;
		let mut request = self.http.post(url);

		if let Some(session) = &self.session {
			request = request.header(COOKIE, session.cookie_header());
			if let Some(token) = session.csrf_token() {
				request = request.header(CSRF_HEADER, token);
			}
		}
		if let Some(body) = body {
			let bytes = serde_json::to_vec(body).map_err(|e| TransportError::Decode {
				path: path.to_string(),
				message: e.to_string(),
			})?;
			request = request.body(bytes);
		}

		trace!(target = "stakick.transport", %path, has_session = self.session.is_some(), "POST");

		let response = request.send().await.map_err(|e| {
			if e.is_timeout() {
				TransportError::Timeout { path: path.to_string() }
			} else {
				TransportError::Network {
					path: path.to_string(),
					message: e.to_string(),
				}
			}
		})?;

		let status = response.status();
		let set_cookies = response
			.headers()
			.get_all(SET_COOKIE)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.map(str::to_string)
			.collect();
		let csrf_token = response
			.headers()
			.get(CSRF_HEADER)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		let text = response.text().await.map_err(|e| TransportError::Decode {
			path: path.to_string(),
			message: e.to_string(),
		})?;

		debug!(target = "stakick.transport", %path, status = status.as_u16(), "response");

		if !status.is_success() {
			return Err(TransportError::Status {
				path: path.to_string(),
				status: status.as_u16(),
				body: Some(text),
			});
		}

		Ok(Response {
			status: status.as_u16(),
			body: parse_body(&text),
			set_cookies,
			csrf_token,
		})
	}
}

impl std::fmt::Debug for HttpTransport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpTransport")
			.field("base_url", &self.config.base_url.as_str())
			.field("has_session", &self.session.is_some())
			.finish()
	}
}

fn parse_body(text: &str) -> Value {
	if text.trim().is_empty() {
		return Value::Null;
	}
	serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn transport(base: &str) -> HttpTransport {
		HttpTransport::configure(Url::parse(base).unwrap(), true).unwrap()
	}

	#[test]
	fn url_for_appends_to_base() {
		let t = transport("https://controller.local:8443");
		assert_eq!(t.url_for("/api/login").unwrap().as_str(), "https://controller.local:8443/api/login");
	}

	#[test]
	fn url_for_keeps_base_path_prefix() {
		let t = transport("https://console.local/proxy/network/");
		assert_eq!(
			t.url_for("/api/s/default/cmd/stamgr").unwrap().as_str(),
			"https://console.local/proxy/network/api/s/default/cmd/stamgr"
		);
	}

	#[test]
	fn attach_session_overwrites_previous() {
		let mut t = transport("https://controller.local");
		assert!(t.session().is_none());

		t.attach_session(Session::new("unifises=one", None));
		t.attach_session(Session::new("unifises=two", None));
		assert_eq!(t.session().map(Session::cookie_header), Some("unifises=two"));

		t.clear_session();
		assert!(t.session().is_none());
	}

	#[test]
	fn config_builder_sets_fields() {
		let cfg = TransportConfig::new(Url::parse("https://c.local").unwrap())
			.with_insecure_skip_verify(true)
			.with_timeout(Some(Duration::from_secs(5)));
		assert!(cfg.insecure_skip_verify);
		assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
		assert!(cfg.user_agent.starts_with("stakick/"));
	}

	#[test]
	fn configure_keeps_config() {
		let t = transport("https://c.local:8443");
		assert!(t.config().insecure_skip_verify);
		assert_eq!(t.config().timeout, None);
		assert_eq!(t.config().base_url.port(), Some(8443));
	}

	#[test]
	fn parse_body_handles_json_text_and_empty() {
		assert_eq!(parse_body(r#"{"meta":{"rc":"ok"}}"#), json!({ "meta": { "rc": "ok" } }));
		assert_eq!(parse_body("OK"), json!("OK"));
		assert_eq!(parse_body("  "), Value::Null);
	}
}
