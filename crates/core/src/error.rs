//! Error taxonomy for the kick workflow.
//!
//! Only [`ConfigError`] is fatal. [`TransportError`] is contained at each
//! call site: login and logout log it, the batch executor turns it into a
//! failed [`Outcome`](crate::Outcome). [`SessionError`] is logged and the
//! batch proceeds without a session.

use stakick_protocol::ApiEnvelope;
use thiserror::Error;

/// Result alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors: bad configuration, including a settings file that is not valid JSON.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Invalid or incomplete process configuration, raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("no device MAC addresses provided")]
	NoTargets,

	#[error("target identifier must not be empty")]
	EmptyTarget,

	#[error("missing required setting: {name}")]
	Missing { name: &'static str },

	#[error("invalid controller URL '{url}': {message}")]
	InvalidUrl { url: String, message: String },

	#[error("failed to read config file {path}: {message}")]
	File { path: String, message: String },
}

/// Network failure, timeout, or non-2xx response from the controller.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("failed to create HTTP client: {0}")]
	Client(String),

	#[error("invalid request URL for {path}: {message}")]
	InvalidPath { path: String, message: String },

	#[error("request to {path} timed out")]
	Timeout { path: String },

	#[error("request to {path} failed: {message}")]
	Network { path: String, message: String },

	#[error("{path} returned HTTP {status}")]
	Status { path: String, status: u16, body: Option<String> },

	#[error("failed to read response from {path}: {message}")]
	Decode { path: String, message: String },
}

impl TransportError {
	/// HTTP status when the controller answered with a non-2xx response.
	pub fn status(&self) -> Option<u16> {
		match self {
			TransportError::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Raw response body when the controller returned one.
	pub fn body(&self) -> Option<&str> {
		match self {
			TransportError::Status { body, .. } => body.as_deref().filter(|b| !b.trim().is_empty()),
			_ => None,
		}
	}

	/// Most specific human-readable detail available.
	///
	/// Prefers the controller's `meta.msg`, then the raw response body, then
	/// the transport message.
	pub fn detail(&self) -> String {
		let Some(body) = self.body() else {
			return self.to_string();
		};

		serde_json::from_str::<serde_json::Value>(body)
			.ok()
			.as_ref()
			.and_then(ApiEnvelope::parse)
			.and_then(|env| env.error_message().map(str::to_string))
			.unwrap_or_else(|| body.trim().to_string())
	}
}

/// Login did not yield a usable session.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("login request failed: {0}")]
	Transport(#[from] TransportError),

	#[error("login succeeded but the controller did not return a session cookie")]
	MissingCredential,
}
