//! Standard controller response envelope: `{"meta": {"rc": "ok"}, "data": [...]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result code reported in `meta.rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCode {
	Ok,
	Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMeta {
	pub rc: ResultCode,
	/// Machine-readable message, e.g. `api.err.UnknownStation`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub msg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
	pub meta: ApiMeta,
	#[serde(default)]
	pub data: Vec<Value>,
}

impl ApiEnvelope {
	/// Parses `body` as an envelope, returning `None` for any other shape.
	pub fn parse(body: &Value) -> Option<Self> {
		serde_json::from_value(body.clone()).ok()
	}

	pub fn is_ok(&self) -> bool {
		self.meta.rc == ResultCode::Ok
	}

	/// Returns the controller's error message when `rc` is `error`.
	pub fn error_message(&self) -> Option<&str> {
		match self.meta.rc {
			ResultCode::Error => self.meta.msg.as_deref(),
			ResultCode::Ok => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn parses_error_envelope() {
		let body = json!({ "meta": { "rc": "error", "msg": "api.err.UnknownStation" }, "data": [] });
		let env = ApiEnvelope::parse(&body).expect("envelope");
		assert!(!env.is_ok());
		assert_eq!(env.error_message(), Some("api.err.UnknownStation"));
	}

	#[test]
	fn ok_envelope_has_no_error_message() {
		let env = ApiEnvelope::parse(&json!({ "meta": { "rc": "ok" } })).expect("envelope");
		assert!(env.is_ok());
		assert!(env.data.is_empty());
		assert_eq!(env.error_message(), None);
	}

	#[test]
	fn non_envelope_bodies_are_rejected() {
		assert!(ApiEnvelope::parse(&json!("Internal Server Error")).is_none());
		assert!(ApiEnvelope::parse(&json!({ "status": 500 })).is_none());
	}
}
