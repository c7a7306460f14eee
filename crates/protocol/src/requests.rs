//! Request bodies sent to the controller.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

impl std::fmt::Debug for LoginRequest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoginRequest")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Station manager commands understood by `/cmd/stamgr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StationCommand {
	/// Disconnect a client so it reassociates with an access point.
	KickSta,
}

impl StationCommand {
	pub fn as_str(&self) -> &'static str {
		match self {
			StationCommand::KickSta => "kick-sta",
		}
	}
}

impl std::fmt::Display for StationCommand {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Body of `POST /api/s/{site}/cmd/stamgr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationCommandRequest {
	pub cmd: StationCommand,
	pub mac: String,
}

impl StationCommandRequest {
	/// Builds a `kick-sta` request for `mac`.
	pub fn kick(mac: impl Into<String>) -> Self {
		Self {
			cmd: StationCommand::KickSta,
			mac: mac.into(),
		}
	}
}
