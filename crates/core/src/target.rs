//! Target identifiers (client hardware addresses).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A non-empty, trimmed client identifier.
///
/// The format is not checked here; a malformed address is rejected by the
/// controller and surfaces as a failed outcome for that target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
	pub fn new(raw: impl AsRef<str>) -> Result<Self, ConfigError> {
		let trimmed = raw.as_ref().trim();
		if trimmed.is_empty() {
			return Err(ConfigError::EmptyTarget);
		}
		Ok(Self(trimmed.to_string()))
	}

	/// Parses a comma-separated list, trimming entries and dropping empty ones.
	///
	/// Order and duplicates are preserved.
	pub fn parse_list(list: &str) -> Vec<Self> {
		list.split(',').filter_map(|entry| Self::new(entry).ok()).collect()
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for TargetId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for TargetId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::str::FromStr for TargetId {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
