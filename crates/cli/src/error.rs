use stakick::{ConfigError, TransportError};
use thiserror::Error;

use crate::output::ErrorCode;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error(transparent)]
	Core(#[from] stakick::Error),

	#[error("{failed} of {total} targets failed")]
	TargetsFailed { failed: usize, total: usize },
}

impl CliError {
	/// Process exit status. Every failure maps to 1.
	pub fn exit_code(&self) -> i32 {
		1
	}

	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Config(_) => ErrorCode::InvalidInput,
			CliError::Transport(_) => ErrorCode::TransportError,
			CliError::Core(stakick::Error::Config(_)) => ErrorCode::InvalidInput,
			CliError::Core(stakick::Error::Json(_)) => ErrorCode::InvalidInput,
			CliError::TargetsFailed { .. } => ErrorCode::TargetsFailed,
		}
	}

	/// Usage hint printed under the error in text mode.
	pub fn hint(&self) -> Option<&'static str> {
		match self {
			CliError::Config(ConfigError::NoTargets) | CliError::Core(stakick::Error::Config(ConfigError::NoTargets)) => Some(
				"Usage: stakick [OPTIONS] <MAC>...\nOr set DEVICE_MAC (comma-separated) in the environment or a .env file",
			),
			CliError::Config(ConfigError::Missing { .. }) => Some("Set it with a flag, an environment variable, or the config file (see --help)."),
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, CliError>;
