//! Layered settings: CLI flags and environment (via clap) over an optional JSON file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use stakick::protocol::DEFAULT_SITE;
use stakick::{ConfigError, Credentials, TargetId, TransportConfig};
use tracing::debug;
use url::Url;

use crate::cli::Cli;
use crate::output::KickInputs;

/// Settings file accepted by `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
	pub url: Option<String>,
	pub username: Option<String>,
	pub password: Option<String>,
	pub site: Option<String>,
	#[serde(default)]
	pub targets: Vec<String>,
	pub verify_tls: Option<bool>,
	pub timeout_secs: Option<u64>,
}

pub fn load_config_file(path: &Path) -> stakick::Result<ConfigFile> {
	let text = std::fs::read_to_string(path).map_err(|err| ConfigError::File {
		path: path.display().to_string(),
		message: err.to_string(),
	})?;
	let file = serde_json::from_str(&text)?;
	debug!(target = "stakick", path = %path.display(), "loaded config file");
	Ok(file)
}

/// Picks the first non-empty target source: arguments, then the comma list, then the file.
pub fn resolve_targets(args: &[String], mac_list: Option<&str>, file_targets: &[String]) -> Result<Vec<TargetId>, ConfigError> {
	let from_args: Vec<TargetId> = args.iter().filter_map(|raw| TargetId::new(raw).ok()).collect();
	if !from_args.is_empty() {
		return Ok(from_args);
	}

	let from_list = mac_list.map(TargetId::parse_list).unwrap_or_default();
	if !from_list.is_empty() {
		return Ok(from_list);
	}

	let from_file: Vec<TargetId> = file_targets.iter().filter_map(|raw| TargetId::new(raw).ok()).collect();
	if !from_file.is_empty() {
		return Ok(from_file);
	}

	Err(ConfigError::NoTargets)
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub struct ResolvedConfig {
	pub url: Url,
	pub credentials: Credentials,
	pub site: String,
	pub targets: Vec<TargetId>,
	pub verify_tls: bool,
	pub timeout: Option<Duration>,
}

impl ResolvedConfig {
	/// Targets are checked first so an empty list is reported even when nothing else is set.
	pub fn resolve(cli: &Cli, file: Option<ConfigFile>) -> Result<Self, ConfigError> {
		let file = file.unwrap_or_default();
		let targets = resolve_targets(&cli.macs, cli.mac_list.as_deref(), &file.targets)?;

		let raw_url = non_empty(cli.url.clone()).or(non_empty(file.url)).ok_or(ConfigError::Missing { name: "url" })?;
		let url = Url::parse(&raw_url).map_err(|err| ConfigError::InvalidUrl {
			url: raw_url.clone(),
			message: err.to_string(),
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidUrl {
				url: raw_url,
				message: format!("unsupported scheme '{}'", url.scheme()),
			});
		}

		let username = non_empty(cli.username.clone()).or(non_empty(file.username)).ok_or(ConfigError::Missing { name: "username" })?;
		let password = cli.password.clone().or(file.password).ok_or(ConfigError::Missing { name: "password" })?;
		let site = non_empty(cli.site.clone()).or(non_empty(file.site)).unwrap_or_else(|| DEFAULT_SITE.to_string());

		Ok(Self {
			url,
			credentials: Credentials::new(username, password),
			site,
			targets,
			verify_tls: verify_tls(cli, file.verify_tls),
			timeout: cli.timeout.or(file.timeout_secs.filter(|secs| *secs > 0)).map(Duration::from_secs),
		})
	}

	pub fn transport_config(&self) -> TransportConfig {
		TransportConfig::new(self.url.clone())
			.with_insecure_skip_verify(!self.verify_tls)
			.with_timeout(self.timeout)
	}

	pub fn inputs(&self) -> KickInputs {
		KickInputs {
			url: self.url.to_string(),
			site: self.site.clone(),
			targets: self.targets.iter().map(ToString::to_string).collect(),
			verify_tls: self.verify_tls,
		}
	}
}

fn verify_tls(cli: &Cli, from_file: Option<bool>) -> bool {
	match (cli.verify_tls, cli.no_verify_tls) {
		(true, _) => true,
		(_, true) => false,
		_ => from_file.unwrap_or(false),
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
