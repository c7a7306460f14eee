use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "stakick")]
#[command(about = "Force wireless clients to reconnect by kicking them from the controller")]
#[command(version)]
#[command(after_help = "Targets come from MAC arguments first, then DEVICE_MAC (comma-separated), then the config file.")]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Load settings from a JSON config file
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Controller base URL, e.g. https://unifi.local:8443
	#[arg(long, env = "CONTROLLER_URL", value_name = "URL")]
	pub url: Option<String>,

	/// Controller username
	#[arg(short, long, env = "USERNAME")]
	pub username: Option<String>,

	/// Controller password
	#[arg(short, long, env = "PASSWORD", hide_env_values = true)]
	pub password: Option<String>,

	/// Controller site name
	#[arg(short, long, env = "SITE")]
	pub site: Option<String>,

	/// Comma-separated MAC addresses, used when none are given as arguments
	#[arg(long = "macs", env = "DEVICE_MAC", value_name = "LIST")]
	pub mac_list: Option<String>,

	/// Verify the controller's TLS certificate (self-signed certificates are accepted by default)
	#[arg(long)]
	pub verify_tls: bool,

	/// Accept any certificate even when the config file sets `verifyTls`
	#[arg(long, conflicts_with = "verify_tls")]
	pub no_verify_tls: bool,

	/// Per-request timeout in seconds
	#[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
	pub timeout: Option<u64>,

	/// Exit with status 1 when any target fails
	#[arg(long)]
	pub strict_exit: bool,

	/// MAC addresses of the clients to reconnect
	#[arg(value_name = "MAC")]
	pub macs: Vec<String>,
}
