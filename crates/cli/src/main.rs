use clap::Parser;
use stakick_cli::{cli::Cli, commands, logging};
use tracing::debug;

#[tokio::main]
async fn main() {
	// .env only fills variables that are not already set.
	let _ = dotenvy::dotenv();
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		debug!(target = "stakick", error = %err, "run failed");
		if let Some(hint) = err.hint() {
			eprintln!("{hint}");
		}
		std::process::exit(err.exit_code());
	}
}
