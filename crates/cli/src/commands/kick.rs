use std::time::Instant;

use serde_json::json;
use stakick::{HttpTransport, SessionState, workflow};
use tracing::info;

use crate::cli::Cli;
use crate::config::{ResolvedConfig, load_config_file};
use crate::error::{CliError, Result};
use crate::output::{DiagnosticLevel, ErrorCode, OutputFormat, ResultBuilder, print_plan, print_progress, print_report_text, print_result};

pub async fn execute(cli: &Cli) -> Result<()> {
	let started = Instant::now();
	let format = cli.format;

	let file = cli.config.as_deref().map(load_config_file).transpose()?;
	let config = ResolvedConfig::resolve(cli, file)?;
	info!(
		target = "stakick",
		url = %config.url,
		site = %config.site,
		targets = config.targets.len(),
		verify_tls = config.verify_tls,
		"resolved configuration"
	);

	print_plan(&config.targets, format);

	let transport = HttpTransport::new(config.transport_config())?;
	let total = config.targets.len();
	let report = workflow::run(transport, &config.credentials, &config.site, &config.targets, |index, outcome| {
		if format.streams_progress() {
			print_progress(format, index, total, outcome);
		}
	})
	.await?;

	let summary = report.summary;
	let mut builder = ResultBuilder::new("kick").started_at(started).inputs(config.inputs());
	if !config.verify_tls {
		builder = builder.diagnostic(DiagnosticLevel::Info, "TLS certificate verification is disabled");
	}
	if report.login == SessionState::Unauthenticated {
		builder = builder.diagnostic_with_source(DiagnosticLevel::Warning, "login failed; commands were sent without a session", "session");
	}
	if !report.logged_out {
		builder = builder.diagnostic_with_source(DiagnosticLevel::Warning, "logout failed", "session");
	}

	let strict_failure = cli.strict_exit && !summary.all_succeeded();
	if strict_failure {
		builder = builder.error_with_details(
			ErrorCode::TargetsFailed,
			format!("{} of {} targets failed", summary.failed, summary.total),
			json!({ "failed": summary.failed, "total": summary.total }),
		);
	}

	if format == OutputFormat::Text {
		print_report_text(&report);
	}
	let result = builder.data(report).build();
	print_result(&result, format);

	if strict_failure {
		return Err(CliError::TargetsFailed {
			failed: summary.failed,
			total: summary.total,
		});
	}
	Ok(())
}
