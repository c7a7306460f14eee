mod kick;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::{EmptyResult, OutputFormat, ResultBuilder, print_error_stderr, print_result};

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	let result = kick::execute(&cli).await;

	if let Err(err) = &result {
		report_failure(err, format);
	}
	result
}

/// Reports a failure that the kick command did not already put in its own envelope.
fn report_failure(err: &CliError, format: OutputFormat) {
	if matches!(err, CliError::TargetsFailed { .. }) {
		return;
	}

	let result: EmptyResult = ResultBuilder::new("kick").error(err.code(), err.to_string()).build();
	match format {
		OutputFormat::Text => {
			if let Some(error) = &result.error {
				print_error_stderr(error);
			}
		}
		_ => print_result(&result, format),
	}
}
