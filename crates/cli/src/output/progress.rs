//! Per-target progress lines and the closing summary block.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::{Value, json};
use stakick::{Outcome, SessionState, TargetId, WorkflowReport};

use crate::output::format::OutputFormat;

/// Prints the target list before any request is made (text format only).
pub fn print_plan(targets: &[TargetId], format: OutputFormat) {
	if format != OutputFormat::Text {
		return;
	}
	let list: Vec<&str> = targets.iter().map(TargetId::as_str).collect();
	println!("Devices to reconnect: {}", list.join(", "));
	println!();
	println!("Reconnecting {} device(s)...", targets.len());
	println!();
}

/// Prints one line for a finished target. JSON and TOON print nothing until the end.
pub fn print_progress(format: OutputFormat, index: usize, total: usize, outcome: &Outcome) {
	match format {
		OutputFormat::Text if outcome.success => println!("{}", progress_line(index, total, outcome)),
		OutputFormat::Text => eprintln!("{}", progress_line(index, total, outcome)),
		OutputFormat::Ndjson => {
			let line = json!({ "event": "outcome", "index": index, "total": total, "outcome": outcome });
			println!("{line}");
		}
		OutputFormat::Json | OutputFormat::Toon => {}
	}
}

pub(crate) fn progress_line(index: usize, total: usize, outcome: &Outcome) -> String {
	let position = format!("[{}/{}]", index + 1, total).dimmed();
	if outcome.success {
		let payload = outcome.response_data.as_ref().map(compact).unwrap_or_default();
		format!("{position} {} Client {} reconnect command sent: {payload}", "✓".green(), outcome.target)
	} else {
		let reason = outcome.error_message.as_deref().unwrap_or("unknown error");
		format!("{position} {} Failed to reconnect client {}: {reason}", "✗".red(), outcome.target)
	}
}

/// Prints the summary block for text output.
pub fn print_report_text(report: &WorkflowReport) {
	let mut stdout = io::stdout().lock();
	for line in summary_lines(report) {
		let _ = writeln!(stdout, "{line}");
	}
}

pub(crate) fn summary_lines(report: &WorkflowReport) -> Vec<String> {
	let session = match report.login {
		SessionState::Authenticated => "authenticated".to_string(),
		SessionState::Unauthenticated => "not authenticated".yellow().to_string(),
	};
	let failed = if report.summary.failed > 0 {
		report.summary.failed.to_string().red().to_string()
	} else {
		report.summary.failed.to_string()
	};

	vec![
		String::new(),
		"=== Summary ===".bold().to_string(),
		format!("Total devices: {}", report.summary.total),
		format!("Successful: {}", report.summary.successful),
		format!("Failed: {failed}"),
		format!("Session: {session}"),
	]
}

fn compact(value: &Value) -> String {
	serde_json::to_string(value).unwrap_or_default()
}
