//! End-to-end kick workflow: login, batch, summarize, logout.

use serde::Serialize;
use tracing::info;

use crate::error::ConfigError;
use crate::executor::{BatchExecutor, Outcome};
use crate::session::{Credentials, SessionManager, SessionState};
use crate::summary::{Summary, summarize};
use crate::target::TargetId;
use crate::transport::Transport;

/// Everything the workflow observed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReport {
	pub login: SessionState,
	pub outcomes: Vec<Outcome>,
	pub summary: Summary,
	pub logged_out: bool,
}

/// Kicks every target in order through `transport`.
///
/// Login failure does not stop the batch, and logout is attempted after the
/// batch no matter how individual commands went. The only error is an empty
/// target list, reported before any request is made.
pub async fn run<T, F>(transport: T, credentials: &Credentials, site: &str, targets: &[TargetId], observer: F) -> Result<WorkflowReport, ConfigError>
where
	T: Transport,
	F: FnMut(usize, &Outcome),
{
	if targets.is_empty() {
		return Err(ConfigError::NoTargets);
	}

	let mut manager = SessionManager::new(transport);
	let login = manager.login(credentials).await;

	info!(target = "stakick", count = targets.len(), %site, authenticated = login == SessionState::Authenticated, "reconnecting devices");
	let outcomes = BatchExecutor::new(manager.transport(), site).run_batch_with(targets, observer).await;
	let summary = summarize(&outcomes);

	let logged_out = manager.logout().await;

	Ok(WorkflowReport {
		login,
		outcomes,
		summary,
		logged_out,
	})
}
