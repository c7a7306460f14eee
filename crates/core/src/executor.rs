//! Sequential per-target command execution.

use serde::Serialize;
use serde_json::Value;
use stakick_protocol::{ApiEnvelope, StationCommandRequest, station_manager_path};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::target::TargetId;
use crate::transport::Transport;

/// Result of one command against one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
	pub target: TargetId,
	pub success: bool,
	/// HTTP status, when the controller answered at all.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response_data: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
}

impl Outcome {
	pub fn succeeded(target: TargetId, status: u16, response_data: Value) -> Self {
		Self {
			target,
			success: true,
			status: Some(status),
			response_data: Some(response_data),
			error_message: None,
		}
	}

	pub fn failed(target: TargetId, error: &TransportError) -> Self {
		Self {
			target,
			success: false,
			status: error.status(),
			response_data: None,
			error_message: Some(error.detail()),
		}
	}
}

/// Issues `kick-sta` for each target against one site, strictly in order.
pub struct BatchExecutor<'a, T: Transport + ?Sized> {
	transport: &'a T,
	path: String,
}

impl<'a, T: Transport + ?Sized> BatchExecutor<'a, T> {
	pub fn new(transport: &'a T, site: &str) -> Self {
		Self {
			transport,
			path: station_manager_path(site),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Runs the command for a single target. Never fails; errors become a failed [`Outcome`].
	pub async fn run_command(&self, target: &TargetId) -> Outcome {
		let request = StationCommandRequest::kick(target.as_str());
		let body = match serde_json::to_value(&request) {
			Ok(body) => body,
			Err(e) => {
				let err = TransportError::Decode {
					path: self.path.clone(),
					message: e.to_string(),
				};
				return Outcome::failed(target.clone(), &err);
			}
		};

		match self.transport.post(&self.path, Some(&body)).await {
			Ok(response) => {
				// 2xx counts as success whatever rc says.
				if ApiEnvelope::parse(&response.body).is_some_and(|envelope| !envelope.is_ok()) {
					warn!(target = "stakick.batch", mac = %target, cmd = %request.cmd, status = response.status, "controller answered rc=error");
				} else {
					info!(target = "stakick.batch", mac = %target, cmd = %request.cmd, status = response.status, "reconnect command sent");
				}
				Outcome::succeeded(target.clone(), response.status, response.body)
			}
			Err(err) => {
				warn!(target = "stakick.batch", mac = %target, error = %err, "reconnect command failed");
				Outcome::failed(target.clone(), &err)
			}
		}
	}

	/// Runs every target in order and returns one outcome per target.
	pub async fn run_batch(&self, targets: &[TargetId]) -> Vec<Outcome> {
		self.run_batch_with(targets, |_, _| {}).await
	}

	/// Like [`run_batch`](Self::run_batch), calling `observer` with the
	/// index and outcome as each target completes.
	pub async fn run_batch_with<F>(&self, targets: &[TargetId], mut observer: F) -> Vec<Outcome>
	where
		F: FnMut(usize, &Outcome),
	{
		debug!(target = "stakick.batch", count = targets.len(), path = %self.path, "starting batch");

		let mut outcomes = Vec::with_capacity(targets.len());
		for (index, target) in targets.iter().enumerate() {
			let outcome = self.run_command(target).await;
			observer(index, &outcome);
			outcomes.push(outcome);
		}
		outcomes
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::fake_transport::{FakeReply, FakeTransportBuilder};

	const STAMGR: &str = "/api/s/default/cmd/stamgr";

	fn ids(raw: &[&str]) -> Vec<TargetId> {
		raw.iter().map(|r| TargetId::new(r).unwrap()).collect()
	}

	#[tokio::test]
	async fn run_command_posts_kick_body() {
		let (transport, controller) = FakeTransportBuilder::new()
			.reply(STAMGR, FakeReply::ok(json!({ "meta": { "rc": "ok" }, "data": [] })))
			.build();
		let executor = BatchExecutor::new(&transport, "default");

		let outcome = executor.run_command(&TargetId::new("aa:bb:cc:dd:ee:01").unwrap()).await;

		assert!(outcome.success);
		assert_eq!(outcome.status, Some(200));
		assert_eq!(outcome.response_data, Some(json!({ "meta": { "rc": "ok" }, "data": [] })));
		let sent = controller.take_sent().await;
		assert_eq!(sent[0].path, STAMGR);
		assert_eq!(sent[0].body, Some(json!({ "cmd": "kick-sta", "mac": "aa:bb:cc:dd:ee:01" })));
	}

	#[tokio::test]
	async fn run_command_passes_through_rc_error_on_2xx() {
		let body = json!({ "meta": { "rc": "error", "msg": "api.err.UnknownStation" }, "data": [] });
		let (transport, _controller) = FakeTransportBuilder::new().reply(STAMGR, FakeReply::ok(body.clone())).build();
		let executor = BatchExecutor::new(&transport, "default");

		let outcome = executor.run_command(&TargetId::new("aa:bb:cc:dd:ee:09").unwrap()).await;

		assert!(outcome.success);
		assert_eq!(outcome.response_data, Some(body));
		assert_eq!(outcome.error_message, None);
	}

	#[tokio::test]
	async fn run_command_captures_controller_error() {
		let (transport, _controller) = FakeTransportBuilder::new()
			.reply(STAMGR, FakeReply::status(400, r#"{"meta":{"rc":"error","msg":"api.err.UnknownStation"},"data":[]}"#))
			.build();
		let executor = BatchExecutor::new(&transport, "default");

		let outcome = executor.run_command(&TargetId::new("zz").unwrap()).await;

		assert!(!outcome.success);
		assert_eq!(outcome.status, Some(400));
		assert_eq!(outcome.response_data, None);
		assert_eq!(outcome.error_message.as_deref(), Some("api.err.UnknownStation"));
	}

	#[tokio::test]
	async fn run_batch_preserves_order_and_isolates_failures() {
		let (transport, controller) = FakeTransportBuilder::new()
			.reply(STAMGR, FakeReply::network("connection refused"))
			.reply(STAMGR, FakeReply::ok(json!({})))
			.reply(STAMGR, FakeReply::Timeout)
			.reply(STAMGR, FakeReply::ok(json!({})))
			.build();
		let executor = BatchExecutor::new(&transport, "default");
		let targets = ids(&["m1", "m2", "m3", "m1"]);

		let outcomes = executor.run_batch(&targets).await;

		assert_eq!(outcomes.len(), targets.len());
		let order: Vec<&str> = outcomes.iter().map(|o| o.target.as_str()).collect();
		assert_eq!(order, ["m1", "m2", "m3", "m1"]);
		let flags: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
		assert_eq!(flags, [false, true, false, true]);
		assert_eq!(outcomes[2].error_message.as_deref(), Some("request to /api/s/default/cmd/stamgr timed out"));
		assert_eq!(controller.sent_paths().await.len(), 4);
	}

	#[tokio::test]
	async fn run_batch_with_reports_each_outcome_in_order() {
		let (transport, _controller) = FakeTransportBuilder::new()
			.reply(STAMGR, FakeReply::ok(json!({})))
			.reply(STAMGR, FakeReply::status(500, "boom"))
			.build();
		let executor = BatchExecutor::new(&transport, "default");
		let mut seen = Vec::new();

		executor
			.run_batch_with(&ids(&["a", "b"]), |i, o| seen.push((i, o.target.to_string(), o.success)))
			.await;

		assert_eq!(seen, [(0, "a".to_string(), true), (1, "b".to_string(), false)]);
	}

	#[tokio::test]
	async fn empty_batch_sends_nothing() {
		let (transport, controller) = FakeTransportBuilder::new().build();
		let outcomes = BatchExecutor::new(&transport, "default").run_batch(&[]).await;
		assert!(outcomes.is_empty());
		assert!(controller.take_sent().await.is_empty());
	}

	#[test]
	fn executor_path_is_site_scoped() {
		let (transport, _controller) = FakeTransportBuilder::new().build();
		assert_eq!(BatchExecutor::new(&transport, "branch").path(), "/api/s/branch/cmd/stamgr");
	}
}
