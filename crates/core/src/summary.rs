//! Reduction of per-target outcomes into counts.

use serde::Serialize;

use crate::executor::Outcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
	pub total: usize,
	pub successful: usize,
	pub failed: usize,
}

impl Summary {
	pub fn all_succeeded(&self) -> bool {
		self.failed == 0
	}
}

/// Counts outcomes. `successful + failed == total` always holds.
pub fn summarize(outcomes: &[Outcome]) -> Summary {
	let total = outcomes.len();
	let successful = outcomes.iter().filter(|o| o.success).count();
	Summary {
		total,
		successful,
		failed: total - successful,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::error::TransportError;
	use crate::target::TargetId;

	fn ok(mac: &str) -> Outcome {
		Outcome::succeeded(TargetId::new(mac).unwrap(), 200, json!({}))
	}

	fn failed(mac: &str) -> Outcome {
		Outcome::failed(
			TargetId::new(mac).unwrap(),
			&TransportError::Network {
				path: "/x".into(),
				message: "refused".into(),
			},
		)
	}

	#[test]
	fn empty_sequence_is_all_zero() {
		assert_eq!(summarize(&[]), Summary::default());
		assert!(summarize(&[]).all_succeeded());
	}

	#[test]
	fn mixed_outcomes_are_counted() {
		let summary = summarize(&[ok("a"), failed("b"), ok("c"), failed("a")]);
		assert_eq!(
			summary,
			Summary {
				total: 4,
				successful: 2,
				failed: 2
			}
		);
		assert!(!summary.all_succeeded());
	}

	#[test]
	fn counts_always_add_up() {
		let pool = [ok("a"), failed("b")];
		for n in 0..6 {
			let outcomes: Vec<Outcome> = (0..n).map(|i| pool[i % 2].clone()).collect();
			let s = summarize(&outcomes);
			assert_eq!(s.successful + s.failed, s.total);
			assert_eq!(s.total, n);
		}
	}
}
