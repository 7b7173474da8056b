use crate::engine::Seconds;

/// Mutable playback position state owned by a controller instance.
///
/// `optimistic` is the position the user intends to be at; it is authoritative
/// for display until the completion of the most recent seek clears it.
/// Recency is tracked by a monotonically increasing generation, bumped on
/// every seek call.
#[derive(Debug, Default)]
pub(crate) struct PositionState {
	pub optimistic: Option<Seconds>,
	pub in_flight: bool,
	pub latest_generation: u64,
}

impl PositionState {
	/// Record a new seek intent and return its generation.
	pub fn record_intent(&mut self, target: Seconds) -> u64 {
		self.latest_generation += 1;
		self.in_flight = true;
		self.optimistic = Some(round_tenth(target));
		self.latest_generation
	}

	/// Apply a completion. Only the most recent generation may clear state;
	/// anything older is stale and leaves the intent untouched.
	pub fn complete(&mut self, generation: u64) -> bool {
		let stale = generation != self.latest_generation;
		if !stale {
			self.in_flight = false;
			self.optimistic = None;
		}
		stale
	}
}

/// Times surfaced to callers are rounded to a tenth of a second.
pub(crate) fn round_tenth(time: Seconds) -> Seconds {
	(time * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_latest_generation_clears_state() {
		let mut state = PositionState::default();
		let generation = state.record_intent(12.34);
		assert!(state.in_flight);
		assert_eq!(state.optimistic, Some(12.3));

		assert!(!state.complete(generation));
		assert!(!state.in_flight);
		assert_eq!(state.optimistic, None);
	}

	#[test]
	fn test_stale_generation_leaves_state_alone() {
		let mut state = PositionState::default();
		let first = state.record_intent(10.0);
		let _second = state.record_intent(20.0);

		assert!(state.complete(first), "older completion must be stale");
		assert!(state.in_flight);
		assert_eq!(state.optimistic, Some(20.0));
	}

	#[test]
	fn test_round_tenth() {
		assert_eq!(round_tenth(1.04), 1.0);
		assert_eq!(round_tenth(1.06), 1.1);
		assert_eq!(round_tenth(0.0), 0.0);
	}
}
