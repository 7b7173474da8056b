use std::time::Duration;

/// Tunables for a synchronizer instance.
#[derive(Debug, Clone)]
pub struct SyncConfig {
	/// Interval of the poll fallback used while an event has no assigned stream.
	pub poll_interval: Duration,
	/// Buffer size of the per-event update channel handed to consumers.
	pub update_buffer: usize,
}

impl SyncConfig {
	pub fn with_poll_interval(poll_interval: Duration) -> Self {
		Self {
			poll_interval,
			..Self::default()
		}
	}
}

impl Default for SyncConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(10),
			update_buffer: 32,
		}
	}
}
