use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Media time in seconds.
pub type Seconds = f64;

/// Duration as reported by a media engine. Live streams report
/// [`Indeterminate`](Self::Indeterminate) until they end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaDuration {
	Known(Seconds),
	Indeterminate,
}

/// One seekable span of the current item, as `(start, duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekableRange {
	pub start: Seconds,
	pub duration: Seconds,
}

impl SeekableRange {
	pub fn new(start: Seconds, duration: Seconds) -> Self {
		Self { start, duration }
	}

	pub fn end(&self) -> Seconds {
		self.start + self.duration
	}
}

/// Accuracy bounds for a seek command. Infinite tolerances favor seek speed,
/// zero tolerances favor frame accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekTolerance {
	pub before: Seconds,
	pub after: Seconds,
}

impl SeekTolerance {
	pub const INFINITE: Self = Self {
		before: Seconds::INFINITY,
		after: Seconds::INFINITY,
	};

	pub const EXACT: Self = Self { before: 0.0, after: 0.0 };
}

impl Default for SeekTolerance {
	fn default() -> Self {
		Self::INFINITE
	}
}

/// The asynchronous media engine driven by the seek controller.
///
/// `seek` resolves with the engine's success flag; an engine may report
/// `false` for seeks it cancelled in favor of a newer one.
#[async_trait]
pub trait MediaEngine: Send + Sync + 'static {
	async fn seek(&self, target: Seconds, tolerance: SeekTolerance) -> bool;

	fn current_time(&self) -> Seconds;

	fn duration(&self) -> MediaDuration;

	fn seekable_ranges(&self) -> Vec<SeekableRange>;
}

/// Resolve a usable duration for clamping seek targets.
///
/// A numeric engine duration wins; for indeterminate (live) durations the end
/// of the last seekable range is used, but never less than the current time,
/// so clamping cannot aim past the live edge. Falls back to the current time
/// when no seekable range is available.
pub fn resolve_duration<E: MediaEngine + ?Sized>(engine: &E) -> Seconds {
	match engine.duration() {
		MediaDuration::Known(duration) if duration.is_finite() && duration > 0.0 => duration,
		_ => match engine.seekable_ranges().last() {
			Some(range) => range.end().max(engine.current_time()),
			None => engine.current_time(),
		},
	}
}
