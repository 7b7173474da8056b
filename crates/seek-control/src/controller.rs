use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sync_timing::Debouncer;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::engine::{resolve_duration, MediaEngine, Seconds, SeekTolerance};
use crate::error::{Result, SeekError};
use crate::position::{round_tenth, PositionState};

/// Result of one seek call, resolved through the receiver returned by
/// [`SeekController::seek_to`] / [`SeekController::seek_by`].
///
/// A call superseded *before* dispatch never reaches the engine; its receiver
/// resolves with a `RecvError` instead of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekOutcome {
	/// Success flag reported by the media engine.
	pub engine_ok: bool,
	/// True when a newer seek was issued after this one was dispatched; stale
	/// completions never clear the optimistic position or the seeking flag.
	pub stale: bool,
}

/// A seek that survived its debounce window, on its way to the engine.
struct SeekIntent {
	target: Seconds,
	tolerance: SeekTolerance,
	generation: u64,
	completion: oneshot::Sender<SeekOutcome>,
}

/// Debounced, race-safe seek coordinator for an asynchronous media engine.
///
/// Every call updates the optimistic position synchronously; of all calls made
/// within one debounce window only the last reaches the engine, and only the
/// completion of the most recently issued call may clear the optimistic state.
pub struct SeekController<E> {
	engine: Arc<E>,
	state: Arc<Mutex<PositionState>>,
	debouncer: Debouncer<SeekIntent>,
	cancel: CancellationToken,
}

impl<E: MediaEngine> SeekController<E> {
	pub fn new(engine: Arc<E>) -> Self {
		let state = Arc::new(Mutex::new(PositionState::default()));
		let (debouncer, intents) = Debouncer::new(Duration::ZERO);
		let cancel = CancellationToken::new();

		let executor = SeekExecutor {
			engine: Arc::clone(&engine),
			state: Arc::clone(&state),
			intents,
			cancel: cancel.clone(),
		};
		tokio::spawn(executor.run());

		Self {
			engine,
			state,
			debouncer,
			cancel,
		}
	}

	/// Seek to an absolute position, clamped to `[0, duration − 1]` when the
	/// duration is known and to non-negative otherwise.
	pub fn seek_to(&self, target: Seconds, tolerance: SeekTolerance, debounce_window: Duration) -> Result<oneshot::Receiver<SeekOutcome>> {
		let duration = resolve_duration(self.engine.as_ref());
		self.submit(clamp_target(target, duration), tolerance, debounce_window)
	}

	/// Seek by a relative amount, computed against the *optimistic* position so
	/// that stacked relative seeks accumulate against user intent rather than
	/// the engine's lagging actual time.
	pub fn seek_by(&self, offset: Seconds, tolerance: SeekTolerance, debounce_window: Duration) -> Result<oneshot::Receiver<SeekOutcome>> {
		let duration = resolve_duration(self.engine.as_ref());
		if duration <= 0.0 {
			return Err(SeekError::DurationUnknown);
		}
		let target = self.optimistic_time() + offset;
		self.submit(clamp_target(target, duration), tolerance, debounce_window)
	}

	fn submit(&self, target: Seconds, tolerance: SeekTolerance, debounce_window: Duration) -> Result<oneshot::Receiver<SeekOutcome>> {
		let generation = self.state().record_intent(target);
		let (completion, receiver) = oneshot::channel();

		self.debouncer.set_delay(debounce_window);
		let accepted = self.debouncer.trigger(SeekIntent {
			target,
			tolerance,
			generation,
			completion,
		});
		if !accepted {
			return Err(SeekError::ControllerClosed);
		}

		debug!(seek_target = target, generation, "seek intent recorded");
		Ok(receiver)
	}

	/// The engine's reported time, rounded to a tenth of a second.
	pub fn current_time(&self) -> Seconds {
		round_tenth(self.engine.current_time())
	}

	/// The position to display: the optimistic override while a seek is
	/// pending or in flight, the engine time otherwise.
	pub fn optimistic_time(&self) -> Seconds {
		let optimistic = self.state().optimistic;
		optimistic.unwrap_or_else(|| self.current_time())
	}

	/// True from the moment a seek call is made (even while still debounced)
	/// until the completion of the most recent call.
	pub fn is_seeking(&self) -> bool {
		self.state().in_flight
	}

	/// Duration used for clamping; see [`resolve_duration`].
	pub fn duration(&self) -> Seconds {
		resolve_duration(self.engine.as_ref())
	}

	fn state(&self) -> MutexGuard<'_, PositionState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl<E> Drop for SeekController<E> {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

fn clamp_target(target: Seconds, duration: Seconds) -> Seconds {
	let upper = if duration > 0.0 { duration - 1.0 } else { Seconds::INFINITY };
	target.clamp(0.0, upper.max(0.0))
}

/// Serial executor for debounce-surviving intents.
struct SeekExecutor<E> {
	engine: Arc<E>,
	state: Arc<Mutex<PositionState>>,
	intents: mpsc::Receiver<SeekIntent>,
	cancel: CancellationToken,
}

impl<E: MediaEngine> SeekExecutor<E> {
	async fn run(mut self) {
		loop {
			let intent = tokio::select! {
				biased;
				_ = self.cancel.cancelled() => break,
				intent = self.intents.recv() => match intent {
					Some(intent) => intent,
					None => break,
				},
			};

			let engine_ok = tokio::select! {
				biased;
				_ = self.cancel.cancelled() => break,
				ok = self.engine.seek(intent.target, intent.tolerance) => ok,
			};

			let stale = self.state.lock().unwrap_or_else(PoisonError::into_inner).complete(intent.generation);
			if stale {
				debug!(seek_target = intent.target, generation = intent.generation, "stale seek completion, state untouched");
			}

			// Caller may have dropped its receiver; that is fine.
			let _ = intent.completion.send(SeekOutcome { engine_ok, stale });
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clamp_target_bounds() {
		assert_eq!(clamp_target(500.0, 100.0), 99.0);
		assert_eq!(clamp_target(-5.0, 100.0), 0.0);
		assert_eq!(clamp_target(50.0, 100.0), 50.0);
		// Unknown duration: only the lower bound applies.
		assert_eq!(clamp_target(-5.0, 0.0), 0.0);
		assert_eq!(clamp_target(123.4, 0.0), 123.4);
		// Degenerate sub-second duration must not clamp negative.
		assert_eq!(clamp_target(0.4, 0.5), 0.0);
	}
}
