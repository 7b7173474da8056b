#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::sync::{Arc, Mutex};
	use std::time::Duration;

	use async_trait::async_trait;
	use seek_control::{MediaDuration, MediaEngine, Seconds, SeekController, SeekError, SeekTolerance, SeekableRange};

	const WINDOW: Duration = Duration::from_millis(300);

	// ============================================================================
	// FAKE MEDIA ENGINE
	// ============================================================================

	struct FakeEngine {
		time: Mutex<Seconds>,
		duration: Mutex<MediaDuration>,
		ranges: Mutex<Vec<SeekableRange>>,
		seeks: Mutex<Vec<Seconds>>,
		seek_delay: Mutex<Duration>,
		seek_result: AtomicBool,
	}

	impl FakeEngine {
		fn new(time: Seconds, duration: MediaDuration) -> Arc<Self> {
			Arc::new(Self {
				time: Mutex::new(time),
				duration: Mutex::new(duration),
				ranges: Mutex::new(Vec::new()),
				seeks: Mutex::new(Vec::new()),
				seek_delay: Mutex::new(Duration::ZERO),
				seek_result: AtomicBool::new(true),
			})
		}

		fn vod(duration: Seconds) -> Arc<Self> {
			Self::new(0.0, MediaDuration::Known(duration))
		}

		fn set_ranges(&self, ranges: Vec<SeekableRange>) {
			*self.ranges.lock().unwrap() = ranges;
		}

		fn set_seek_delay(&self, delay: Duration) {
			*self.seek_delay.lock().unwrap() = delay;
		}

		fn set_seek_result(&self, ok: bool) {
			self.seek_result.store(ok, Ordering::SeqCst);
		}

		fn seeks(&self) -> Vec<Seconds> {
			self.seeks.lock().unwrap().clone()
		}
	}

	#[async_trait]
	impl MediaEngine for FakeEngine {
		async fn seek(&self, target: Seconds, _tolerance: SeekTolerance) -> bool {
			self.seeks.lock().unwrap().push(target);
			let delay = *self.seek_delay.lock().unwrap();
			if delay > Duration::ZERO {
				tokio::time::sleep(delay).await;
			}
			*self.time.lock().unwrap() = target;
			self.seek_result.load(Ordering::SeqCst)
		}

		fn current_time(&self) -> Seconds {
			*self.time.lock().unwrap()
		}

		fn duration(&self) -> MediaDuration {
			*self.duration.lock().unwrap()
		}

		fn seekable_ranges(&self) -> Vec<SeekableRange> {
			self.ranges.lock().unwrap().clone()
		}
	}

	// ============================================================================
	// DEBOUNCE + OPTIMISTIC POSITION
	// ============================================================================

	#[tokio::test(start_paused = true)]
	async fn test_rapid_seeks_collapse_to_the_last_command() {
		let engine = FakeEngine::vod(100.0);
		let controller = SeekController::new(engine.clone());

		let first = controller.seek_to(10.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 10.0);
		assert!(controller.is_seeking());

		let second = controller.seek_to(20.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 20.0);

		let third = controller.seek_to(30.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 30.0);

		// Superseded before dispatch: never executed, senders dropped.
		assert!(first.await.is_err());
		assert!(second.await.is_err());

		let outcome = third.await.unwrap();
		assert!(outcome.engine_ok);
		assert!(!outcome.stale);

		assert_eq!(engine.seeks(), vec![30.0], "exactly one command may reach the engine");
		assert!(!controller.is_seeking());
		assert_eq!(controller.optimistic_time(), 30.0, "optimistic now tracks the engine again");
	}

	#[tokio::test(start_paused = true)]
	async fn test_optimistic_update_is_synchronous() {
		let engine = FakeEngine::vod(100.0);
		let controller = SeekController::new(engine.clone());

		let _rx = controller.seek_to(42.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		// No awaits between the call and these reads.
		assert_eq!(controller.optimistic_time(), 42.0);
		assert!(controller.is_seeking());
		assert!(engine.seeks().is_empty(), "command must still be debounced");
	}

	#[tokio::test(start_paused = true)]
	async fn test_stale_completion_never_wins_the_state_race() {
		let engine = FakeEngine::vod(100.0);
		engine.set_seek_delay(Duration::from_secs(5));
		let controller = SeekController::new(engine.clone());

		let first = controller.seek_to(10.0, SeekTolerance::INFINITE, Duration::ZERO).unwrap();
		// Let the first command get dispatched to the engine.
		tokio::time::sleep(Duration::from_secs(1)).await;
		let second = controller.seek_to(20.0, SeekTolerance::INFINITE, Duration::ZERO).unwrap();

		// First completion is stale: observable, but state stays on the newer intent.
		let outcome = first.await.unwrap();
		assert!(outcome.engine_ok);
		assert!(outcome.stale);
		assert!(controller.is_seeking());
		assert_eq!(controller.optimistic_time(), 20.0);

		// Second completion is the latest and clears the override.
		let outcome = second.await.unwrap();
		assert!(!outcome.stale);
		assert!(!controller.is_seeking());
		assert_eq!(controller.optimistic_time(), 20.0);

		assert_eq!(engine.seeks(), vec![10.0, 20.0]);
	}

	// ============================================================================
	// RELATIVE SEEKS
	// ============================================================================

	#[tokio::test(start_paused = true)]
	async fn test_relative_seeks_compose_on_optimistic_time() {
		let engine = FakeEngine::new(10.0, MediaDuration::Known(100.0));
		let controller = SeekController::new(engine.clone());

		let _first = controller.seek_by(5.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 15.0);

		let second = controller.seek_by(10.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 25.0, "relative seeks accumulate against intent, not engine time");

		second.await.unwrap();
		assert_eq!(engine.seeks(), vec![25.0]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_relative_seek_clamps_to_zero() {
		let engine = FakeEngine::new(2.0, MediaDuration::Known(100.0));
		let controller = SeekController::new(engine.clone());

		let rx = controller.seek_by(-5.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 0.0);

		rx.await.unwrap();
		assert_eq!(engine.seeks(), vec![0.0]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_relative_seek_without_duration_is_rejected() {
		let engine = FakeEngine::new(0.0, MediaDuration::Indeterminate);
		let controller = SeekController::new(engine);

		let err = controller.seek_by(5.0, SeekTolerance::INFINITE, WINDOW).unwrap_err();
		assert_eq!(err, SeekError::DurationUnknown);
	}

	// ============================================================================
	// CLAMPING + DURATION RESOLUTION
	// ============================================================================

	#[tokio::test(start_paused = true)]
	async fn test_absolute_seek_clamps_to_duration() {
		let engine = FakeEngine::vod(100.0);
		let controller = SeekController::new(engine.clone());

		let rx = controller.seek_to(500.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 99.0);
		rx.await.unwrap();
		assert_eq!(engine.seeks(), vec![99.0]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_live_duration_resolves_to_seekable_edge() {
		let engine = FakeEngine::new(50.0, MediaDuration::Indeterminate);
		engine.set_ranges(vec![SeekableRange::new(0.0, 30.0), SeekableRange::new(10.0, 70.0)]);
		let controller = SeekController::new(engine.clone());

		assert_eq!(controller.duration(), 80.0);

		let rx = controller.seek_to(200.0, SeekTolerance::INFINITE, WINDOW).unwrap();
		assert_eq!(controller.optimistic_time(), 79.0, "must not seek past the live edge");
		rx.await.unwrap();
	}

	#[tokio::test(start_paused = true)]
	async fn test_live_duration_falls_back_to_current_time() {
		let engine = FakeEngine::new(42.0, MediaDuration::Indeterminate);
		let controller = SeekController::new(engine);

		assert_eq!(controller.duration(), 42.0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_current_time_is_rounded_to_a_tenth() {
		let engine = FakeEngine::new(12.34, MediaDuration::Known(100.0));
		let controller = SeekController::new(engine);

		assert_eq!(controller.current_time(), 12.3);
		assert_eq!(controller.optimistic_time(), 12.3);
	}

	// ============================================================================
	// FAILURE REPORTING
	// ============================================================================

	#[tokio::test(start_paused = true)]
	async fn test_engine_failure_is_reported_but_recency_still_clears() {
		let engine = FakeEngine::vod(100.0);
		engine.set_seek_result(false);
		let controller = SeekController::new(engine.clone());

		let outcome = controller.seek_to(10.0, SeekTolerance::INFINITE, WINDOW).unwrap().await.unwrap();
		assert!(!outcome.engine_ok);
		assert!(!outcome.stale);

		// Clearing is driven by recency, not by success.
		assert!(!controller.is_seeking());

		// Failures never block subsequent seeks.
		engine.set_seek_result(true);
		let outcome = controller.seek_to(20.0, SeekTolerance::INFINITE, WINDOW).unwrap().await.unwrap();
		assert!(outcome.engine_ok);
	}
}
