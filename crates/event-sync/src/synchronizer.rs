use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::task::SyncTask;
use crate::traits::{EventFetcher, RealtimeChannel};
use crate::types::{EventId, EventUpdate, SessionId};

/// Running state for one synchronized event.
struct SyncHandle {
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

/// Combines an initial fetch, a real-time subscription and a polling fallback
/// into one deduplicated update stream per event id.
///
/// Each started event id is backed by a dedicated task that exclusively owns
/// its poll timer and subscription; [`stop`](Self::stop) tears both down and
/// guarantees no update is delivered afterwards.
pub struct EventSynchronizer<F, C> {
	fetcher: Arc<F>,
	channel: Arc<C>,
	config: SyncConfig,
	active: HashMap<EventId, SyncHandle>,
	/// Cancelled tasks still tearing down (timer cancel + unsubscribe). A later
	/// `start` of the same id awaits the parked handle before subscribing.
	draining: HashMap<EventId, JoinHandle<()>>,
	shutdown: CancellationToken,
}

impl<F: EventFetcher, C: RealtimeChannel> EventSynchronizer<F, C> {
	pub fn new(fetcher: Arc<F>, channel: Arc<C>, config: SyncConfig) -> Self {
		Self {
			fetcher,
			channel,
			config,
			active: HashMap::new(),
			draining: HashMap::new(),
			shutdown: CancellationToken::new(),
		}
	}

	/// Start synchronizing an event and return its update stream.
	///
	/// Restart-safe: an already-running task for the same id is cancelled
	/// first, and the new task waits out its teardown before subscribing, so
	/// neither its timer nor its subscription leaks into the new instance.
	/// The same applies across an explicit [`stop`](Self::stop).
	pub fn start(&mut self, event_id: EventId, session_id: SessionId) -> mpsc::Receiver<EventUpdate> {
		self.stop(&event_id);
		let predecessor = self.draining.remove(&event_id);

		let (updates_tx, updates_rx) = mpsc::channel(self.config.update_buffer);
		let cancel = self.shutdown.child_token();
		let task = SyncTask {
			fetcher: Arc::clone(&self.fetcher),
			channel: Arc::clone(&self.channel),
			event_id: event_id.clone(),
			session_id,
			updates: updates_tx,
			poll_interval: self.config.poll_interval,
			cancel: cancel.clone(),
			predecessor,
		};

		info!(event_id = %event_id, "starting event sync");
		let handle = SyncHandle {
			cancel,
			task: tokio::spawn(task.run()),
		};
		self.active.insert(event_id, handle);

		updates_rx
	}

	/// Stop synchronizing an event. No-op for ids that are not running.
	///
	/// Cancellation is immediate: any fetch still in flight completes but its
	/// result is discarded, and no update is delivered after this call.
	pub fn stop(&mut self, event_id: &EventId) {
		if let Some(handle) = self.active.remove(event_id) {
			debug!(event_id = %event_id, "stopping event sync");
			handle.cancel.cancel();
			// The task finishes its teardown (timer cancel + unsubscribe) on
			// its own; no update can be delivered past this point. The handle
			// is parked so a restart of this id cannot subscribe while the
			// old unsubscribe is still in flight.
			self.draining.insert(event_id.clone(), handle.task);
		}
	}

	/// Whether a task is currently running for `event_id`.
	pub fn is_active(&self, event_id: &EventId) -> bool {
		self.active.contains_key(event_id)
	}

	/// Stop every running task and wait for the teardown (including channel
	/// unsubscribes) to finish.
	pub async fn shutdown(mut self) {
		self.shutdown.cancel();
		for (event_id, handle) in self.active.drain() {
			if handle.task.await.is_err() {
				debug!(event_id = %event_id, "sync task aborted during shutdown");
			}
		}
		for (event_id, task) in self.draining.drain() {
			if task.await.is_err() {
				debug!(event_id = %event_id, "draining sync task aborted during shutdown");
			}
		}
	}
}

impl<F, C> Drop for EventSynchronizer<F, C> {
	fn drop(&mut self) {
		self.shutdown.cancel();
	}
}
