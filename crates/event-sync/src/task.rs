use std::sync::Arc;
use std::time::Duration;

use sync_timing::{RepeatingTimer, Tick};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::traits::{EventFetcher, RealtimeChannel};
use crate::types::{ChannelMessage, EventId, EventUpdate, SessionId, UpdateId};

/// Why a fetch is being issued; push-triggered refetches restart the poll countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchReason {
	Initial,
	Poll,
	PushUpdate,
}

/// Per-event synchronization task.
///
/// Owns all mutable state for one event id: the poll timer, the subscription
/// receiver and the last seen update id. Every fetch is awaited inline, so at
/// most one fetch per event is ever in flight and delivered snapshots are
/// monotonically fresh.
pub(crate) struct SyncTask<F, C> {
	pub(crate) fetcher: Arc<F>,
	pub(crate) channel: Arc<C>,
	pub(crate) event_id: EventId,
	pub(crate) session_id: SessionId,
	pub(crate) updates: mpsc::Sender<EventUpdate>,
	pub(crate) poll_interval: Duration,
	pub(crate) cancel: CancellationToken,
	/// The previous instance for this event id, already cancelled. Awaited
	/// before anything else so its unsubscribe cannot tear down the
	/// subscription this task is about to open.
	pub(crate) predecessor: Option<tokio::task::JoinHandle<()>>,
}

impl<F: EventFetcher, C: RealtimeChannel> SyncTask<F, C> {
	pub(crate) async fn run(mut self) {
		if let Some(predecessor) = self.predecessor.take() {
			let _ = predecessor.await;
		}

		let (timer, mut ticks) = RepeatingTimer::start(self.poll_interval);
		let mut last_update_id: Option<UpdateId> = None;

		// Initial fetch; subscription follows regardless of its outcome.
		let alive = self.fetch_and_publish(FetchReason::Initial, None, &timer, &mut ticks, &mut last_update_id).await;

		let mut messages = if alive {
			match self.subscribe().await {
				Some(Ok(rx)) => Some(rx),
				Some(Err(err)) => {
					warn!(event_id = %self.event_id, error = %err, "realtime subscribe failed, poll fallback only");
					None
				}
				// Cancelled mid-subscribe.
				None => None,
			}
		} else {
			None
		};

		if alive {
			loop {
				tokio::select! {
					biased;

					_ = self.cancel.cancelled() => break,

					Some(Tick) = ticks.recv() => {
						if !self.fetch_and_publish(FetchReason::Poll, None, &timer, &mut ticks, &mut last_update_id).await {
							break;
						}
					}

					// Pends forever once the channel is gone; the poll fallback
					// and cancellation arms stay live.
					msg = recv_message(&mut messages) => match msg {
						None => {
							debug!(event_id = %self.event_id, "realtime channel closed, poll fallback only");
							messages = None;
						}
						Some(ChannelMessage::ViewerTotal { total }) => {
							if !self.deliver(EventUpdate::ViewerCount(total)).await {
								break;
							}
						}
						Some(ChannelMessage::UpdateAvailable { update_id }) => {
							if last_update_id.as_ref() == Some(&update_id) {
								debug!(event_id = %self.event_id, update_id = %update_id, "duplicate update notification, skipping refetch");
								continue;
							}
							if !self.fetch_and_publish(FetchReason::PushUpdate, Some(&update_id), &timer, &mut ticks, &mut last_update_id).await {
								break;
							}
						}
					},
				}
			}
		}

		timer.cancel();
		self.channel.unsubscribe(&self.event_id).await;
		debug!(event_id = %self.event_id, "sync task stopped");
	}

	async fn subscribe(&self) -> Option<Result<mpsc::Receiver<ChannelMessage>, crate::error::ChannelError>> {
		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => None,
			res = self.channel.subscribe(&self.event_id, &self.session_id) => Some(res),
		}
	}

	/// Fetch the event, publish the snapshot and re-evaluate the poll fallback.
	///
	/// Returns `false` when the task should stop (cancelled, or the consumer
	/// dropped its receiver). A failed fetch delivers nothing and leaves the
	/// poll timer's suspended/active state untouched.
	async fn fetch_and_publish(&self, reason: FetchReason, hint: Option<&UpdateId>, timer: &RepeatingTimer, ticks: &mut mpsc::Receiver<Tick>, last_update_id: &mut Option<UpdateId>) -> bool {
		let fetched = tokio::select! {
			biased;
			_ = self.cancel.cancelled() => return false,
			res = self.fetcher.fetch(&self.event_id, hint) => res,
		};

		// Any tick that queued up while the fetch was in flight is stale.
		while ticks.try_recv().is_ok() {}

		let snapshot = match fetched {
			Ok(snapshot) => snapshot,
			Err(err) => {
				debug!(event_id = %self.event_id, error = %err, "event fetch failed");
				return true;
			}
		};

		if reason == FetchReason::PushUpdate {
			// Fresh data just arrived over the channel, restart the countdown.
			timer.reset();
		}

		// The dedup id commits only on a successful fetch: a failed hinted
		// refetch must leave a re-sent notification free to try again.
		if let Some(update_id) = snapshot.update_id.clone().or_else(|| hint.cloned()) {
			*last_update_id = Some(update_id);
		}

		if snapshot.has_streams() {
			timer.suspend();
		} else {
			debug!(event_id = %self.event_id, "no streams assigned yet, polling");
			timer.resume();
		}

		self.deliver(EventUpdate::Snapshot(snapshot)).await
	}

	/// Deliver an update unless the task has been cancelled. Cancellation wins
	/// over a ready send, so nothing is delivered after `stop`.
	async fn deliver(&self, update: EventUpdate) -> bool {
		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => false,
			res = self.updates.send(update) => res.is_ok(),
		}
	}
}

async fn recv_message(messages: &mut Option<mpsc::Receiver<ChannelMessage>>) -> Option<ChannelMessage> {
	match messages {
		Some(rx) => rx.recv().await,
		None => std::future::pending().await,
	}
}
