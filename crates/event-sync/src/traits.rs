use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{ChannelError, FetchError};
use crate::snapshot::EventSnapshot;
use crate::types::{ChannelMessage, EventId, SessionId, UpdateId};

/// Capability to fetch the current snapshot of an event.
///
/// `update_id` is a cache/consistency hint carried over from a push
/// notification; it is never required for correctness.
#[async_trait]
pub trait EventFetcher: Send + Sync + 'static {
	async fn fetch(&self, event_id: &EventId, update_id: Option<&UpdateId>) -> Result<EventSnapshot, FetchError>;
}

/// Capability to open a real-time message channel for an event.
///
/// Reconnection is this collaborator's responsibility: the synchronizer only
/// observes messages, and treats a closed receiver as the channel going silent.
#[async_trait]
pub trait RealtimeChannel: Send + Sync + 'static {
	/// Open the channel for `(event_id, session_id)` and return its message stream.
	async fn subscribe(&self, event_id: &EventId, session_id: &SessionId) -> Result<mpsc::Receiver<ChannelMessage>, ChannelError>;

	/// Tear down the channel for `event_id`. Must tolerate unknown ids.
	async fn unsubscribe(&self, event_id: &EventId);
}
