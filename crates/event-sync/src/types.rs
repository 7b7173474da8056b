use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::snapshot::EventSnapshot;

/// Event identifier as assigned by the backing API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Arc<str>);

impl EventId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EventId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for EventId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// Per-installation pseudo-identity used to scope real-time subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Arc<str>);

impl SessionId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for SessionId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// Opaque token signaling that a newer snapshot of an event exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateId(Arc<str>);

impl UpdateId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for UpdateId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for UpdateId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// Inbound message on an event's real-time channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelMessage {
	/// Current number of live viewers for the event.
	ViewerTotal { total: u64 },
	/// A newer snapshot of the event exists and should be fetched.
	UpdateAvailable { update_id: UpdateId },
}

/// Update delivered to the consumer of a running synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum EventUpdate {
	/// Forwarded viewer-count notification; no refetch involved.
	ViewerCount(u64),
	/// A freshly fetched snapshot (initial, push-triggered or poll-driven).
	Snapshot(EventSnapshot),
}
