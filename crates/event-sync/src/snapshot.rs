use serde::{Deserialize, Serialize};

use crate::types::{EventId, UpdateId};

/// A versioned, immutable view of a live event's metadata and assigned streams.
///
/// Superseded, never mutated: each successful fetch produces a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
	pub id: EventId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Empty until a live stream has been assigned to the event.
	#[serde(default)]
	pub streams: Vec<StreamDescriptor>,
	/// Consistency token carried by the snapshot, when the API provides one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub update_id: Option<UpdateId>,
}

impl EventSnapshot {
	pub fn new(id: impl Into<EventId>) -> Self {
		Self {
			id: id.into(),
			title: None,
			streams: Vec::new(),
			update_id: None,
		}
	}

	pub fn has_streams(&self) -> bool {
		!self.streams.is_empty()
	}
}

/// One playable stream assigned to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_url: Option<String>,
	/// URL of the FairPlay-protected variant, published when no clear stream is.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fairplay_url: Option<String>,
	/// Size of the DVR window in milliseconds, if the stream has one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dvr_window_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<StreamErrorCode>,
}

impl StreamDescriptor {
	pub fn new(id: impl Into<String>, full_url: Option<String>) -> Self {
		Self {
			id: id.into(),
			full_url,
			fairplay_url: None,
			dvr_window_ms: None,
			error: None,
		}
	}

	/// The URL to play: the clear stream when published, the FairPlay variant
	/// otherwise.
	pub fn url(&self) -> Option<&str> {
		self.full_url.as_deref().or(self.fairplay_url.as_deref())
	}

	pub fn is_playable(&self) -> bool {
		self.url().is_some() && self.error.is_none()
	}
}

/// Reason a stream cannot be played for this viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamErrorCode {
	Geoblocked,
	MissingEntitlement,
	Internal,
}
