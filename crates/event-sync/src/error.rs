use thiserror::Error;

/// Failure reported by the event-fetch collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	#[error("network error: {0}")]
	Network(String),

	#[error("decode error: {0}")]
	Decode(String),

	#[error("event not found")]
	NotFound,
}

/// Failure reported by the real-time channel collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
	#[error("channel unavailable: {0}")]
	Unavailable(String),

	#[error("already subscribed to event {0}")]
	AlreadySubscribed(String),
}
