pub mod config;
pub mod error;
pub mod snapshot;
pub mod synchronizer;
pub mod traits;
pub mod types;

mod task;

pub use config::SyncConfig;
pub use error::{ChannelError, FetchError};
pub use snapshot::{EventSnapshot, StreamDescriptor, StreamErrorCode};
pub use synchronizer::EventSynchronizer;
pub use traits::{EventFetcher, RealtimeChannel};
pub use types::{ChannelMessage, EventId, EventUpdate, SessionId, UpdateId};
