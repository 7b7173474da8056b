use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeekError {
	/// The engine reports no duration and no seekable range to anchor a
	/// relative seek against.
	#[error("media duration unknown")]
	DurationUnknown,

	/// The controller's executor task is gone (shut down or dropped).
	#[error("seek controller closed")]
	ControllerClosed,
}

pub type Result<T> = std::result::Result<T, SeekError>;
