pub mod cursor;
pub mod frame;
#[cfg(feature = "desktop")]
pub mod opencv;
pub mod source;

pub use cursor::{FrameCursor, VideoCursor, SEEK_EPSILON};
pub use frame::Frame;
#[cfg(feature = "desktop")]
pub use opencv::{probe_metadata, OpenCvVideoSource};
pub use source::{VideoMetadata, VideoSource};
