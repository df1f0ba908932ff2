pub mod frame;
pub mod source;
pub mod testpattern;

pub use frame::VideoFrame;
pub use source::{CaptureConstraints, MediaError, MediaKind, MediaSource, MediaSourceFactory};
pub use testpattern::TestPatternSource;
