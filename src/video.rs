pub mod frame_rate;
pub mod timeline;

pub use frame_rate::{FrameRate, FrameRateFormatError};
pub use timeline::{Run, TelemetryClock, Timeline, VideoFrames};

pub type FrameIndex = u32;
