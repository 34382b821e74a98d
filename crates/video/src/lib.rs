//! Video capture for the motion pipeline.
//!
//! `VideoIn` runs a `VideoInDevice` on a blocking worker thread and hands
//! `Rgb8` frames to async code through a bounded channel. `FrameSource` is the
//! seam the pipeline reads through.

pub mod error;
pub mod source;
pub mod videoin;

pub use error::VideoError;
pub use source::FrameSource;
pub use videoin::{VideoIn, VideoInConfig, VideoInDevice, default_device};
