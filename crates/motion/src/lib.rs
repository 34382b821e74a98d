//! Frame-differencing motion detection and the game state it drives.
//!
//! A `FramePipeline` pulls frames from a `video::FrameSource`, asks the
//! `MotionDetector` whether anything moved since the previous frame while the
//! `Controller` is detecting, and yields every frame as a multipart JPEG part.
//! Motion flips the controller to paused and publishes a `MotionEvent`.

pub mod config;
pub mod contour;
pub mod controller;
pub mod detector;
pub mod multipart;
pub mod pipeline;
pub mod state;

pub use config::*;
pub use contour::{Contour, Contours};
pub use controller::*;
pub use detector::MotionDetector;
pub use pipeline::FramePipeline;
pub use state::*;
