//! Frame buffers and pixel conversions.
//!
//! An `Image` is a tightly packed pixel buffer tagged with its `PixelFormat`.
//! Raw camera formats are converted to `Rgb8` for processing, reduced to
//! `Luma8` for comparisons, and encoded to JPEG for streaming. The codec work
//! is done by the `image` crate.

pub mod error;
pub mod image;
pub mod jpeg;
pub mod luma;
pub mod pixelformat;
pub mod rgb;

pub use error::ImageError;
pub use image::Image;
pub use jpeg::*;
pub use luma::*;
pub use pixelformat::*;
pub use rgb::*;
