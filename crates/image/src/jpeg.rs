use crate::*;
use base::Vec2;
use crates_image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};

fn write_jpeg(
    size: Vec2<usize>,
    data: &[u8],
    color_type: ExtendedColorType,
    quality: Option<u8>,
) -> Result<Vec<u8>, ImageError> {
    if size.x == 0 || size.y == 0 {
        return Err(ImageError::Encode(format!("cannot encode empty image {}", size)));
    }
    let mut buffer = Vec::new();
    let encoder = match quality {
        Some(quality) => JpegEncoder::new_with_quality(&mut buffer, quality),
        None => JpegEncoder::new(&mut buffer),
    };
    encoder
        .write_image(data, size.x as u32, size.y as u32, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode packed RGB as JPEG.
///
/// `quality` is 1-100; `None` leaves it at the encoder default.
pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: Option<u8>) -> Result<Vec<u8>, ImageError> {
    let expected = size.area() * 3;
    if data.len() != expected {
        return Err(ImageError::Size {
            expected,
            actual: data.len(),
        });
    }
    write_jpeg(size, data, ExtendedColorType::Rgb8, quality)
}

/// Encode any `Image` as JPEG. JPEG input is passed through untouched.
pub fn encode_jpeg(image: &Image, quality: Option<u8>) -> Result<Vec<u8>, ImageError> {
    image.ensure_len()?;
    match image.format {
        PixelFormat::Jpeg => Ok(image.data.clone()),
        PixelFormat::Rgb8 => rgb_to_jpeg(image.size, &image.data, quality),
        PixelFormat::Luma8 => write_jpeg(image.size, &image.data, ExtendedColorType::L8, quality),
        PixelFormat::Yuyv => rgb_to_jpeg(image.size, &yuyv_to_rgb(image.size, &image.data), quality),
    }
}
