use {crate::*, base::Vec2};

/// A captured frame: packed pixels in row-major order, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// An `Rgb8` image filled with a single color.
    pub fn filled(size: Vec2<usize>, rgb: [u8; 3]) -> Self {
        let data = rgb.iter().copied().cycle().take(size.area() * 3).collect();
        Self::new(size, data, PixelFormat::Rgb8)
    }

    /// Check that the buffer holds exactly `width * height` pixels.
    ///
    /// Compressed formats carry no fixed length and always pass.
    pub fn ensure_len(&self) -> Result<(), ImageError> {
        if let Some(bpp) = self.format.bytes_per_pixel() {
            let expected = self.size.area() * bpp;
            if self.data.len() != expected {
                return Err(ImageError::Size {
                    expected,
                    actual: self.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Convert to packed `Rgb8`.
    pub fn to_rgb8(&self) -> Result<Image, ImageError> {
        self.ensure_len()?;
        match self.format {
            PixelFormat::Rgb8 => Ok(self.clone()),
            PixelFormat::Luma8 => Ok(Image::new(
                self.size,
                self.data.iter().flat_map(|&l| [l, l, l]).collect(),
                PixelFormat::Rgb8,
            )),
            PixelFormat::Yuyv => Ok(Image::new(
                self.size,
                yuyv_to_rgb(self.size, &self.data),
                PixelFormat::Rgb8,
            )),
            PixelFormat::Jpeg => jpeg_to_rgb(self),
        }
    }

    /// Convert to single-channel `Luma8`.
    pub fn to_luma8(&self) -> Result<Image, ImageError> {
        self.ensure_len()?;
        let data = match self.format {
            PixelFormat::Luma8 => return Ok(self.clone()),
            PixelFormat::Rgb8 => rgb_to_luma(&self.data),
            PixelFormat::Yuyv => yuyv_to_luma(&self.data),
            PixelFormat::Jpeg => rgb_to_luma(&jpeg_to_rgb(self)?.data),
        };
        Ok(Image::new(self.size, data, PixelFormat::Luma8))
    }
}
