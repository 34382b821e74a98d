/// Motion detector settings.
///
/// `threshold` is the per-pixel grayscale difference a pixel must exceed to
/// count as changed. `min_area` is the contour area a changed region must
/// exceed to count as motion. Lower values make the game stricter but let
/// sensor noise and lighting flicker through; higher values forgive small
/// fidgets.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    pub threshold: u8,
    pub min_area: f64,
    /// Text sent with every motion alert.
    pub message: String,
}

pub const DEFAULT_MESSAGE: &str =
    "Motion detected in this Level! Make sure you don't move while playing the game.";

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            min_area: 1000.0,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl MotionConfig {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    /// JPEG quality 1..=100. `None` leaves it to the encoder.
    pub jpeg_quality: Option<u8>,
}

impl PipelineConfig {
    pub fn with_jpeg_quality(mut self, quality: Option<u8>) -> Self {
        self.jpeg_quality = quality;
        self
    }
}
