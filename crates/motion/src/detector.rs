use {
    crate::*,
    image::Image,
};

/// Grayscale frame differencing.
///
/// Both frames are reduced to luma, their absolute difference is thresholded
/// into a binary mask, and motion is reported as soon as one outer contour of
/// the mask encloses more than `min_area`.
#[derive(Debug, Clone, Default)]
pub struct MotionDetector {
    config: MotionConfig,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Whether anything moved between `previous` and `current`.
    ///
    /// No previous frame, mismatched sizes and malformed buffers all count as
    /// no motion.
    pub fn detect(&self, current: &Image, previous: Option<&Image>) -> bool {
        let Some(previous) = previous else {
            return false;
        };
        if current.size != previous.size {
            log::debug!(
                "frame size changed from {} to {}, skipping comparison",
                previous.size,
                current.size
            );
            return false;
        }

        let (current_luma, previous_luma) = match (current.to_luma8(), previous.to_luma8()) {
            (Ok(current), Ok(previous)) => (current, previous),
            (Err(error), _) | (_, Err(error)) => {
                log::debug!("cannot compare frames: {}", error);
                return false;
            }
        };

        let mask = self.difference_mask(&current_luma.data, &previous_luma.data);
        Contours::new(&mask, current.size).any(|contour| contour.area() > self.config.min_area)
    }

    fn difference_mask(&self, a: &[u8], b: &[u8]) -> Vec<bool> {
        a.iter()
            .zip(b)
            .map(|(&a, &b)| a.abs_diff(b) > self.config.threshold)
            .collect()
    }
}
