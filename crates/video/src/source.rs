use {
    crate::*,
    image::Image,
    std::future::Future,
    tokio::sync::OwnedMutexGuard,
};

/// Anything that can feed frames to a pipeline.
pub trait FrameSource: Send {
    /// Wait for the next frame. An error means the source is exhausted.
    fn read(&mut self) -> impl Future<Output = Result<Image, VideoError>> + Send;

    /// Best-effort rewind to the first frame. Live sources may ignore this.
    fn reset(&mut self);
}

impl FrameSource for VideoIn {
    fn read(&mut self) -> impl Future<Output = Result<Image, VideoError>> + Send {
        self.capture()
    }

    fn reset(&mut self) {
        VideoIn::reset(self);
    }
}

// lets a pipeline hold a camera shared behind `Arc<tokio::sync::Mutex<_>>`
impl<T: FrameSource> FrameSource for OwnedMutexGuard<T> {
    fn read(&mut self) -> impl Future<Output = Result<Image, VideoError>> + Send {
        (**self).read()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
