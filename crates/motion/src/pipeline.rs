use {
    crate::*,
    bytes::Bytes,
    futures_util::Stream,
    image::{Image, encode_jpeg},
    std::{convert::Infallible, sync::Arc},
    tokio::task::spawn_blocking,
    tokio_util::sync::CancellationToken,
    video::FrameSource,
};

/// Turns frames into multipart JPEG chunks while driving the `Controller`.
///
/// Every frame is emitted, paused or not. While the controller is detecting,
/// each frame is compared against the one before it and motion is reported.
/// The pipeline ends when the source runs dry or the token is cancelled.
pub struct FramePipeline<S> {
    source: S,
    controller: Arc<Controller>,
    detector: Arc<MotionDetector>,
    config: PipelineConfig,
    cancel: CancellationToken,
    previous: Option<Arc<Image>>,
    epoch: u64,
    done: bool,
}

impl<S: FrameSource + 'static> FramePipeline<S> {
    pub fn new(
        source: S,
        controller: Arc<Controller>,
        detector: Arc<MotionDetector>,
        config: PipelineConfig,
        cancel: CancellationToken,
    ) -> Self {
        let epoch = controller.epoch().current();
        Self {
            source,
            controller,
            detector,
            config,
            cancel,
            previous: None,
            epoch,
            done: false,
        }
    }

    // after a reset, frames from the previous level must not be compared
    fn sync_epoch(&mut self) {
        let epoch = self.controller.epoch().current();
        if epoch != self.epoch {
            self.epoch = epoch;
            self.previous = None;
            self.source.reset();
        }
    }

    /// Produce the next multipart chunk, or `None` once the pipeline is done.
    pub async fn next_chunk(&mut self) -> Option<Bytes> {
        while !self.done {
            self.sync_epoch();
            let epoch = self.epoch;

            let read = tokio::select! {
                _ = self.cancel.cancelled() => None,
                read = self.source.read() => Some(read),
            };
            let frame = match read {
                Some(Ok(frame)) => Arc::new(frame),
                Some(Err(error)) => {
                    log::info!("frame source ended: {}", error);
                    self.done = true;
                    return None;
                }
                None => {
                    log::debug!("frame pipeline cancelled");
                    self.done = true;
                    return None;
                }
            };

            let detecting = self.controller.is_detecting();
            let detector = Arc::clone(&self.detector);
            let previous = self.previous.replace(Arc::clone(&frame));
            let quality = self.config.jpeg_quality;
            let work = spawn_blocking(move || {
                let motion = detecting && detector.detect(&frame, previous.as_deref());
                (motion, encode_jpeg(&frame, quality))
            });

            let (motion, encoded) = match work.await {
                Ok(result) => result,
                Err(error) => {
                    log::error!("frame worker failed: {}", error);
                    self.done = true;
                    return None;
                }
            };

            // a reset while the frame was in flight makes the comparison stale
            if motion {
                if self.controller.epoch().is_current(epoch) {
                    self.controller.report_motion();
                } else {
                    log::debug!("discarding motion seen across a reset");
                }
            }

            match encoded {
                Ok(jpeg) => return Some(multipart::jpeg_part(&jpeg)),
                Err(error) => log::warn!("skipping frame: {}", error),
            }
        }
        None
    }

    /// Stream of chunks for an HTTP body. Dropping the stream drops the source.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
        futures_util::stream::unfold(self, |mut pipeline| async move {
            let chunk = pipeline.next_chunk().await?;
            Some((Ok(chunk), pipeline))
        })
    }
}

impl<S> Drop for FramePipeline<S> {
    fn drop(&mut self) {
        log::info!("video stream ended");
    }
}
