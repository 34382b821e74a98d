use {
    crate::*,
    base::Vec2,
    image::Image,
    std::{
        path::PathBuf,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

// capacity of the video input channel
const CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInConfig {
    /// Device index, used when `path` is not set.
    pub index: usize,
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    pub frame_rate: Option<f32>,
}

impl Default for VideoInConfig {
    fn default() -> Self {
        Self {
            index: 0,
            path: None,
            size: None,
            frame_rate: Some(60.0),
        }
    }
}

impl VideoInConfig {
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: Option<f32>) -> Self {
        self.frame_rate = frame_rate;
        self
    }
}

/// A capture backend. All methods run on the worker thread.
pub trait VideoInDevice: Send {
    /// Open the device, returning the config that was actually applied.
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError>;

    /// Close the device, if open.
    fn close(&mut self);

    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;

    /// Seek back to the first frame. Returns false when unsupported.
    fn rewind(&mut self) -> bool {
        false
    }
}

/// The platform camera backend.
#[cfg(feature = "v4l2")]
pub fn default_device() -> Result<Box<dyn VideoInDevice>, VideoError> {
    Ok(Box::new(v4l2::V4l2::new()))
}

#[cfg(not(feature = "v4l2"))]
pub fn default_device() -> Result<Box<dyn VideoInDevice>, VideoError> {
    Err(VideoError::Device("no video backend compiled in".to_string()))
}

pub struct VideoIn {
    receiver: mpsc::Receiver<Image>,
    cancel: Arc<AtomicBool>,
    rewind: Arc<AtomicBool>,
    config: VideoInConfig,
    closed: bool,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn spawn_worker(
        mut device: Box<dyn VideoInDevice>,
        config: VideoInConfig,
        sender: mpsc::Sender<Image>,
        cancel: Arc<AtomicBool>,
        rewind: Arc<AtomicBool>,
        init_tx: oneshot::Sender<Result<VideoInConfig, VideoError>>,
    ) -> JoinHandle<()> {
        // open() runs on the same thread as blocking_capture(), some backends
        // have thread affinity
        spawn_blocking(move || {
            match device.open(&config) {
                Ok(config) => {
                    let _ = init_tx.send(Ok(config));
                }
                Err(error) => {
                    let _ = init_tx.send(Err(error));
                    return;
                }
            }

            log::info!("video worker: starting capture loop");
            while !cancel.load(Ordering::Relaxed) {
                if rewind.swap(false, Ordering::AcqRel) && !device.rewind() {
                    log::debug!("video worker: device cannot rewind, staying live");
                }

                let frame = match device.blocking_capture() {
                    Ok(frame) => frame,
                    Err(error) => {
                        log::error!("video worker: capture failed: {}", error);
                        break;
                    }
                };

                let frame = match frame.to_rgb8() {
                    Ok(frame) => frame,
                    Err(error) => {
                        log::warn!("video worker: dropping frame: {}", error);
                        continue;
                    }
                };

                if sender.blocking_send(frame).is_err() {
                    log::debug!("video worker: receiver dropped");
                    break;
                }
            }
            device.close();
            log::info!("video worker: stopped");
        })
    }

    /// Open the platform default camera.
    pub async fn open(config: VideoInConfig) -> Result<Self, VideoError> {
        Self::open_device(default_device()?, config).await
    }

    /// Start capturing from `device`.
    ///
    /// Returns once the device has been opened on the worker thread, or with
    /// the error it failed to open with.
    pub async fn open_device(
        device: Box<dyn VideoInDevice>,
        config: VideoInConfig,
    ) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel::<Image>(CHANNEL_CAPACITY);
        let (init_tx, init_rx) = oneshot::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let rewind = Arc::new(AtomicBool::new(false));

        let join_handle = Self::spawn_worker(
            device,
            config,
            sender,
            Arc::clone(&cancel),
            Arc::clone(&rewind),
            init_tx,
        );

        let config = init_rx
            .await
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))??;
        log::info!(
            "video input opened: {} @ {:?} fps",
            config
                .size
                .map(|size| size.to_string())
                .unwrap_or_else(|| "unknown size".to_string()),
            config.frame_rate
        );

        Ok(Self {
            receiver,
            cancel,
            rewind,
            config,
            closed: false,
            join_handle: Some(join_handle),
        })
    }

    /// The config the device actually accepted.
    pub fn config(&self) -> &VideoInConfig {
        &self.config
    }

    /// Whether the worker has stopped and every queued frame was consumed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Receive the next frame.
    ///
    /// Fails with `VideoError::Stream` once the worker has stopped.
    pub async fn capture(&mut self) -> Result<Image, VideoError> {
        match self.receiver.recv().await {
            Some(frame) => Ok(frame),
            None => {
                self.closed = true;
                Err(VideoError::Stream("video input channel closed".to_string()))
            }
        }
    }

    /// Drop queued frames and ask the device to seek back to its start.
    pub fn reset(&mut self) {
        self.rewind.store(true, Ordering::Release);
        let mut dropped = 0;
        while self.receiver.try_recv().is_ok() {
            dropped += 1;
        }
        log::debug!("video input reset, {} queued frames dropped", dropped);
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}

#[cfg(feature = "v4l2")]
pub mod v4l2;
