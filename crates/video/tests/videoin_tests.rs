use {
    base::Vec2,
    image::{Image, PixelFormat},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tokio::{sync::Mutex, time::timeout},
    video::{FrameSource, VideoError, VideoIn, VideoInConfig, VideoInDevice},
};

// Produces 1x1 grayscale frames whose value is the frame number, until
// `limit` frames have been produced.
struct CountingDevice {
    next: u8,
    limit: Option<u8>,
    rewinds: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl CountingDevice {
    fn new(limit: Option<u8>) -> Self {
        Self {
            next: 0,
            limit,
            rewinds: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl VideoInDevice for CountingDevice {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        Ok(config.clone().with_size(Vec2::new(1, 1)))
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        if self.limit.is_some_and(|limit| self.next >= limit) {
            return Err(VideoError::Stream("unplugged".to_string()));
        }
        std::thread::sleep(Duration::from_millis(1));
        let frame = Image::new(Vec2::new(1, 1), vec![self.next], PixelFormat::Luma8);
        self.next = self.next.wrapping_add(1);
        Ok(frame)
    }

    fn rewind(&mut self) -> bool {
        self.rewinds.fetch_add(1, Ordering::SeqCst);
        self.next = 0;
        true
    }
}

struct BrokenDevice;

impl VideoInDevice for BrokenDevice {
    fn open(&mut self, _config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        Err(VideoError::Device("no such camera".to_string()))
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        unreachable!("capture on a device that never opened")
    }
}

async fn capture(videoin: &mut VideoIn) -> Result<Image, VideoError> {
    timeout(Duration::from_secs(5), videoin.capture())
        .await
        .expect("capture timed out")
}

#[tokio::test]
async fn test_frames_arrive_as_rgb8_in_order() {
    let mut videoin = VideoIn::open_device(Box::new(CountingDevice::new(None)), VideoInConfig::default())
        .await
        .unwrap();

    assert_eq!(videoin.config().size, Some(Vec2::new(1, 1)));

    for expected in 0..3u8 {
        let frame = capture(&mut videoin).await.unwrap();
        assert_eq!(frame.format, PixelFormat::Rgb8);
        assert_eq!(frame.data, vec![expected; 3]);
    }
}

#[tokio::test]
async fn test_open_failure_is_reported() {
    let result = VideoIn::open_device(Box::new(BrokenDevice), VideoInConfig::default()).await;

    match result {
        Err(VideoError::Device(msg)) => assert!(msg.contains("no such camera")),
        Err(other) => panic!("expected device error, got {}", other),
        Ok(_) => panic!("expected open to fail"),
    }
}

#[tokio::test]
async fn test_capture_error_ends_the_stream() {
    let device = CountingDevice::new(Some(2));
    let closed = Arc::clone(&device.closed);
    let mut videoin = VideoIn::open_device(Box::new(device), VideoInConfig::default())
        .await
        .unwrap();

    assert!(capture(&mut videoin).await.is_ok());
    assert!(capture(&mut videoin).await.is_ok());
    assert!(matches!(capture(&mut videoin).await, Err(VideoError::Stream(_))));
    assert!(videoin.is_closed());
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_reset_rewinds_device() {
    let device = CountingDevice::new(None);
    let rewinds = Arc::clone(&device.rewinds);
    let mut videoin = VideoIn::open_device(Box::new(device), VideoInConfig::default())
        .await
        .unwrap();

    // let the channel fill so the worker is parked on a send
    capture(&mut videoin).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    videoin.reset();

    // at most one in-flight frame can arrive before the rewound one
    let mut saw_restart = false;
    for _ in 0..3 {
        let frame = capture(&mut videoin).await.unwrap();
        if frame.data[0] == 0 {
            saw_restart = true;
            break;
        }
    }
    assert!(saw_restart);
    assert_eq!(rewinds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_drop_stops_worker() {
    let device = CountingDevice::new(None);
    let closed = Arc::clone(&device.closed);
    let mut videoin = VideoIn::open_device(Box::new(device), VideoInConfig::default())
        .await
        .unwrap();
    capture(&mut videoin).await.unwrap();

    drop(videoin);

    let stopped = timeout(Duration::from_secs(5), async {
        while !closed.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(stopped.is_ok());
}

#[tokio::test]
async fn test_shared_camera_reads_through_guard() {
    let videoin = VideoIn::open_device(Box::new(CountingDevice::new(None)), VideoInConfig::default())
        .await
        .unwrap();
    let shared = Arc::new(Mutex::new(videoin));

    let mut guard = Arc::clone(&shared).lock_owned().await;
    let frame = timeout(Duration::from_secs(5), guard.read())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(frame.size, Vec2::new(1, 1));

    // a second consumer waits while the guard is held
    assert!(shared.try_lock().is_err());
    drop(guard);
    assert!(shared.try_lock().is_ok());
}

#[test]
fn test_config_builders() {
    let config = VideoInConfig::default()
        .with_index(2)
        .with_path("/dev/video2")
        .with_size(Vec2::new(640, 480))
        .with_frame_rate(None);

    assert_eq!(config.index, 2);
    assert_eq!(config.path.as_deref(), Some(std::path::Path::new("/dev/video2")));
    assert_eq!(config.size, Some(Vec2::new(640, 480)));
    assert_eq!(config.frame_rate, None);
    assert_eq!(VideoInConfig::default().frame_rate, Some(60.0));
}
