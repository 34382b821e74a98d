use {
    axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    },
    base::Vec2,
    com::{WsClient, WsServer},
    freeze::{AppState, CameraFactory, Event, Status, router, run_control_surface},
    image::{Image, PixelFormat},
    motion::{Controller, MotionDetector, Phase},
    std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tokio::time::{sleep, timeout},
    tokio_util::sync::CancellationToken,
    tower::ServiceExt,
    video::{VideoError, VideoIn, VideoInConfig, VideoInDevice},
};

// a few gray frames, then the camera "unplugs"
struct ShortDevice {
    remaining: usize,
}

impl VideoInDevice for ShortDevice {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        Ok(config.clone().with_size(Vec2::new(16, 16)))
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        if self.remaining == 0 {
            return Err(VideoError::Stream("unplugged".to_string()));
        }
        self.remaining -= 1;
        Ok(Image::new(Vec2::new(16, 16), vec![128; 256], PixelFormat::Luma8))
    }
}

struct UnpluggedDevice;

impl VideoInDevice for UnpluggedDevice {
    fn open(&mut self, _config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        Err(VideoError::Device("no camera attached".to_string()))
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        Err(VideoError::Stream("not open".to_string()))
    }
}

// every device the factory makes plays `frames` frames
fn short_devices(frames: usize, opened: Arc<AtomicUsize>) -> CameraFactory {
    Arc::new(move || {
        opened.fetch_add(1, Ordering::SeqCst);
        Ok::<_, VideoError>(Box::new(ShortDevice { remaining: frames }) as Box<dyn VideoInDevice>)
    })
}

async fn state_with_factory(frames: usize, factory: CameraFactory) -> AppState {
    let camera = VideoIn::open_device(Box::new(ShortDevice { remaining: frames }), VideoInConfig::default())
        .await
        .unwrap();
    AppState::new(
        camera,
        factory,
        Arc::new(Controller::default()),
        MotionDetector::default(),
        5001,
        CancellationToken::new(),
    )
}

async fn state_with_frames(frames: usize) -> AppState {
    state_with_factory(frames, short_devices(frames, Arc::new(AtomicUsize::new(0)))).await
}

async fn count_parts(response: axum::response::Response) -> usize {
    let body = timeout(Duration::from_secs(5), to_bytes(response.into_body(), usize::MAX))
        .await
        .unwrap()
        .unwrap();
    body.windows(b"--frame\r\n".len())
        .filter(|w| *w == b"--frame\r\n")
        .count()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_index_carries_websocket_port() {
    let state = state_with_frames(0).await;
    let response = router(state).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("const WS_PORT = 5001;"));
    assert!(!page.contains("{{WS_PORT}}"));
    assert!(page.contains("Level 4 completed! Final level ahead!"));
}

#[tokio::test]
async fn test_status_reports_phase_and_level() {
    let state = state_with_frames(0).await;
    let controller = Arc::clone(&state.controller);
    controller.reset();
    controller.start();

    let response = router(state).oneshot(get("/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let status: Status = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        status,
        Status {
            phase: "detecting".to_string(),
            level: 1
        }
    );
}

#[tokio::test]
async fn test_video_feed_streams_until_camera_ends() {
    let state = state_with_frames(3).await;
    let response = router(state).oneshot(get("/video_feed")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "multipart/x-mixed-replace; boundary=frame"
    );

    assert_eq!(count_parts(response).await, 3);
}

#[tokio::test]
async fn test_dead_camera_is_reopened_from_factory() {
    let opened = Arc::new(AtomicUsize::new(0));
    let state = state_with_factory(2, short_devices(3, Arc::clone(&opened))).await;
    let app = router(state);

    let first = app.clone().oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(count_parts(first).await, 2);
    assert_eq!(opened.load(Ordering::SeqCst), 0);

    let second = app.oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(count_parts(second).await, 3);
    assert_eq!(opened.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_reopen_yields_503() {
    let factory: CameraFactory = Arc::new(|| Ok::<_, VideoError>(Box::new(UnpluggedDevice) as Box<dyn VideoInDevice>));
    let state = state_with_factory(0, factory).await;
    let app = router(state);

    // drains the original camera, which ends at once
    let first = app.clone().oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(count_parts(first).await, 0);

    let second = app.oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_busy_camera_yields_503() {
    let state = state_with_frames(1).await.with_camera_wait(Duration::from_millis(50));
    let held = Arc::clone(&state.camera).lock_owned().await;

    let response = router(state).oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    drop(held);
}

#[tokio::test]
async fn test_control_surface_round_trip() {
    let controller = Arc::new(Controller::new("freeze!"));
    let cancel = CancellationToken::new();
    let server = WsServer::<Event>::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    let bridge = tokio::spawn(run_control_surface(server, Arc::clone(&controller), cancel.clone()));

    let mut client = WsClient::<Event>::connect(addr).await.unwrap();
    client.send(&Event::StartDetection).await.unwrap();

    timeout(Duration::from_secs(5), async {
        while controller.state().phase != Phase::Detecting {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert!(controller.report_motion());
    let alert = timeout(Duration::from_secs(5), client.recv()).await.unwrap().unwrap();
    assert_eq!(alert, Event::from(motion::MotionEvent {
        message: "freeze!".to_string()
    }));
    assert_eq!(controller.state().phase, Phase::Paused);

    client.send(&Event::ResetVideoFeed).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while controller.state().level != 1 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(controller.state().phase, Phase::Idle);

    cancel.cancel();
    timeout(Duration::from_secs(5), bridge).await.unwrap().unwrap();
}
