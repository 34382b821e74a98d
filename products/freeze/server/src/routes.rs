use {
    crate::config::DEFAULT_CAMERA_WAIT,
    axum::{
        Json, Router,
        body::Body,
        extract::State,
        http::{StatusCode, header},
        response::{Html, IntoResponse, Response},
        routing::get,
    },
    motion::{Controller, FramePipeline, MotionDetector, PipelineConfig, multipart},
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
    tokio::sync::Mutex,
    tokio_util::sync::CancellationToken,
    video::{VideoError, VideoIn, VideoInConfig, VideoInDevice},
};

const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

/// Makes a fresh capture device when the camera has to be reopened.
pub type CameraFactory =
    Arc<dyn Fn() -> Result<Box<dyn VideoInDevice>, VideoError> + Send + Sync>;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// One feed holds the camera at a time.
    pub camera: Arc<Mutex<VideoIn>>,
    pub camera_config: VideoInConfig,
    pub camera_factory: CameraFactory,
    pub camera_wait: Duration,
    pub controller: Arc<Controller>,
    pub detector: Arc<MotionDetector>,
    pub pipeline: PipelineConfig,
    pub ws_port: u16,
    pub cancel: CancellationToken,
}

impl AppState {
    pub fn new(
        camera: VideoIn,
        camera_factory: CameraFactory,
        controller: Arc<Controller>,
        detector: MotionDetector,
        ws_port: u16,
        cancel: CancellationToken,
    ) -> Self {
        let camera_config = camera.config().clone();
        Self {
            camera: Arc::new(Mutex::new(camera)),
            camera_config,
            camera_factory,
            camera_wait: DEFAULT_CAMERA_WAIT,
            controller,
            detector: Arc::new(detector),
            pipeline: PipelineConfig::default(),
            ws_port,
            cancel,
        }
    }

    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_camera_wait(mut self, wait: Duration) -> Self {
        self.camera_wait = wait;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub phase: String,
    pub level: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/status", get(status))
        .with_state(state)
}

pub fn render_index(ws_port: u16) -> String {
    INDEX_TEMPLATE.replace("{{WS_PORT}}", &ws_port.to_string())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.ws_port))
}

async fn status(State(state): State<AppState>) -> Json<Status> {
    let current = state.controller.state();
    Json(Status {
        phase: current.phase.as_str().to_string(),
        level: current.level,
    })
}

async fn video_feed(State(state): State<AppState>) -> Response {
    let lock = Arc::clone(&state.camera).lock_owned();
    let Ok(mut camera) = tokio::time::timeout(state.camera_wait, lock).await else {
        log::warn!("video feed refused, camera is streaming elsewhere");
        return (StatusCode::SERVICE_UNAVAILABLE, "camera is busy").into_response();
    };

    if camera.is_closed() {
        log::info!("camera worker stopped, reopening");
        let reopened = match (state.camera_factory)() {
            Ok(device) => VideoIn::open_device(device, state.camera_config.clone()).await,
            Err(error) => Err(error),
        };
        match reopened {
            Ok(videoin) => *camera = videoin,
            Err(error) => {
                log::error!("cannot reopen camera: {}", error);
                return (StatusCode::SERVICE_UNAVAILABLE, "camera unavailable").into_response();
            }
        }
    }

    log::info!("video feed started");
    let pipeline = FramePipeline::new(
        camera,
        Arc::clone(&state.controller),
        Arc::clone(&state.detector),
        state.pipeline.clone(),
        state.cancel.child_token(),
    );

    (
        [
            (header::CONTENT_TYPE, multipart::CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(pipeline.into_stream()),
    )
        .into_response()
}
