use {
    base::Vec2,
    clap::{Arg, ArgMatches, Command, value_parser},
    log::LevelFilter,
    motion::{DEFAULT_MESSAGE, MotionConfig, PipelineConfig},
    std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration},
    video::VideoInConfig,
};

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_WS_ADDR: &str = "0.0.0.0:5001";

// how long a second viewer waits for the camera before giving up
pub const DEFAULT_CAMERA_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum ConfigError {
    Args(clap::Error),
    LogLevel(String),
    Missing(&'static str),
    /// `--min-area` was negative, infinite or NaN.
    MinArea(f64),
    /// Only one of width and height was given.
    PartialSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Args(err) => write!(f, "{err}"),
            ConfigError::LogLevel(level) => write!(f, "invalid log level: {level}"),
            ConfigError::Missing(id) => write!(f, "missing argument: --{id}"),
            ConfigError::MinArea(area) => {
                write!(f, "--min-area must be a finite, non-negative number, got {area}")
            }
            ConfigError::PartialSize => write!(f, "--width and --height must be given together"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<clap::Error> for ConfigError {
    fn from(err: clap::Error) -> Self {
        ConfigError::Args(err)
    }
}

pub fn command() -> Command {
    Command::new("freeze")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("camera")
                .short('c')
                .long("camera")
                .value_name("INDEX")
                .help("Camera index, used when --device is not given.")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("device")
                .long("device")
                .value_name("PATH")
                .help("Camera device path, e.g. /dev/video0.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("FPS")
                .help("Requested frame rate, 0 keeps the driver default.")
                .value_parser(value_parser!(f32))
                .default_value("60"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("0-255")
                .help("Per-pixel grayscale difference that counts as change.")
                .value_parser(value_parser!(u8))
                .default_value("30"),
        )
        .arg(
            Arg::new("min-area")
                .short('a')
                .long("min-area")
                .value_name("PIXELS")
                .help("Changed-region area that counts as motion.")
                .value_parser(value_parser!(f64))
                .default_value("1000"),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .value_name("TEXT")
                .help("Text sent with every motion alert.")
                .default_value(DEFAULT_MESSAGE),
        )
        .arg(
            Arg::new("jpeg-quality")
                .short('q')
                .long("jpeg-quality")
                .value_name("1-100")
                .value_parser(value_parser!(u8).range(1..=100)),
        )
        .arg(
            Arg::new("http")
                .long("http")
                .value_name("ADDR")
                .help("Address for the page and the video feed.")
                .value_parser(value_parser!(SocketAddr))
                .default_value(DEFAULT_HTTP_ADDR),
        )
        .arg(
            Arg::new("ws")
                .long("ws")
                .value_name("ADDR")
                .help("Address for the control channel.")
                .value_parser(value_parser!(SocketAddr))
                .default_value(DEFAULT_WS_ADDR),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .help("Write daily log files here instead of stdout.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info"),
        )
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub camera: VideoInConfig,
    pub motion: MotionConfig,
    pub pipeline: PipelineConfig,
    pub http_addr: SocketAddr,
    pub ws_addr: SocketAddr,
    pub log_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl ServerConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::from_matches(&command().try_get_matches()?)
    }

    pub fn parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_matches(&command().try_get_matches_from(args)?)
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let mut camera = VideoInConfig::default().with_index(defaulted(matches, "camera")?);
        if let Some(path) = matches.get_one::<PathBuf>("device") {
            camera = camera.with_path(path.clone());
        }
        match (
            matches.get_one::<usize>("width"),
            matches.get_one::<usize>("height"),
        ) {
            (Some(&width), Some(&height)) => camera = camera.with_size(Vec2::new(width, height)),
            (None, None) => {}
            _ => return Err(ConfigError::PartialSize),
        }
        let fps: f32 = defaulted(matches, "fps")?;
        camera = camera.with_frame_rate((fps > 0.0).then_some(fps));

        let min_area: f64 = defaulted(matches, "min-area")?;
        if !min_area.is_finite() || min_area < 0.0 {
            return Err(ConfigError::MinArea(min_area));
        }
        let motion = MotionConfig::default()
            .with_threshold(defaulted(matches, "threshold")?)
            .with_min_area(min_area)
            .with_message(defaulted::<String>(matches, "message")?);

        let pipeline = PipelineConfig::default()
            .with_jpeg_quality(matches.get_one::<u8>("jpeg-quality").copied());

        let level: String = defaulted(matches, "log-level")?;
        let log_level = LevelFilter::from_str(&level).map_err(|_| ConfigError::LogLevel(level))?;

        Ok(Self {
            camera,
            motion,
            pipeline,
            http_addr: defaulted(matches, "http")?,
            ws_addr: defaulted(matches, "ws")?,
            log_dir: matches.get_one::<PathBuf>("log-dir").cloned(),
            log_level,
        })
    }
}

// arguments declared with a default value
fn defaulted<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    id: &'static str,
) -> Result<T, ConfigError> {
    matches
        .get_one::<T>(id)
        .cloned()
        .ok_or(ConfigError::Missing(id))
}
