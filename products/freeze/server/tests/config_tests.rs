use {
    base::Vec2,
    freeze::{ConfigError, ServerConfig},
    log::LevelFilter,
    motion::DEFAULT_MESSAGE,
    std::{net::SocketAddr, path::Path},
};

#[test]
fn test_defaults() {
    let config = ServerConfig::parse_from(["freeze"]).unwrap();

    assert_eq!(config.camera.index, 0);
    assert_eq!(config.camera.path, None);
    assert_eq!(config.camera.size, None);
    assert_eq!(config.camera.frame_rate, Some(60.0));
    assert_eq!(config.motion.threshold, 30);
    assert_eq!(config.motion.min_area, 1000.0);
    assert_eq!(config.motion.message, DEFAULT_MESSAGE);
    assert_eq!(config.pipeline.jpeg_quality, None);
    assert_eq!(config.http_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.ws_addr, "0.0.0.0:5001".parse::<SocketAddr>().unwrap());
    assert_eq!(config.log_dir, None);
    assert_eq!(config.log_level, LevelFilter::Info);
}

#[test]
fn test_everything_overridden() {
    let config = ServerConfig::parse_from([
        "freeze",
        "--camera",
        "2",
        "--device",
        "/dev/video2",
        "--width",
        "640",
        "--height",
        "480",
        "--fps",
        "0",
        "-t",
        "15",
        "--min-area",
        "100",
        "--message",
        "caught you",
        "-q",
        "80",
        "--http",
        "127.0.0.1:8000",
        "--ws",
        "127.0.0.1:8001",
        "--log-dir",
        "/tmp/freeze",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(config.camera.index, 2);
    assert_eq!(config.camera.path.as_deref(), Some(Path::new("/dev/video2")));
    assert_eq!(config.camera.size, Some(Vec2::new(640, 480)));
    assert_eq!(config.camera.frame_rate, None);
    assert_eq!(config.motion.threshold, 15);
    assert_eq!(config.motion.min_area, 100.0);
    assert_eq!(config.motion.message, "caught you");
    assert_eq!(config.pipeline.jpeg_quality, Some(80));
    assert_eq!(config.http_addr.port(), 8000);
    assert_eq!(config.ws_addr.port(), 8001);
    assert_eq!(config.log_dir.as_deref(), Some(Path::new("/tmp/freeze")));
    assert_eq!(config.log_level, LevelFilter::Debug);
}

#[test]
fn test_width_without_height_is_rejected() {
    assert!(matches!(
        ServerConfig::parse_from(["freeze", "--width", "640"]),
        Err(ConfigError::PartialSize)
    ));
}

#[test]
fn test_bad_values_are_rejected() {
    assert!(matches!(
        ServerConfig::parse_from(["freeze", "--threshold", "300"]),
        Err(ConfigError::Args(_))
    ));
    assert!(matches!(
        ServerConfig::parse_from(["freeze", "--jpeg-quality", "0"]),
        Err(ConfigError::Args(_))
    ));
    assert!(matches!(
        ServerConfig::parse_from(["freeze", "--log-level", "loud"]),
        Err(ConfigError::LogLevel(_))
    ));
}

#[test]
fn test_min_area_must_be_a_usable_number() {
    for value in ["NaN", "inf", "-5"] {
        let arg = format!("--min-area={value}");
        assert!(
            matches!(
                ServerConfig::parse_from(["freeze", arg.as_str()]),
                Err(ConfigError::MinArea(_))
            ),
            "{value} was accepted"
        );
    }
    let config = ServerConfig::parse_from(["freeze", "--min-area", "0"]).unwrap();
    assert_eq!(config.motion.min_area, 0.0);
}
