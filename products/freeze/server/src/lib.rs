//! The freeze game server.
//!
//! Serves the game page and the MJPEG camera feed over HTTP, and runs the
//! control surface on a separate WebSocket port: the page sends
//! start/stop/reset/resume commands and receives motion alerts.

pub mod bridge;
pub mod config;
pub mod events;
pub mod routes;

pub use bridge::run_control_surface;
pub use config::{ConfigError, ServerConfig};
pub use events::{Event, MotionAlert};
pub use routes::{AppState, CameraFactory, Status, router};
