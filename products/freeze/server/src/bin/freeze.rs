use {
    com::WsServer,
    freeze::*,
    motion::{Controller, MotionDetector},
    std::sync::Arc,
    tokio_util::sync::CancellationToken,
    video::{VideoIn, default_device},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match ServerConfig::from_args() {
        Ok(config) => config,
        Err(ConfigError::Args(error)) => error.exit(),
        Err(error) => return Err(error.into()),
    };

    match &config.log_dir {
        Some(dir) => base::init_file_logger(dir.clone(), config.log_level)?,
        None => base::init_stdout_logger(config.log_level)?,
    }

    log::info!("opening camera");
    let camera_factory: CameraFactory = Arc::new(default_device);
    let camera = VideoIn::open_device(camera_factory()?, config.camera.clone()).await?;

    let cancel = CancellationToken::new();
    let controller = Arc::new(Controller::new(config.motion.message.clone()));

    log::info!("creating websocket server at {}", config.ws_addr);
    let server: WsServer<Event> = WsServer::bind(config.ws_addr).await?;
    let ws_port = server.local_addr().port();
    let control = tokio::spawn(run_control_surface(
        server,
        Arc::clone(&controller),
        cancel.clone(),
    ));

    let state = AppState::new(
        camera,
        camera_factory,
        controller,
        MotionDetector::new(config.motion.clone()),
        ws_port,
        cancel.clone(),
    )
    .with_pipeline(config.pipeline.clone());

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    log::info!("serving game on http://{}", listener.local_addr()?);

    let shutdown = cancel.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => log::info!("shutting down"),
                _ = shutdown.cancelled() => {}
            }
            shutdown.cancel();
        })
        .await?;

    control.await?;
    Ok(())
}
