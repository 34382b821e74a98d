use {
    crate::*,
    com::WsServer,
    motion::Controller,
    std::sync::Arc,
    tokio::sync::broadcast::error::RecvError,
    tokio_util::sync::CancellationToken,
};

/// Apply client commands to the controller and push motion alerts to every
/// client, until `cancel` fires.
pub async fn run_control_surface(
    mut server: WsServer<Event>,
    controller: Arc<Controller>,
    cancel: CancellationToken,
) {
    let mut alerts = controller.subscribe();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            incoming = server.recv() => match incoming {
                Ok(event) => match event.command() {
                    Some(command) => {
                        controller.apply(command);
                    }
                    None => log::warn!("ignoring server-side event from client: {:?}", event),
                },
                Err(error) => {
                    log::warn!("control channel closed: {}", error);
                    break;
                }
            },
            alert = alerts.recv() => match alert {
                Ok(alert) => {
                    if let Err(error) = server.send(&Event::from(alert)).await {
                        log::warn!("failed to publish motion alert: {}", error);
                    }
                }
                Err(RecvError::Lagged(missed)) => log::warn!("{} motion alerts dropped", missed),
                Err(RecvError::Closed) => break,
            },
        }
    }
    log::info!("control surface stopped");
}
