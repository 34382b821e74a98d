use {
    super::{decode_message, encode_message},
    crate::ComError,
    futures_util::{SinkExt, StreamExt},
    serde::{Serialize, de::DeserializeOwned},
    std::{collections::HashMap, net::SocketAddr, sync::Arc},
    tokio::{
        net::{TcpListener, TcpStream, ToSocketAddrs},
        sync::{RwLock, mpsc},
        task::JoinHandle,
    },
    tokio_websockets::{Message, ServerBuilder, WebSocketStream},
};

type WsSink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;
type WsStream = futures_util::stream::SplitStream<WebSocketStream<TcpStream>>;
type Clients = Arc<RwLock<HashMap<SocketAddr, WsSink>>>;

// capacity of the merged inbound queue
const INBOUND_CAPACITY: usize = 256;

/// Broadcasting WebSocket server.
///
/// Everything passed to `send` goes to every connected client. Messages from
/// all clients are merged into one queue drained by `recv`.
pub struct WsServer<T> {
    clients: Clients,
    rx: mpsc::Receiver<T>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl<T: Serialize + DeserializeOwned + Send + 'static> WsServer<T> {
    /// Bind a TCP listener and start accepting WebSocket connections.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        log::info!("websocket server listening on {}", local_addr);

        let clients: Clients = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);

        let accept_clients = Arc::clone(&clients);
        let accept_task = tokio::spawn(async move {
            loop {
                let (tcp_stream, addr) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(error) => {
                        log::warn!("accept error: {}", error);
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                        continue;
                    }
                };

                let ws_stream = match ServerBuilder::new().accept(tcp_stream).await {
                    Ok((_request, ws_stream)) => ws_stream,
                    Err(error) => {
                        log::warn!("websocket handshake failed for {}: {}", addr, error);
                        continue;
                    }
                };

                let (write_half, read_half) = ws_stream.split();
                accept_clients.write().await.insert(addr, write_half);
                log::info!("client connected: {}", addr);

                tokio::spawn(Self::read_client(
                    addr,
                    read_half,
                    tx.clone(),
                    Arc::clone(&accept_clients),
                ));
            }
        });

        Ok(Self {
            clients,
            rx,
            accept_task,
            local_addr,
        })
    }

    async fn read_client(addr: SocketAddr, mut reader: WsStream, tx: mpsc::Sender<T>, clients: Clients) {
        loop {
            match reader.next().await {
                Some(Ok(msg)) => match decode_message::<T>(msg) {
                    Some(Ok(value)) => {
                        if tx.send(value).await.is_err() {
                            // server dropped
                            break;
                        }
                    }
                    Some(Err(error)) => {
                        log::warn!("ignoring message from {}: {}", addr, error);
                    }
                    None => {}
                },
                Some(Err(error)) => {
                    log::warn!("client {} error: {}", addr, error);
                    break;
                }
                None => break,
            }
        }
        clients.write().await.remove(&addr);
        log::info!("client disconnected: {}", addr);
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Clients that fail to receive are dropped from the client map. Individual
    /// failures are not reported to the caller.
    pub async fn send(&self, value: &T) -> Result<(), ComError> {
        let msg = encode_message(value)?;

        let mut clients = self.clients.write().await;
        let mut failed = Vec::new();
        for (addr, writer) in clients.iter_mut() {
            if let Err(error) = writer.send(msg.clone()).await {
                log::warn!("failed to send to {}: {}", addr, error);
                failed.push(*addr);
            }
        }
        for addr in failed {
            clients.remove(&addr);
        }

        Ok(())
    }

    /// Receive the next message from any client.
    ///
    /// Undecodable messages are logged and skipped, they never surface here.
    pub async fn recv(&mut self) -> Result<T, ComError> {
        self.rx.recv().await.ok_or(ComError::ConnectionClosed)
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl<T> Drop for WsServer<T> {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
