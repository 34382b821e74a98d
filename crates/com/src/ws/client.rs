use {
    super::{decode_message, encode_message},
    crate::ComError,
    futures_util::{SinkExt, StreamExt},
    serde::{Serialize, de::DeserializeOwned},
    std::{marker::PhantomData, net::SocketAddr},
    tokio_websockets::{ClientBuilder, MaybeTlsStream, WebSocketStream},
};

/// Counterpart of `WsServer`, used by tools and tests.
pub struct WsClient<T> {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> WsClient<T> {
    pub async fn connect(addr: SocketAddr) -> Result<Self, ComError> {
        let uri: http::Uri = format!("ws://{}", addr).parse().map_err(|error| {
            ComError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid websocket uri: {error}"),
            ))
        })?;
        let (stream, _response) = ClientBuilder::from_uri(uri).connect().await?;

        Ok(Self {
            stream,
            _marker: PhantomData,
        })
    }

    pub async fn send(&mut self, value: &T) -> Result<(), ComError> {
        self.stream.send(encode_message(value)?).await?;
        Ok(())
    }

    /// Send a raw text frame, bypassing JSON encoding.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ComError> {
        self.stream
            .send(tokio_websockets::Message::text(text.to_string()))
            .await?;
        Ok(())
    }

    /// Receive the next message, skipping control frames.
    ///
    /// Returns `ComError::ConnectionClosed` once the server hangs up.
    pub async fn recv(&mut self) -> Result<T, ComError> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if let Some(result) = decode_message(msg) {
                        return result;
                    }
                }
                Some(Err(error)) => return Err(ComError::from(error)),
                None => return Err(ComError::ConnectionClosed),
            }
        }
    }

    pub async fn close(mut self) -> Result<(), ComError> {
        self.stream.close().await?;
        Ok(())
    }
}
