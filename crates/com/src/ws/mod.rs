pub mod client;
pub mod server;

pub use client::WsClient;
pub use server::WsServer;

use {crate::ComError, serde::{Serialize, de::DeserializeOwned}, tokio_websockets::Message};

pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024; // 1 MB

/// Decode a data frame as JSON. Control frames yield `None`.
pub(crate) fn decode_message<T: DeserializeOwned>(msg: Message) -> Option<Result<T, ComError>> {
    if !msg.is_text() && !msg.is_binary() {
        return None;
    }
    let payload = msg.into_payload();
    if payload.len() > MAX_MESSAGE_SIZE {
        return Some(Err(ComError::MessageTooLarge(payload.len())));
    }
    Some(serde_json::from_slice(&payload).map_err(ComError::from))
}

pub(crate) fn encode_message<T: Serialize>(value: &T) -> Result<Message, ComError> {
    Ok(Message::text(serde_json::to_string(value)?))
}
