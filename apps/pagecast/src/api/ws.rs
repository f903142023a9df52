//! # WebSocket Observer Endpoint
//!
//! Each socket becomes an `Observer` of the engine. Broadcasts are pushed
//! into an unbounded channel, so a mutation never waits on a viewer; the
//! connection task drains that channel into the socket and feeds inbound
//! frames back to the engine.

use super::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use pagecast_core::{Observer, PagecastError};
use tokio::sync::mpsc;

/// Observer backed by a connection's outbound queue.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelObserver {
    /// Wrap the sending half of a connection queue.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Observer for ChannelObserver {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn deliver(&self, message: &str) -> Result<(), PagecastError> {
        self.tx
            .send(message.to_string())
            .map_err(|_| PagecastError::TransportFault("connection queue closed".to_string()))
    }
}

/// `GET /ws`: upgrade and attach the socket as an observer.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let id = match state
        .engine
        .write()
        .await
        .register_observer(Box::new(ChannelObserver::new(tx)))
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register observer: {}", e);
            return;
        }
    };

    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(text) => {
                    if let Err(e) = socket.send(Message::Text(text.into())).await {
                        tracing::debug!(observer = %id, "send failed: {}", e);
                        break;
                    }
                }
                None => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let engine = state.engine.read().await;
                    if let Err(e) = engine.handle_observer_message(id, text.as_str()) {
                        tracing::warn!(observer = %id, "Rejected observer message: {}", e);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(observer = %id, "receive failed: {}", e);
                    break;
                }
            },
        }
    }

    // Observer reads as closed from here on.
    drop(rx);
    state.engine.write().await.deregister_observer(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_observer_reports_closed_after_receiver_drops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);
        assert!(observer.is_open());
        observer.deliver("hello").expect("deliver");

        drop(rx);
        assert!(!observer.is_open());
        let err = observer.deliver("late").expect_err("closed");
        assert!(matches!(err, PagecastError::TransportFault(_)));
    }
}
