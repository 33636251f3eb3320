use crate::api::protocol::{parse_client_message, ErrorMessage, SessionMessage};
use crate::presentation::PresentationEvent;
use crate::session::{Command, SessionHandle};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

type WsSink = SplitSink<WebSocket, Message>;

/// Bridges one WebSocket to one game session
pub struct GameConnection {
    session: SessionHandle,
}

impl GameConnection {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Returns when the client disconnects or the session stops presenting;
    /// the session handle is dropped with `self`, which ends the session.
    pub async fn handle(
        self,
        socket: WebSocket,
        mut events: mpsc::UnboundedReceiver<PresentationEvent>,
    ) {
        let session_id = self.session.id();
        info!(session_id = %session_id, "WebSocket game connection established");

        let (mut sink, mut stream) = socket.split();

        if let Err(e) = send_json(&mut sink, &SessionMessage::new(session_id)).await {
            error!(session_id = %session_id, error = %e, "Failed to send session greeting");
            return;
        }

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        info!(session_id = %session_id, "WebSocket stream ended");
                        break;
                    };
                    match msg {
                        Ok(Message::Text(text)) => {
                            if let Err(e) = self.handle_client_message(&mut sink, &text).await {
                                error!(session_id = %session_id, error = %e, "Error handling client message");
                                break;
                            }
                        }
                        Ok(Message::Close(_)) => {
                            info!(session_id = %session_id, "WebSocket client disconnected");
                            break;
                        }
                        Ok(Message::Ping(data)) => {
                            if let Err(e) = sink.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Ok(_) => {
                            // Ignore binary, pong messages
                        }
                        Err(e) => {
                            warn!(session_id = %session_id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Forward presentation events
                event = events.recv() => {
                    match event {
                        Some(event) => {
                            if let Err(e) = send_json(&mut sink, &event).await {
                                error!(session_id = %session_id, error = %e, "Failed to send presentation event");
                                break;
                            }
                        }
                        None => {
                            error!(session_id = %session_id, "Presentation channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!(session_id = %session_id, "WebSocket game connection closed");
    }

    /// Turn a client message into a session command.
    ///
    /// Unparseable messages are answered with an error message; only a dead
    /// session or socket is an error here.
    async fn handle_client_message(&self, sink: &mut WsSink, text: &str) -> anyhow::Result<()> {
        match parse_client_message(text) {
            Ok(msg) => self.session.send(Command::from(msg)),
            Err(e) => {
                warn!(session_id = %self.session.id(), error = %e, "Rejected client message");
                send_json(sink, &ErrorMessage::new(e.to_string())).await
            }
        }
    }
}

async fn send_json<T: Serialize>(sink: &mut WsSink, msg: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(msg)?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}
