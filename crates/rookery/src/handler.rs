//! Per-connection handler: session setup, command loop, cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Open a session (or refuse the connection if the server is full)
//!   2. Open the session's mailbox
//!   3. Loop: decode frames into commands and dispatch them, while writing
//!      whatever lands in the mailbox back to the client
//!   4. On exit, the guard closes the mailbox and the session

use std::sync::Arc;

use rookery_protocol::{Codec, Command, Event, Outbound, SessionId};
use rookery_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RookeryError;
use crate::server::ServerState;

/// Drop guard that closes a session when the handler exits, however it
/// exits.
///
/// The registries use plain mutexes, so cleanup runs right here in `drop`
/// rather than on a spawned task.
struct SessionGuard<C: Codec> {
    session: SessionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        self.state.close_mailbox(self.session);
        self.state.dispatcher.players().disconnect(self.session);
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), RookeryError> {
    let conn_id = conn.id();

    let session = match state.dispatcher.players().connect() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(%conn_id, error = %e, "refusing connection");
            send_event(&conn, &state.codec, &Event::error(&e)).await?;
            conn.close().await?;
            return Ok(());
        }
    };

    let (tx, mut mailbox) = mpsc::unbounded_channel();
    state.open_mailbox(session, tx);
    let _guard = SessionGuard {
        session,
        state: Arc::clone(&state),
    };
    tracing::debug!(%conn_id, session_id = %session, "connection bound to session");

    loop {
        tokio::select! {
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::debug!(session_id = %session, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(session_id = %session, error = %e, "recv error");
                        break;
                    }
                };
                let outbound = match state.codec.decode::<Command>(&data) {
                    Ok(command) => {
                        tracing::trace!(session_id = %session, action = command.action(), "command");
                        state.dispatcher.dispatch(session, command)
                    }
                    Err(e) => {
                        tracing::debug!(session_id = %session, error = %e, "undecodable frame");
                        vec![Outbound::new(session, Event::error(e.client_reason()))]
                    }
                };
                state.deliver(outbound);
            }
            Some(event) = mailbox.recv() => {
                send_event(&conn, &state.codec, &event).await?;
            }
        }
    }

    // _guard drops here and closes the session.
    Ok(())
}

async fn send_event(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    event: &Event,
) -> Result<(), RookeryError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await?;
    Ok(())
}
