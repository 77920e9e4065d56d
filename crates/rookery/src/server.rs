//! `RookeryServer` builder and accept loop.
//!
//! This is the entry point for running a chess server. It ties the layers
//! together: transport → protocol → dispatcher → session / match.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rookery_match::MatchConfig;
use rookery_protocol::{Codec, Event, JsonCodec, Outbound, SessionId};
use rookery_session::{AccountStore, MemoryStore, PlayerRegistry, RegistryConfig};
use rookery_transport::{Transport, WebSocketTransport};
use tokio::sync::mpsc::UnboundedSender;

use crate::handler::handle_connection;
use crate::{Dispatcher, RookeryError};

/// Shared server state passed to each connection task.
///
/// Every event for a session, including replies to its own commands, goes
/// through that session's mailbox. Only the connection task that owns the
/// mailbox writes to the socket.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) codec: C,
    mailboxes: Mutex<HashMap<SessionId, UnboundedSender<Event>>>,
}

impl<C: Codec> ServerState<C> {
    pub(crate) fn new(dispatcher: Dispatcher, codec: C) -> Self {
        Self {
            dispatcher,
            codec,
            mailboxes: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn open_mailbox(&self, session: SessionId, tx: UnboundedSender<Event>) {
        self.mailboxes().insert(session, tx);
    }

    pub(crate) fn close_mailbox(&self, session: SessionId) {
        self.mailboxes().remove(&session);
    }

    /// Queues each event on its recipient's mailbox, in order. Events for
    /// sessions that have gone away are dropped.
    pub(crate) fn deliver(&self, outbound: Vec<Outbound>) {
        let mailboxes = self.mailboxes();
        for Outbound { to, event } in outbound {
            let queued = mailboxes.get(&to).is_some_and(|tx| tx.send(event).is_ok());
            if !queued {
                tracing::debug!(session_id = %to, "recipient gone, event dropped");
            }
        }
    }

    fn mailboxes(&self) -> MutexGuard<'_, HashMap<SessionId, UnboundedSender<Event>>> {
        self.mailboxes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use rookery::prelude::*;
///
/// # async fn run() -> Result<(), RookeryError> {
/// let server = RookeryServer::builder()
///     .bind("127.0.0.1:9000")
///     .registry_config(RegistryConfig {
///         max_sessions: 10,
///         ..Default::default()
///     })
///     .build()
///     .await?;
/// println!("listening on {}", server.local_addr()?);
/// server.run().await
/// # }
/// ```
pub struct RookeryServerBuilder {
    bind_addr: String,
    registry_config: RegistryConfig,
    match_config: MatchConfig,
    store: Box<dyn AccountStore>,
}

impl RookeryServerBuilder {
    /// A builder with default limits, bound to `127.0.0.1:8080`, keeping
    /// accounts in memory only.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            registry_config: RegistryConfig::default(),
            match_config: MatchConfig::default(),
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets session and account limits.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Sets match limits.
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Sets where accounts are loaded from and saved to.
    pub fn account_store(mut self, store: impl AccountStore) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Loads the account directory and binds the listener.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    ///
    /// # Errors
    /// - [`RookeryError::Session`] if the account store cannot be read.
    /// - [`RookeryError::Transport`] if the address cannot be bound.
    pub async fn build(self) -> Result<RookeryServer, RookeryError> {
        let players = Arc::new(PlayerRegistry::new(self.registry_config, self.store)?);
        let dispatcher = Dispatcher::new(players, self.match_config);
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        Ok(RookeryServer {
            transport,
            state: Arc::new(ServerState::new(dispatcher, JsonCodec)),
        })
    }
}

impl Default for RookeryServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound chess server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RookeryServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl RookeryServer {
    pub fn builder() -> RookeryServerBuilder {
        RookeryServerBuilder::new()
    }
}

impl<C: Codec> RookeryServer<C> {
    /// The address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RookeryError> {
        Ok(self.transport.local_addr()?)
    }

    /// A handle on the server's registries, shared with the running server.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.state.dispatcher
    }

    /// Accepts connections until the process ends, one task each.
    ///
    /// A failed accept (bad handshake, reset socket) is logged and the
    /// loop carries on.
    pub async fn run(mut self) -> Result<(), RookeryError> {
        tracing::info!("Rookery server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
