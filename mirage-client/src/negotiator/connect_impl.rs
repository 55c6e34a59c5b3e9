use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::negotiator::{Attempt, Negotiator};
use crate::queue::driver_queue;
use mirage_core::{ConnectionState, SocketState};
use tracing::{error, info, warn};

impl Negotiator {
    /// Starts a fresh connection attempt, abandoning any previous one.
    ///
    /// Returns once the socket dial has started; the rest of the handshake is
    /// driven by [`Negotiator::pump`].
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.attempt.is_some() {
            info!("Abandoning previous attempt");
            self.teardown_attempt().await;
        }
        self.reconnects = 0;
        self.start_attempt().await
    }

    /// Releases the socket and the peer connection. Safe from every state.
    pub async fn disconnect(&mut self) {
        if self.attempt.is_some() {
            info!("Disconnecting");
            self.teardown_attempt().await;
        }
        self.set_state(ConnectionState::Disconnected);
    }

    /// Stops the outgoing senders and closes the peer connection of the current
    /// attempt, leaving the signaling socket alone. Idempotent.
    pub async fn close_peer(&mut self) {
        let peer = self.attempt.as_mut().and_then(|a| a.peer.take());
        let Some(peer) = peer else {
            return;
        };
        if let Err(e) = peer.close().await {
            warn!("Failed to close peer connection: {:#}", e);
        }
    }

    pub(super) async fn start_attempt(&mut self) -> Result<(), ClientError> {
        let endpoint = self.config.endpoint(self.session.model());
        let session_id = self.session.begin_attempt();
        let (transport_sink, peer_sink, queue_rx) = driver_queue();

        self.attempt = Some(Attempt::new(session_id, queue_rx, peer_sink));
        self.set_state(ConnectionState::SocketConnecting);
        self.emit(SessionEvent::SocketStateChanged(SocketState::Connecting));
        info!(
            "Connecting to {} ({}), session {}",
            endpoint.url, endpoint.model, session_id
        );

        let opened = self.transports.open(&endpoint.url, transport_sink).await;
        match opened {
            Ok(transport) => {
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.transport = Some(transport);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to open signaling socket: {}", e);
                self.teardown_attempt().await;
                self.set_state(ConnectionState::Failed);
                self.emit(SessionEvent::NegotiationFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    pub(super) async fn teardown_attempt(&mut self) {
        self.prompts.set_live(false);
        self.close_peer().await;

        let transport = self.attempt.as_mut().and_then(|a| a.transport.take());
        if let Some(transport) = transport {
            transport.close().await;
            self.emit(SessionEvent::SocketStateChanged(SocketState::Closed));
        }

        self.attempt = None;
        self.session.end_attempt();
    }

    /// Ends the attempt as failed, then starts another one if the retry budget allows.
    pub(super) async fn fail_attempt(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        error!("Connection attempt failed: {}", reason);

        self.teardown_attempt().await;
        self.set_state(ConnectionState::Failed);
        self.emit(SessionEvent::NegotiationFailed(reason));

        let budget = self.config.retry.max_reconnect_attempts;
        if self.reconnects >= budget {
            return;
        }
        self.reconnects += 1;
        warn!("Reconnecting ({}/{})", self.reconnects, budget);
        self.emit(SessionEvent::Reconnecting {
            attempt: self.reconnects,
        });
        if let Err(e) = self.start_attempt().await {
            warn!("Reconnect failed: {}", e);
        }
    }
}
