use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::negotiator::Negotiator;
use crate::transport::TransportEvent;
use mirage_core::{ConnectionState, IceCandidate, InboundMessage, SocketState, decode};
use tracing::{debug, info, warn};

impl Negotiator {
    pub(super) async fn handle_socket_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_socket_opened().await,

            TransportEvent::Message(text) => self.handle_signal(&text).await,

            TransportEvent::Error(e) => warn!("Signaling socket error: {}", e),

            TransportEvent::Closed { reason } => {
                info!("Signaling socket closed by remote: {:?}", reason);
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.transport = None;
                }
                self.emit(SessionEvent::SocketStateChanged(SocketState::Closed));

                // An established peer connection outlives its signaling socket.
                if !self.is_connected() && !self.state.is_terminal() {
                    self.fail_attempt("signaling socket closed before the peer connected")
                        .await;
                }
            }
        }
    }

    async fn handle_signal(&mut self, text: &str) {
        let message = match decode(text) {
            Ok(m) => m,
            Err(e) => {
                warn!("Dropping signaling frame: {}", e);
                return;
            }
        };

        match message {
            InboundMessage::Ready {
                connection_id,
                session_id,
            } => {
                info!(
                    "Service ready (connection {:?}, session {:?})",
                    connection_id, session_id
                );
                self.emit(SessionEvent::ServerReady {
                    connection_id,
                    session_id,
                });
            }

            InboundMessage::Answer { sdp } => {
                if let Err(e) = self.apply_remote_answer(sdp).await {
                    warn!("Remote answer rejected: {}", e);
                }
            }

            InboundMessage::IceCandidate(candidate) => {
                if let Err(e) = self.apply_remote_candidate(candidate).await {
                    warn!("Remote candidate rejected: {}", e);
                }
            }

            InboundMessage::Unrecognized(kind) => debug!("Ignoring '{}' frame", kind),
        }
    }

    /// Sets the remote answer. Valid once per attempt, while awaiting it.
    /// Candidates buffered before the answer are added right after it, in order.
    pub async fn apply_remote_answer(&mut self, sdp: String) -> Result<(), ClientError> {
        if self.state != ConnectionState::AwaitingAnswer {
            let answered = self
                .attempt
                .as_ref()
                .is_some_and(|a| a.remote_description_set);
            return Err(if answered && !self.state.is_terminal() {
                ClientError::DuplicateOperation("answer")
            } else {
                ClientError::InvalidState(self.state)
            });
        }

        let applied = match self.peer() {
            Some(peer) => peer.set_remote_answer(sdp).await,
            None => return Err(ClientError::InvalidState(self.state)),
        };
        if let Err(e) = applied {
            let reason = format!("failed to apply remote answer: {:#}", e);
            self.fail_attempt(reason.clone()).await;
            return Err(ClientError::NegotiationFailure(reason));
        }
        info!("Remote answer applied");

        let pending = match self.attempt.as_mut() {
            Some(attempt) => {
                attempt.remote_description_set = true;
                attempt.offer_sent_at = None;
                std::mem::take(&mut attempt.pending_remote_candidates)
            }
            None => Vec::new(),
        };
        self.set_state(ConnectionState::IceChecking);

        if !pending.is_empty() {
            debug!("Adding {} buffered remote candidates", pending.len());
        }
        for candidate in pending {
            if let Err(e) = self.add_remote_candidate(candidate).await {
                warn!("Buffered remote candidate rejected: {}", e);
            }
        }
        Ok(())
    }

    /// Adds a remote candidate, buffering it until the answer is applied.
    /// `None` is the end-of-candidates signal and needs no action.
    pub async fn apply_remote_candidate(
        &mut self,
        candidate: Option<IceCandidate>,
    ) -> Result<(), ClientError> {
        if self.state.is_terminal() {
            return Err(ClientError::InvalidState(self.state));
        }
        let Some(candidate) = candidate else {
            debug!("Remote candidates complete");
            return Ok(());
        };
        let Some(attempt) = self.attempt.as_mut() else {
            return Err(ClientError::InvalidState(self.state));
        };

        if !attempt.remote_description_set || attempt.peer.is_none() {
            debug!("Buffering remote candidate until the answer is applied");
            attempt.pending_remote_candidates.push(candidate);
            return Ok(());
        }
        self.add_remote_candidate(candidate).await
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), ClientError> {
        let Some(peer) = self.peer() else {
            return Err(ClientError::InvalidState(self.state));
        };
        debug!("Adding remote candidate {}", candidate.candidate);
        peer.add_ice_candidate(candidate).await?;
        Ok(())
    }
}
