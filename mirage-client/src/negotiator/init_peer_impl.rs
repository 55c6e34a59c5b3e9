use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::negotiator::Negotiator;
use crate::peer::PeerSettings;
use mirage_core::{ConnectionState, OutboundMessage, SocketState};
use tracing::{debug, info};

impl Negotiator {
    /// Socket open: announce the session, provision the peer, then offer right away.
    pub(super) async fn on_socket_opened(&mut self) {
        if self.state != ConnectionState::SocketConnecting {
            debug!("Ignoring socket open in state {}", self.state);
            return;
        }
        self.emit(SessionEvent::SocketStateChanged(SocketState::Open));
        self.set_state(ConnectionState::SocketOpen);

        if let Err(e) = self.send_initialize_session() {
            self.fail_attempt(format!("failed to initialize session: {}", e))
                .await;
            return;
        }

        let stun_server = self.config.stun_server().map(str::to_owned);
        if let Err(e) = self.initialize(stun_server).await {
            self.fail_attempt(format!("failed to create peer connection: {}", e))
                .await;
            return;
        }

        let policy = self.config.video_policy.clone();
        if let Err(e) = self.create_offer(&policy).await {
            self.fail_attempt(format!("failed to create offer: {}", e))
                .await;
        }
    }

    fn send_initialize_session(&self) -> Result<(), ClientError> {
        let session_id = self
            .attempt
            .as_ref()
            .map(|a| a.session_id)
            .ok_or(ClientError::NotConnected)?;
        let init = &self.config.session_init;
        self.send_frame(&OutboundMessage::InitializeSession {
            fps: init.fps,
            session_id,
            prompt: init.prompt.clone(),
            product: init.product.clone(),
        })?;
        info!("Session {} initialized", session_id);
        Ok(())
    }

    /// Provisions the peer connection of the current attempt and attaches media.
    ///
    /// With a STUN server the connection gets one ICE server and a candidate
    /// pool; without one it has no ICE servers at all.
    pub async fn initialize(&mut self, stun_server: Option<String>) -> Result<(), ClientError> {
        let Some(peer_sink) = self.attempt.as_ref().map(|a| a.peer_sink.clone()) else {
            return Err(ClientError::InvalidState(self.state));
        };
        if self.peer().is_some() {
            return Err(ClientError::DuplicateOperation("peer initialization"));
        }

        let settings = PeerSettings {
            ice_candidate_pool_size: if stun_server.is_some() {
                self.config.ice_candidate_pool_size
            } else {
                0
            },
            stun_server,
            video_sink: self.video_sink.clone(),
        };
        let peer = self.peers.connect(settings, peer_sink).await?;

        let media = match (&self.video_source, self.config.send_video) {
            (Some(source), true) => peer.add_video_track(source.track()).await,
            (None, true) => {
                debug!("No video source attached, receiving only");
                peer.add_receive_only_video().await
            }
            (_, false) => peer.add_receive_only_video().await,
        };
        if let Err(e) = media {
            let _ = peer.close().await;
            return Err(e.into());
        }

        if let Some(attempt) = self.attempt.as_mut() {
            attempt.peer = Some(peer);
        }
        Ok(())
    }
}
