use crate::config::IceMilestone;
use crate::events::SessionEvent;
use crate::negotiator::Negotiator;
use crate::peer::{MediaKind, PeerEvent};
use mirage_core::{ConnectionState, IceCandidate, IceConnectionState, OutboundMessage};
use tracing::{debug, error, info, warn};

impl Negotiator {
    pub(super) async fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::CandidateGathered(candidate) => self.send_local_candidate(candidate),

            PeerEvent::GatheringComplete => debug!("Local ICE gathering complete"),

            PeerEvent::IceStateChanged(state) => self.on_ice_connection_state_changed(state).await,

            PeerEvent::TrackAdded(kind) => self.on_remote_track(kind),
        }
    }

    /// Trickles one local candidate. Candidates go out individually, in the
    /// order the engine discovered them.
    fn send_local_candidate(&self, candidate: IceCandidate) {
        if self.state.is_terminal() {
            return;
        }
        let candidate = IceCandidate {
            sdp_mline_index: candidate.sdp_mline_index.or(Some(0)),
            ..candidate
        };
        debug!("Sending local candidate {}", candidate.candidate);
        if let Err(e) = self.send_frame(&OutboundMessage::IceCandidate(candidate)) {
            warn!("Failed to send local candidate: {}", e);
        }
    }

    pub async fn on_ice_connection_state_changed(&mut self, ice: IceConnectionState) {
        if self.state.is_terminal() {
            debug!("Ignoring ICE state {:?} in state {}", ice, self.state);
            return;
        }
        info!("ICE connection state: {:?}", ice);

        match ice {
            IceConnectionState::New => {}

            IceConnectionState::Checking => {
                let answered = self
                    .attempt
                    .as_ref()
                    .is_some_and(|a| a.remote_description_set);
                if answered && !self.is_connected() {
                    self.set_state(ConnectionState::IceChecking);
                }
            }

            IceConnectionState::Connected => {
                if self.config.connected_on == IceMilestone::Connected {
                    self.mark_connected();
                }
            }

            IceConnectionState::Completed => self.mark_connected(),

            IceConnectionState::Failed => {
                error!("ICE connection failed");
                self.fail_attempt("ICE connection failed").await;
            }

            IceConnectionState::Disconnected => {
                error!("ICE connection disconnected");
                self.emit(SessionEvent::IceDisconnected);
            }

            IceConnectionState::Closed => {
                self.teardown_attempt().await;
                self.set_state(ConnectionState::Closed);
            }
        }
    }

    /// Flips the per-attempt latch; later milestones of the same attempt are ignored.
    fn mark_connected(&mut self) {
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        if attempt.connected {
            debug!("Already connected");
            return;
        }
        attempt.connected = true;

        self.reconnects = 0;
        self.prompts.set_live(true);
        self.set_state(ConnectionState::Connected);
        info!("Peer connection established");
        self.emit(SessionEvent::PeerConnected);
    }

    fn on_remote_track(&mut self, kind: MediaKind) {
        if kind != MediaKind::Video {
            return;
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        if attempt.video_established {
            return;
        }
        attempt.video_established = true;
        info!("Remote video stream established");
        self.emit(SessionEvent::VideoStreamEstablished);
    }
}
