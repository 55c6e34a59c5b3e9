//! Connection driver: owns the signaling socket and the peer connection of the
//! current attempt and walks them through offer, answer and ICE.
//!
//! Nothing happens on background tasks. Socket reads and engine callbacks only
//! enqueue [`DriverEvent`]s; the host calls [`Negotiator::pump`] from its tick to
//! process them in arrival order.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::peer::{PeerBackend, PeerConnector, RtcPeerConnector, VideoSink, VideoSource};
use crate::prompt::PromptChannel;
use crate::queue::{DriverEvent, PeerSink};
use crate::session::SessionState;
use crate::transport::{SignalingTransport, TransportConnector, WsConnector};
use mirage_core::{ConnectionState, IceCandidate, OutboundMessage, SessionId, encode};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::info;

mod connect_impl;
mod create_offer_impl;
mod handle_signal_impl;
mod ice_state_impl;
mod init_peer_impl;
mod prompt_impl;

const EVENT_CAPACITY: usize = 256;

/// Resources of one connection attempt. Dropping it drops the queue, so events
/// produced for an abandoned attempt are never processed.
struct Attempt {
    session_id: SessionId,
    queue_rx: mpsc::UnboundedReceiver<DriverEvent>,
    peer_sink: PeerSink,
    transport: Option<Box<dyn SignalingTransport>>,
    peer: Option<Box<dyn PeerBackend>>,
    remote_description_set: bool,
    pending_remote_candidates: Vec<IceCandidate>,
    connected: bool,
    video_established: bool,
    offer_sent_at: Option<Instant>,
}

impl Attempt {
    fn new(
        session_id: SessionId,
        queue_rx: mpsc::UnboundedReceiver<DriverEvent>,
        peer_sink: PeerSink,
    ) -> Self {
        Self {
            session_id,
            queue_rx,
            peer_sink,
            transport: None,
            peer: None,
            remote_description_set: false,
            pending_remote_candidates: Vec::new(),
            connected: false,
            video_established: false,
            offer_sent_at: None,
        }
    }
}

pub struct Negotiator {
    config: ClientConfig,
    session: SessionState,
    state: ConnectionState,
    transports: Arc<dyn TransportConnector>,
    peers: Arc<dyn PeerConnector>,
    video_source: Option<Arc<dyn VideoSource>>,
    video_sink: Option<Arc<dyn VideoSink>>,
    prompts: PromptChannel,
    events: broadcast::Sender<SessionEvent>,
    attempt: Option<Attempt>,
    reconnects: u32,
}

impl Negotiator {
    pub fn new(
        config: ClientConfig,
        transports: Arc<dyn TransportConnector>,
        peers: Arc<dyn PeerConnector>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: SessionState::new(config.model),
            config,
            state: ConnectionState::Disconnected,
            transports,
            peers,
            video_source: None,
            video_sink: None,
            prompts: PromptChannel::new(),
            events,
            attempt: None,
            reconnects: 0,
        }
    }

    /// WebSocket signaling and a `webrtc-rs` peer connection.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(
            config,
            Arc::new(WsConnector::new()),
            Arc::new(RtcPeerConnector),
        )
    }

    pub fn with_video_source(mut self, source: Arc<dyn VideoSource>) -> Self {
        self.video_source = Some(source);
        self
    }

    pub fn with_video_sink(mut self, sink: Arc<dyn VideoSink>) -> Self {
        self.video_sink = Some(sink);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.session_id()
    }

    /// Applies from the next [`Negotiator::connect`]. A live attempt keeps its
    /// model and prompt cursor until it ends.
    pub fn set_model_choice(&mut self, use_lucy: bool) {
        if self.session.set_model_choice(use_lucy) {
            info!("Model selected: {}", self.session.selected_model_name());
        } else {
            info!(
                "Model selected: {}, applies once session {:?} ends",
                self.session.selected_model_name(),
                self.session.session_id()
            );
        }
    }

    pub fn selected_model_name(&self) -> &'static str {
        self.session.selected_model_name()
    }

    pub fn is_connected(&self) -> bool {
        self.attempt.as_ref().is_some_and(|a| a.connected)
    }

    /// Processes every queued event, then checks the answer deadline and sends
    /// queued prompts. Returns the number of events processed.
    pub async fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.next_event() {
            processed += 1;
            match event {
                DriverEvent::Socket(event) => self.handle_socket_event(event).await,
                DriverEvent::Peer(event) => self.handle_peer_event(event).await,
            }
        }
        self.check_answer_timeout().await;
        self.drain_prompts();
        processed
    }

    fn next_event(&mut self) -> Option<DriverEvent> {
        self.attempt.as_mut()?.queue_rx.try_recv().ok()
    }

    async fn check_answer_timeout(&mut self) {
        let Some(timeout) = self.config.retry.answer_timeout() else {
            return;
        };
        let expired = self.state == ConnectionState::AwaitingAnswer
            && self
                .attempt
                .as_ref()
                .and_then(|a| a.offer_sent_at)
                .is_some_and(|sent| sent.elapsed() >= timeout);
        if expired {
            self.fail_attempt(format!("no answer within {:?}", timeout))
                .await;
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        info!("Connection state: {} -> {}", self.state, state);
        self.state = state;
        self.emit(SessionEvent::StateChanged(state));
    }

    fn transport(&self) -> Option<&dyn SignalingTransport> {
        self.attempt.as_ref()?.transport.as_deref()
    }

    fn peer(&self) -> Option<&dyn PeerBackend> {
        self.attempt.as_ref()?.peer.as_deref()
    }

    fn send_frame(&self, message: &OutboundMessage) -> Result<(), ClientError> {
        let transport = self.transport().ok_or(ClientError::NotConnected)?;
        transport.send_text(encode(message)?)?;
        Ok(())
    }
}
