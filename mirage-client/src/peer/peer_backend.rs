use crate::peer::VideoSink;
use crate::queue::PeerSink;
use anyhow::Result;
use async_trait::async_trait;
use mirage_core::{IceCandidate, VideoSenderPolicy};
use std::sync::Arc;
use webrtc::track::track_local::TrackLocal;

/// ICE and media settings for one peer connection.
#[derive(Clone, Default)]
pub struct PeerSettings {
    /// `None` provisions the connection without any ICE server.
    pub stun_server: Option<String>,
    pub ice_candidate_pool_size: u8,
    pub video_sink: Option<Arc<dyn VideoSink>>,
}

/// Result of applying a [`VideoSenderPolicy`] to the outgoing senders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyOutcome {
    Applied,
    /// At least one video sender has no capability of the preferred codec.
    CodecUnavailable,
    NoVideoSender,
}

/// The peer-connection engine as seen by the negotiator.
#[async_trait]
pub trait PeerBackend: Send + Sync {
    async fn add_video_track(&self, track: Arc<dyn TrackLocal + Send + Sync>) -> Result<()>;

    /// Negotiate a video section that only receives.
    async fn add_receive_only_video(&self) -> Result<()>;

    /// Must run before the offer is created.
    async fn apply_video_policy(&self, policy: &VideoSenderPolicy) -> Result<PolicyOutcome>;

    async fn create_offer(&self) -> Result<String>;

    /// Takes the SDP exactly as [`PeerBackend::create_offer`] returned it.
    async fn set_local_offer(&self, sdp: String) -> Result<()>;

    async fn set_remote_answer(&self, sdp: String) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Stops every sender and closes the connection. Idempotent.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(&self, settings: PeerSettings, sink: PeerSink) -> Result<Box<dyn PeerBackend>>;
}
