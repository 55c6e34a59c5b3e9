pub mod config;
pub mod error;
pub mod events;
pub mod negotiator;
pub mod peer;
pub mod prompt;
pub mod queue;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, IceMilestone, RetryPolicy, SessionInit};
pub use error::{ClientError, ConfigError, TransportError};
pub use events::SessionEvent;
pub use negotiator::Negotiator;
pub use peer::{
    MediaKind, PeerBackend, PeerConnector, PeerEvent, PeerSettings, PolicyOutcome,
    RtcPeerConnector, StaticVideoSource, VideoSink, VideoSource,
};
pub use prompt::{PromptChannel, PromptScheduler, PromptSender, TimedPrompt};
pub use queue::{DriverEvent, PeerSink, TransportSink, driver_queue};
pub use session::SessionState;
pub use transport::{SignalingTransport, TransportConnector, TransportEvent, WsConnector};
