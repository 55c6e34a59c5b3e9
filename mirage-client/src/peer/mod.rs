mod media;
mod peer_backend;
mod peer_event;
mod rtc_peer;

pub use media::{StaticVideoSource, VideoSink, VideoSource};
pub use peer_backend::{PeerBackend, PeerConnector, PeerSettings, PolicyOutcome};
pub use peer_event::{MediaKind, PeerEvent};
pub use rtc_peer::{RtcPeer, RtcPeerConnector};
