use mirage_core::{ConnectionState, SocketState};

/// Notifications published by the negotiator to every subscriber.
///
/// Subscribe with [`crate::Negotiator::subscribe`]; drop the receiver to unsubscribe.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SocketStateChanged(SocketState),

    StateChanged(ConnectionState),

    /// The service acknowledged the session.
    ServerReady {
        connection_id: Option<String>,
        session_id: Option<String>,
    },

    /// The peer connection is usable. Fired at most once per connection attempt.
    PeerConnected,

    /// The first remote video track arrived.
    VideoStreamEstablished,

    /// A prompt went out. Carries the display key for table prompts and the
    /// text itself for custom prompts.
    PromptSent(String),

    IceDisconnected,

    NegotiationFailed(String),

    Reconnecting { attempt: u32 },
}
