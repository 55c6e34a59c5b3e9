/// Events a signaling transport reports to the negotiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The socket finished its handshake and accepts frames.
    Opened,

    /// A text frame arrived.
    Message(String),

    /// Dial or I/O failure. A `Closed` event follows once the socket is gone.
    Error(String),

    /// The socket is closed and will not be reopened.
    Closed { reason: Option<String> },
}
