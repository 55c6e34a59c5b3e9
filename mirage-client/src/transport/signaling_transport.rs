use crate::error::TransportError;
use crate::queue::TransportSink;
use async_trait::async_trait;
use mirage_core::SocketState;

/// Text socket to the signaling service, owned by exactly one negotiator attempt.
///
/// A closed transport is never reopened; reconnecting asks the
/// [`TransportConnector`] for a fresh one.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    fn send_text(&self, payload: String) -> Result<(), TransportError>;

    /// Idempotent.
    async fn close(&self);

    fn state(&self) -> SocketState;

    fn is_open(&self) -> bool {
        self.state() == SocketState::Open
    }
}

/// Opens signaling transports. `open` returns as soon as the dial has started;
/// the outcome arrives on `sink` as `Opened`, or as `Error` followed by `Closed`.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn open(
        &self,
        url: &str,
        sink: TransportSink,
    ) -> Result<Box<dyn SignalingTransport>, TransportError>;
}
