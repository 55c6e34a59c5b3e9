use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one session, from socket dial to an established peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    SocketConnecting,
    SocketOpen,
    NegotiatingOffer,
    AwaitingAnswer,
    IceChecking,
    Connected,
    Failed,
    Closed,
}

impl ConnectionState {
    /// States in which negotiation messages are no longer processed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Failed | Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Engine-neutral mirror of the ICE connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Failed,
    Disconnected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketState {
    Connecting,
    Open,
    Closing,
    Closed,
}
