use mirage_core::{CodecError, ConnectionState, ModelChoice};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("signaling socket is not open")]
    NotOpen,

    #[error("failed to open signaling socket: {0}")]
    Connect(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// No capability of the preferred codec exists; the offer falls back to default codecs.
    #[error("no '{0}' capability available for the video sender")]
    CodecMismatch(String),

    #[error("negotiation failed: {0}")]
    NegotiationFailure(String),

    #[error("duplicate {0} ignored")]
    DuplicateOperation(&'static str),

    #[error("operation not valid in state {0}")]
    InvalidState(ConnectionState),

    #[error("not connected to the signaling service")]
    NotConnected,

    #[error("prompt table for {0} is empty")]
    EmptyPromptTable(ModelChoice),

    #[error(transparent)]
    Peer(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
