use thiserror::Error;

/// Errors produced by the signaling codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame is not valid JSON, has no `type` discriminator, or is missing a
    /// field its type requires.
    #[error("malformed signaling frame: {0}")]
    Malformed(String),

    #[error("failed to encode signaling frame: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown model '{0}', expected 'mirage' or 'lucy'")]
pub struct UnknownModel(pub String);
