mod endpoint;
mod policy;
mod prompt;
mod session;
mod signaling;
mod state;

pub use endpoint::{ModelChoice, SignalingEndpoint};
pub use policy::VideoSenderPolicy;
pub use prompt::{PromptEntry, PromptTable};
pub use session::SessionId;
pub use signaling::{IceCandidate, InboundMessage, OutboundMessage, decode, encode};
pub use state::{ConnectionState, IceConnectionState, SocketState};
