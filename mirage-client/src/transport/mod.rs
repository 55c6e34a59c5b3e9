mod signaling_transport;
mod transport_event;
mod ws_client;

pub use signaling_transport::{SignalingTransport, TransportConnector};
pub use transport_event::TransportEvent;
pub use ws_client::{WsConnector, WsTransport};
