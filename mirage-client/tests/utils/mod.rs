pub mod mock_peer;
pub mod mock_transport;

pub use mock_peer::*;
pub use mock_transport::*;
pub use signal_helpers::*;
