pub mod error;
pub mod model;
pub mod sdp;
pub mod utils;

pub use error::{CodecError, UnknownModel};
pub use model::*;
