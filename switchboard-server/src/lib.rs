mod app;
pub mod config;
mod error;
pub mod registry;
pub mod router;
pub mod signaling;

pub use app::*;
pub use config::{PresenceMode, RelayConfig};
pub use error::RelayError;
pub use registry::*;
pub use router::*;
pub use signaling::*;
