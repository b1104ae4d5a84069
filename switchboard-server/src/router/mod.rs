mod router;
mod router_command;
mod router_handle;

pub use router::*;
pub use router_command::*;
pub use router_handle::*;
