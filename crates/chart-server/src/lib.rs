pub mod router;
pub mod server;
pub mod transport;

pub use chart_core as core;
pub use chart_error as error;
pub use router::{RouterService, capabilities::CapabilitiesBuilder, traits::Router};
pub use server::Server;
