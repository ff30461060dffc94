mod byte;
mod channel;
pub mod traits;

pub use byte::ByteTransport;
pub use channel::ChannelTransport;
pub use traits::ServerTransport;
