pub mod capabilities;
mod ext;
mod service;
pub mod traits;

pub use ext::RouterExt;
pub use service::RouterService;
