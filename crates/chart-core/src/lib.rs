pub mod content;
pub mod protocol;
pub mod tool;
pub mod utils;

pub use chart_error as error;
pub use content::Content;
pub use protocol::result::InitializeResult;
pub use tool::{Tool, ToolCall};
