pub mod chart_type;
pub mod config;
pub mod dispatch;
pub mod generate;
pub mod registry;
pub mod schema;
pub mod validator;

pub use chart_core as core;
pub use chart_error as error;
pub use chart_server as server;

pub use chart_type::ChartType;
pub use config::{GenerateConfig, MinioConfig, StrategyKind};
pub use dispatch::{ChartDispatcher, ChartRouter};
pub use generate::{GenerateStrategy, build_strategy};
pub use registry::ToolRegistry;
