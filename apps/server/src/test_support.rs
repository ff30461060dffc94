use std::{path::Path, sync::Arc, time::Duration};

use axum::response::Response;
use chart_tools::{
    ChartDispatcher, ChartRouter, ToolRegistry,
    generate::{LocalFileStrategy, SpecRenderer},
};

use crate::SharedRouter;

/// The real chart router, writing artifacts into `dir`.
pub fn chart_router(dir: &Path) -> SharedRouter {
    let registry = Arc::new(ToolRegistry::new(Vec::<String>::new()).unwrap());
    let strategy = Arc::new(LocalFileStrategy::new(
        Arc::new(SpecRenderer),
        dir.to_path_buf(),
    ));
    Arc::new(ChartRouter::new(ChartDispatcher::new(
        registry,
        strategy,
        Duration::from_secs(5),
    )))
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
