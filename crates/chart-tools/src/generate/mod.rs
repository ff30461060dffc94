//! Strategies that turn a validated chart request into a retrievable artifact.

mod local;
mod remote;
pub mod render;
mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use chart_error::Result;
use serde_json::{Map, Value};

pub use local::LocalFileStrategy;
pub use remote::RemoteApiStrategy;
pub use render::{RenderGuard, RenderedArtifact, Renderer, SpecRenderer};
pub use storage::{ObjectStorageStrategy, ObjectStore, S3ObjectStore, StorageSettings};

use crate::{
    chart_type::ChartType,
    config::{GenerateConfig, StrategyKind},
};

/// Validated arguments for one chart, owned by the strategy for the duration of the call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub chart_type: ChartType,
    pub args: Map<String, Value>,
}

impl GenerationRequest {
    pub fn new(chart_type: ChartType, args: Map<String, Value>) -> Self {
        Self { chart_type, args }
    }

    /// `{"type": <chart type>, ...args}` as renderers expect it.
    pub fn render_options(&self) -> Value {
        let mut options = Map::with_capacity(self.args.len() + 1);
        options.insert("type".into(), Value::String(self.chart_type.as_str().into()));
        for (key, value) in &self.args {
            if key != "type" {
                options.insert(key.clone(), value.clone());
            }
        }
        Value::Object(options)
    }
}

#[async_trait]
pub trait GenerateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produces the artifact and returns its locator (URL or `file://` path).
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Picks the strategy named by the configuration.
pub fn build_strategy(config: &GenerateConfig) -> Result<Arc<dyn GenerateStrategy>> {
    config.validate()?;
    let renderer: Arc<dyn Renderer> = Arc::new(SpecRenderer);

    let strategy: Arc<dyn GenerateStrategy> = match config.strategy {
        StrategyKind::Local => Arc::new(LocalFileStrategy::new(
            renderer,
            config.output_dir.clone(),
        )),
        StrategyKind::Antvis => Arc::new(RemoteApiStrategy::new(config.request_server.clone())?),
        StrategyKind::Minio => {
            let store = Arc::new(S3ObjectStore::new(&config.minio)?);
            Arc::new(ObjectStorageStrategy::new(
                store,
                renderer,
                StorageSettings::from(&config.minio),
                config.output_dir.clone(),
            ))
        }
    };

    tracing::info!(strategy = strategy.name(), "Generation strategy selected");
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_options_put_type_first() {
        let args = json!({"data": [1], "type": "ignored"})
            .as_object()
            .cloned()
            .unwrap();
        let options = GenerationRequest::new(ChartType::WordCloud, args).render_options();
        assert_eq!(options, json!({"type": "word-cloud", "data": [1]}));
    }

    #[test]
    fn test_build_strategy_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GenerateConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(build_strategy(&config).unwrap().name(), "local");

        config.strategy = StrategyKind::Antvis;
        assert_eq!(build_strategy(&config).unwrap().name(), "antvis");

        config.strategy = StrategyKind::Minio;
        assert_eq!(build_strategy(&config).unwrap().name(), "minio");
    }
}
