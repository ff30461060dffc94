use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chart_error::{Error, Result};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::{
    GenerateStrategy, GenerationRequest,
    render::{RenderGuard, Renderer},
};

/// Renders on the blocking pool and writes `chart-<uuid>.<ext>` into the output directory.
pub struct LocalFileStrategy {
    renderer: Arc<dyn Renderer>,
    output_dir: PathBuf,
}

impl LocalFileStrategy {
    pub fn new(renderer: Arc<dyn Renderer>, output_dir: PathBuf) -> Self {
        Self {
            renderer,
            output_dir,
        }
    }
}

/// Renders `options` and writes the artifact to `dir`. The artifact is destroyed on every
/// path, including a failed write.
pub(crate) fn render_to_file(renderer: &dyn Renderer, options: &Value, dir: &Path) -> Result<PathBuf> {
    let artifact = RenderGuard::new(renderer.render(options)?);
    let buffer = artifact.to_buffer()?;
    let path = dir.join(format!("chart-{}.{}", Uuid::new_v4(), artifact.extension()));
    std::fs::write(&path, &buffer)?;
    tracing::debug!(path = %path.display(), bytes = buffer.len(), "Chart written");
    Ok(path)
}

pub(crate) fn file_locator(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| Error::Internal(format!("not a file path: {}", absolute.display())))
}

#[async_trait]
impl GenerateStrategy for LocalFileStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let renderer = self.renderer.clone();
        let options = request.render_options();
        let dir = self.output_dir.clone();

        let path = tokio::task::spawn_blocking(move || {
            render_to_file(renderer.as_ref(), &options, &dir)
        })
        .await
        .map_err(|e| Error::Internal(format!("render task failed: {e}")))??;

        file_locator(&path)
    }
}
