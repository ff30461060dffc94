//! Contract with the chart renderer. Rendering itself happens outside this crate; strategies
//! only drive an artifact through `to_buffer` and always release it.

use std::ops::Deref;

use chart_error::{Error, Result};
use serde_json::Value;

/// Output of a single render call. Holds renderer-side resources until destroyed.
pub trait RenderedArtifact: Send {
    fn to_buffer(&self) -> Result<Vec<u8>>;

    fn destroy(&mut self);

    /// File extension without the dot.
    fn extension(&self) -> &str;

    fn content_type(&self) -> &str;
}

pub trait Renderer: Send + Sync {
    /// `options` is `{"type": <chart type>, ...validated args}`.
    fn render(&self, options: &Value) -> Result<Box<dyn RenderedArtifact>>;
}

/// Destroys the wrapped artifact when dropped, whatever path the caller leaves by.
pub struct RenderGuard {
    artifact: Box<dyn RenderedArtifact>,
}

impl RenderGuard {
    pub fn new(artifact: Box<dyn RenderedArtifact>) -> Self {
        Self { artifact }
    }
}

impl Deref for RenderGuard {
    type Target = dyn RenderedArtifact;

    fn deref(&self) -> &Self::Target {
        self.artifact.as_ref()
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        self.artifact.destroy();
    }
}

/// Emits the normalized chart spec as a JSON document, ready for an external SSR service.
pub struct SpecRenderer;

impl Renderer for SpecRenderer {
    fn render(&self, options: &Value) -> Result<Box<dyn RenderedArtifact>> {
        Ok(Box::new(SpecArtifact {
            spec: Some(options.clone()),
        }))
    }
}

struct SpecArtifact {
    spec: Option<Value>,
}

impl RenderedArtifact for SpecArtifact {
    fn to_buffer(&self) -> Result<Vec<u8>> {
        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| Error::Internal("artifact already destroyed".into()))?;
        Ok(serde_json::to_vec_pretty(spec)?)
    }

    fn destroy(&mut self) {
        self.spec = None;
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// Renderer whose artifacts count how often they were destroyed.
    #[derive(Clone, Default)]
    pub struct CountingRenderer {
        pub destroyed: Arc<AtomicUsize>,
        pub fail_buffer: bool,
    }

    impl CountingRenderer {
        pub fn destroyed(&self) -> usize {
            self.destroyed.load(Ordering::SeqCst)
        }
    }

    struct CountingArtifact {
        destroyed: Arc<AtomicUsize>,
        fail_buffer: bool,
    }

    impl RenderedArtifact for CountingArtifact {
        fn to_buffer(&self) -> Result<Vec<u8>> {
            if self.fail_buffer {
                return Err(Error::Internal("canvas exploded".into()));
            }
            Ok(b"PNG".to_vec())
        }

        fn destroy(&mut self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }

        fn extension(&self) -> &str {
            "png"
        }

        fn content_type(&self) -> &str {
            "image/png"
        }
    }

    impl Renderer for CountingRenderer {
        fn render(&self, _options: &Value) -> Result<Box<dyn RenderedArtifact>> {
            Ok(Box::new(CountingArtifact {
                destroyed: self.destroyed.clone(),
                fail_buffer: self.fail_buffer,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{testing::CountingRenderer, *};

    #[test]
    fn test_spec_renderer_emits_json() {
        let guard = RenderGuard::new(SpecRenderer.render(&json!({"type": "pie"})).unwrap());
        let bytes = guard.to_buffer().unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, json!({"type": "pie"}));
        assert_eq!(guard.extension(), "json");
        assert_eq!(guard.content_type(), "application/json");
    }

    #[test]
    fn test_guard_destroys_once_on_error_path() {
        let renderer = CountingRenderer {
            fail_buffer: true,
            ..Default::default()
        };
        let result = (|| -> Result<Vec<u8>> {
            let guard = RenderGuard::new(renderer.render(&json!({}))?);
            guard.to_buffer()
        })();
        assert!(result.is_err());
        assert_eq!(renderer.destroyed(), 1);
    }
}
