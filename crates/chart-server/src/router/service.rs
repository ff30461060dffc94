use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;

use crate::{
    core::protocol::{
        constants::METHOD_NOT_FOUND,
        error::ErrorData,
        message::{JsonRpcRequest, JsonRpcResponse},
    },
    router::{ext::RouterExt, traits::Router},
};

/// Turns JSON-RPC requests into responses using a shared [`Router`]. Handler failures
/// become error responses, so the service itself never fails.
#[derive(Clone)]
pub struct RouterService(pub Arc<dyn Router>);

impl RouterService {
    pub async fn dispatch(router: &dyn Router, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let method = req.method.clone();

        let result = match method.as_str() {
            "initialize" => router.handle_initialize(req).await,
            "ping" => router.handle_ping(req).await,
            "tools/list" => router.handle_tools_list(req).await,
            "tools/call" => router.handle_tools_call(req).await,
            "resources/list" => router.handle_empty_list(req, "resources").await,
            "prompts/list" => router.handle_empty_list(req, "prompts").await,
            _ => {
                return JsonRpcResponse::with_error(
                    id,
                    ErrorData::new(METHOD_NOT_FOUND, format!("Method '{method}' not found")),
                );
            }
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, method = %method, "Request processing failed");
                JsonRpcResponse::with_error(id, ErrorData::from(&e))
            }
        }
    }
}

impl Service<JsonRpcRequest> for RouterService {
    type Response = JsonRpcResponse;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn Future<Output = core::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<core::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: JsonRpcRequest) -> Self::Future {
        let router = self.0.clone();
        Box::pin(async move { Ok(Self::dispatch(router.as_ref(), req).await) })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        core::{Tool, content::Content, protocol::capabilities::ServerCapabilities},
        error::Result,
        router::capabilities::CapabilitiesBuilder,
    };

    struct Silent;

    #[async_trait]
    impl Router for Silent {
        fn name(&self) -> String {
            "silent".into()
        }

        fn version(&self) -> String {
            "0.0.1".into()
        }

        fn capabilities(&self) -> ServerCapabilities {
            CapabilitiesBuilder::new().with_tools(false).build()
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, _tool_name: &str, _arguments: Value) -> Result<Vec<Content>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_service_never_fails() {
        let mut service = RouterService(Arc::new(Silent));

        let response = service
            .call(JsonRpcRequest::new(1, "tools/list", None))
            .await
            .unwrap();
        assert_eq!(response.result, Some(json!({"tools": []})));

        let response = service
            .call(JsonRpcRequest::new("x", "logging/setLevel", None))
            .await
            .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method 'logging/setLevel' not found");
        assert_eq!(response.id, Some(json!("x")));
    }
}
