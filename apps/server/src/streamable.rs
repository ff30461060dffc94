use std::{collections::HashMap, convert::Infallible, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse, Response, Sse,
        sse::{Event, KeepAlive},
    },
    routing::get,
};
use chart_core::{
    protocol::{
        constants::{CONNECTION_CLOSED, INTERNAL_ERROR},
        error::ErrorData,
        message::{JsonRpcError, JsonRpcMessage},
    },
    utils::parse_json_rpc_value,
};
use chart_error::{Error, Result};
use chart_server::{Server, transport::ChannelTransport};
use tokio::{
    sync::{Mutex, RwLock, mpsc},
    task::JoinHandle,
    time::Instant,
};
use uuid::Uuid;

use crate::SharedRouter;

pub const SESSION_HEADER: &str = "mcp-session-id";

type SessionId = Arc<str>;

struct SessionChannel {
    to_server: mpsc::UnboundedSender<JsonRpcMessage>,
    from_server: mpsc::UnboundedReceiver<JsonRpcMessage>,
    last_seen: Instant,
}

/// One client session. Requests are serialized through the channel lock. A caller that
/// goes away mid-request leaves its reply queued, so replies are matched to the request id.
struct Session {
    channel: Mutex<SessionChannel>,
}

impl Session {
    async fn exchange(&self, message: JsonRpcMessage) -> Result<Option<JsonRpcMessage>> {
        let mut channel = self.channel.lock().await;
        channel.last_seen = Instant::now();

        let request_id = message.id().cloned();
        let expects_response = message.expects_response();
        channel
            .to_server
            .send(message)
            .map_err(|_| Error::System("session server stopped".into()))?;
        if !expects_response {
            return Ok(None);
        }

        loop {
            let reply = channel
                .from_server
                .recv()
                .await
                .ok_or_else(|| Error::System("session server stopped".into()))?;
            if reply.id() == request_id.as_ref() {
                channel.last_seen = Instant::now();
                return Ok(Some(reply));
            }
            tracing::debug!(id = ?reply.id(), "Discarding reply to an abandoned request");
        }
    }
}

/// Streamable HTTP transport keyed by the `mcp-session-id` header.
#[derive(Clone)]
pub struct StreamableApp {
    router: SharedRouter,
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
}

impl StreamableApp {
    pub fn new(router: SharedRouter) -> Self {
        Self {
            router,
            sessions: Default::default(),
        }
    }

    pub fn routes(&self, endpoint: &str) -> Router {
        Router::new()
            .route(
                endpoint,
                get(stream_handler).post(post_handler).delete(delete_handler),
            )
            .with_state(self.clone())
            .merge(crate::health::routes())
    }

    async fn open_session(&self) -> (SessionId, Arc<Session>) {
        let id: SessionId = Arc::from(Uuid::new_v4().to_string());
        let (to_client_tx, to_client_rx) = mpsc::unbounded_channel();
        let (to_server_tx, to_server_rx) = mpsc::unbounded_channel();

        let session = Arc::new(Session {
            channel: Mutex::new(SessionChannel {
                to_server: to_server_tx,
                from_server: to_client_rx,
                last_seen: Instant::now(),
            }),
        });
        self.sessions
            .write()
            .await
            .insert(id.clone(), session.clone());

        let server = Server::new(self.router.clone());
        let session_for_task = id.clone();
        tokio::spawn(async move {
            if let Err(e) = server
                .run(ChannelTransport::new(to_client_tx, to_server_rx))
                .await
            {
                tracing::error!(session = %session_for_task, error = %e, "Session server failed");
            }
            tracing::debug!(session = %session_for_task, "Session server stopped");
        });

        tracing::info!(session = %id, "Session initialized");
        (id, session)
    }

    async fn session(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drops the session; its server task ends once the inbound channel closes.
    async fn close_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Removes sessions idle for longer than `idle`. Sessions busy with a request are kept.
    pub async fn sweep_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| match session.channel.try_lock() {
            Ok(channel) if channel.last_seen.elapsed() > idle => {
                tracing::info!(session = %id, "Idle session reaped");
                false
            }
            _ => true,
        });
        before - sessions.len()
    }

    pub fn spawn_idle_sweeper(&self, idle: Duration) -> JoinHandle<()> {
        let app = self.clone();
        let period = (idle / 2).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                app.sweep_idle(idle).await;
            }
        })
    }
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

fn json_rpc_error(status: StatusCode, code: i32, message: &str) -> Response {
    let error = JsonRpcMessage::Error(JsonRpcError::new(None, ErrorData::new(code, message)));
    (status, Json(error)).into_response()
}

fn bad_session() -> Response {
    json_rpc_error(
        StatusCode::BAD_REQUEST,
        CONNECTION_CLOSED,
        "Bad Request: No valid session ID provided",
    )
}

async fn post_handler(State(app): State<StreamableApp>, headers: HeaderMap, body: Bytes) -> Response {
    let message = match serde_json::from_slice(&body)
        .map_err(Error::from)
        .and_then(parse_json_rpc_value)
    {
        Ok(message) => message,
        Err(e) => {
            let error = JsonRpcMessage::Error(JsonRpcError::new(None, ErrorData::from(&e)));
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    let is_initialize = matches!(&message, JsonRpcMessage::Request(req) if req.is_initialize());
    let (id, session) = match session_id(&headers) {
        Some(id) => match app.session(id).await {
            Some(session) => (Arc::from(id), session),
            None => return bad_session(),
        },
        None if is_initialize => app.open_session().await,
        None => return bad_session(),
    };

    let headers = [(SESSION_HEADER, id.to_string())];
    match session.exchange(message).await {
        Ok(Some(reply)) => (StatusCode::OK, headers, Json(reply)).into_response(),
        Ok(None) => (StatusCode::ACCEPTED, headers).into_response(),
        Err(e) => {
            tracing::error!(session = %id, error = %e, "Request forwarding failed");
            app.close_session(&id).await;
            json_rpc_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                "Internal Server Error",
            )
        }
    }
}

async fn stream_handler(State(app): State<StreamableApp>, headers: HeaderMap) -> Response {
    let Some(id) = session_id(&headers) else {
        return (StatusCode::BAD_REQUEST, "No sessionId").into_response();
    };
    if app.session(id).await.is_none() {
        return (StatusCode::BAD_REQUEST, "No active transport").into_response();
    }

    tracing::debug!(session = %id, "Standalone SSE stream opened");
    let stream = futures::stream::pending::<std::result::Result<Event, Infallible>>();
    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

async fn delete_handler(State(app): State<StreamableApp>, headers: HeaderMap) -> Response {
    let Some(id) = session_id(&headers) else {
        return (StatusCode::BAD_REQUEST, "Invalid or missing sessionId").into_response();
    };
    if app.close_session(id).await {
        tracing::info!(session = %id, "Session terminated by client");
        StatusCode::OK.into_response()
    } else {
        (StatusCode::BAD_REQUEST, "No active transport").into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use chart_core::{Tool, content::Content, protocol::capabilities::ServerCapabilities};
    use chart_server::CapabilitiesBuilder;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{body_text, chart_router};

    fn app() -> (StreamableApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (StreamableApp::new(chart_router(dir.path())), dir)
    }

    fn post(body: Value, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json");
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn initialize() -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {"protocolVersion": "2025-03-26", "capabilities": {}, "clientInfo": {"name": "t", "version": "1"}}
        })
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    async fn start(app: &StreamableApp) -> String {
        let response = app
            .routes("/mcp")
            .oneshot(post(initialize(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers()[SESSION_HEADER].to_str().unwrap().to_string();
        let body = json_body(response).await;
        assert_eq!(body["result"]["serverInfo"]["name"], "mcp-server-chart");
        id
    }

    #[tokio::test]
    async fn test_request_without_session_rejected() {
        let (app, _dir) = app();
        let response = app
            .routes("/mcp")
            .oneshot(post(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32000, "message": "Bad Request: No valid session ID provided"}
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let (app, _dir) = app();
        let response = app
            .routes("/mcp")
            .oneshot(post(initialize(), Some("stale")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_flow() {
        let (app, _dir) = app();
        let id = start(&app).await;

        let response = app
            .routes("/mcp")
            .oneshot(post(
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                Some(&id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .routes("/mcp")
            .oneshot(post(
                json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
                Some(&id),
            ))
            .await
            .unwrap();
        assert_eq!(response.headers()[SESSION_HEADER], id.as_str());
        let body = json_body(response).await;
        assert_eq!(body["id"], 2);
        assert!(body["result"]["tools"].as_array().unwrap().len() > 10);

        let response = app
            .routes("/mcp")
            .oneshot(post(
                json!({
                    "jsonrpc": "2.0",
                    "id": 3,
                    "method": "tools/call",
                    "params": {
                        "name": "generate_pie_chart",
                        "arguments": {"data": [{"category": "A", "value": 10}, {"category": "B", "value": 20}]}
                    }
                }),
                Some(&id),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("file://"), "{body}");

        let response = app
            .routes("/mcp")
            .oneshot(
                Request::delete("/mcp")
                    .header(SESSION_HEADER, &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .routes("/mcp")
            .oneshot(post(json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}), Some(&id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tool_errors_stay_in_json_rpc() {
        let (app, _dir) = app();
        let id = start(&app).await;

        let response = app
            .routes("/mcp")
            .oneshot(post(
                json!({
                    "jsonrpc": "2.0",
                    "id": 5,
                    "method": "tools/call",
                    "params": {"name": "generate_foo_chart", "arguments": {}}
                }),
                Some(&id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["message"], "Unknown tool: generate_foo_chart.");
    }

    #[tokio::test]
    async fn test_get_stream_requires_session() {
        let (app, _dir) = app();
        let response = app
            .routes("/mcp")
            .oneshot(Request::get("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let id = start(&app).await;
        let response = app
            .routes("/mcp")
            .oneshot(
                Request::get("/mcp")
                    .header(SESSION_HEADER, &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
    }

    struct SlowRouter;

    #[async_trait::async_trait]
    impl chart_server::Router for SlowRouter {
        fn name(&self) -> String {
            "slow".into()
        }

        fn version(&self) -> String {
            "0.0.0".into()
        }

        fn capabilities(&self) -> ServerCapabilities {
            CapabilitiesBuilder::new().with_tools(false).build()
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, tool_name: &str, _arguments: Value) -> Result<Vec<Content>> {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec![Content::text(format!("locator-for-{tool_name}"))])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_reply_not_delivered_to_next_request() {
        let app = StreamableApp::new(Arc::new(SlowRouter));
        let response = app
            .routes("/mcp")
            .oneshot(post(initialize(), None))
            .await
            .unwrap();
        let id = response.headers()[SESSION_HEADER].to_str().unwrap().to_string();

        let call = app.routes("/mcp").oneshot(post(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "first", "arguments": {}}
            }),
            Some(&id),
        ));
        assert!(tokio::time::timeout(Duration::from_millis(50), call).await.is_err());
        tokio::time::sleep(Duration::from_millis(400)).await;

        let response = app
            .routes("/mcp")
            .oneshot(post(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}), Some(&id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], 2);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn test_idle_sessions_reaped() {
        let (app, _dir) = app();
        let id = start(&app).await;

        assert_eq!(app.sweep_idle(Duration::from_secs(60)).await, 0);
        tokio::time::pause();
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(app.sweep_idle(Duration::from_secs(60)).await, 1);
        assert!(app.session(&id).await.is_none());
    }
}
