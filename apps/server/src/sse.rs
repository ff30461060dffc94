use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response, Sse,
        sse::{Event, KeepAlive},
    },
    routing::{get, post},
};
use chart_core::{protocol::message::JsonRpcMessage, utils::CleanupStream};
use chart_server::{Server, transport::ChannelTransport};
use futures::Stream;
use tokio::{
    io,
    sync::{RwLock, mpsc, oneshot},
};
use tokio_stream::{StreamExt, once, wrappers::UnboundedReceiverStream};
use uuid::Uuid;

use crate::SharedRouter;

type SessionId = Arc<str>;
type ServerSender = mpsc::UnboundedSender<JsonRpcMessage>;

/// Legacy SSE transport: one event stream per client, messages posted back by session id.
#[derive(Clone)]
pub struct SseApp {
    router: SharedRouter,
    sessions: Arc<RwLock<HashMap<SessionId, ServerSender>>>,
}

impl SseApp {
    pub fn new(router: SharedRouter) -> Self {
        Self {
            router,
            sessions: Default::default(),
        }
    }

    pub fn routes(&self, endpoint: &str) -> Router {
        Router::new()
            .route(endpoint, get(sse_handler))
            .route("/messages", post(post_handler))
            .with_state(self.clone())
            .merge(crate::health::routes())
    }
}

async fn sse_handler(State(app): State<SseApp>) -> Sse<impl Stream<Item = Result<Event, io::Error>>> {
    let session: SessionId = Arc::from(Uuid::new_v4().to_string());
    tracing::info!(%session, "New SSE connection");

    let (to_client_tx, to_client_rx) = mpsc::unbounded_channel::<JsonRpcMessage>();
    let (to_server_tx, to_server_rx) = mpsc::unbounded_channel::<JsonRpcMessage>();
    app.sessions
        .write()
        .await
        .insert(session.clone(), to_server_tx);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let session_for_task = session.clone();
    let sessions = app.sessions.clone();
    let router = app.router.clone();

    tokio::spawn(async move {
        let transport = ChannelTransport::new(to_client_tx, to_server_rx);
        let server = Server::new(router);

        let result = tokio::select! {
            res = server.run(transport) => res,
            _ = shutdown_rx => {
                tracing::info!(session = %session_for_task, "Client disconnected");
                Ok(())
            }
        };

        sessions.write().await.remove(&session_for_task);
        tracing::debug!(session = %session_for_task, "Session removed");

        if let Err(e) = result {
            tracing::error!(session = %session_for_task, error = %e, "Session server failed");
        }
    });

    let endpoint_event = Event::default()
        .event("endpoint")
        .data(format!("/messages?sessionId={session}"));

    let messages = UnboundedReceiverStream::new(to_client_rx).map(|msg| {
        serde_json::to_string(&msg)
            .map(|json| Event::default().event("message").data(json))
            .map_err(io::Error::other)
    });

    let stream = CleanupStream::new(once(Ok(endpoint_event)).chain(messages), shutdown_tx);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostQuery {
    session_id: Option<String>,
}

async fn post_handler(
    State(app): State<SseApp>,
    Query(PostQuery { session_id }): Query<PostQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = session_id else {
        return (StatusCode::BAD_REQUEST, "No sessionId").into_response();
    };

    let Some(sender) = app.sessions.read().await.get(session_id.as_str()).cloned() else {
        return (StatusCode::BAD_REQUEST, "No active transport").into_response();
    };

    let message = match std::str::from_utf8(&body)
        .map_err(|e| e.to_string())
        .and_then(|text| {
            chart_core::utils::parse_json_rpc_message(text).map_err(|e| e.to_string())
        }) {
        Ok(message) => message,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };

    if sender.send(message).is_err() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Session closed").into_response();
    }
    (StatusCode::ACCEPTED, "Accepted").into_response()
}
