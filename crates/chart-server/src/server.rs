use std::sync::Arc;

use tracing::Instrument;

use crate::{
    core::protocol::{
        error::ErrorData,
        message::{JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse},
    },
    error::{Error, Result},
    router::{RouterService, traits::Router},
    transport::traits::ServerTransport,
};

/// Drives one protocol session: reads messages from a transport, answers requests through
/// the router and writes the responses back.
pub struct Server {
    router: Arc<dyn Router>,
}

impl Server {
    pub fn new(router: Arc<dyn Router>) -> Self {
        Self { router }
    }

    pub async fn run(self, mut transport: impl ServerTransport) -> Result<()> {
        tracing::info!(server = %self.router.name(), "Server started");
        while let Some(msg_result) = transport.read_message().await {
            let span = tracing::span!(tracing::Level::INFO, "message_processing");

            match msg_result {
                Ok(msg) => {
                    self.handle_message(&mut transport, msg)
                        .instrument(span)
                        .await?;
                }
                Err(e) => {
                    Self::handle_error(&mut transport, e).instrument(span).await?;
                }
            }
        }
        tracing::info!("Server transport closed, exiting run loop");

        transport.close().await
    }

    async fn handle_message(
        &self,
        transport: &mut impl ServerTransport,
        msg: JsonRpcMessage,
    ) -> Result<()> {
        match msg {
            JsonRpcMessage::Request(request) => {
                let response = self.process_request(request).await;
                Self::send_response(transport, response).await?;
            }
            JsonRpcMessage::Notification(notification) => {
                tracing::debug!(method = %notification.method, "Notification received");
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) | JsonRpcMessage::Nil => {
                tracing::debug!("Ignoring non-request message");
            }
        }
        Ok(())
    }

    async fn process_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(
            request_id = ?request.id,
            method = %request.method,
            "Received request"
        );
        RouterService::dispatch(self.router.as_ref(), request).await
    }

    async fn send_response(
        transport: &mut impl ServerTransport,
        response: JsonRpcResponse,
    ) -> Result<()> {
        tracing::debug!(
            response_id = ?response.id,
            is_error = response.error.is_some(),
            "Sending response"
        );

        transport
            .write_message(JsonRpcMessage::Response(response))
            .await
    }

    async fn handle_error(transport: &mut impl ServerTransport, e: Error) -> Result<()> {
        tracing::warn!(error = %e, "Unreadable message");
        let error_response = JsonRpcMessage::Error(JsonRpcError::new(None, ErrorData::from(&e)));
        transport.write_message(error_response).await
    }
}
