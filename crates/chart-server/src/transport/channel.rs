use std::io;

use async_trait::async_trait;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::{
    core::protocol::message::JsonRpcMessage,
    error::{Error, Result},
    transport::traits::ServerTransport,
};

/// In-process transport backing an HTTP session: inbound messages arrive on `receiver`,
/// everything the server writes goes out through `sender`.
pub struct ChannelTransport {
    sender: UnboundedSender<JsonRpcMessage>,
    receiver: UnboundedReceiver<JsonRpcMessage>,
}

impl ChannelTransport {
    pub fn new(
        sender: UnboundedSender<JsonRpcMessage>,
        receiver: UnboundedReceiver<JsonRpcMessage>,
    ) -> Self {
        Self { sender, receiver }
    }
}

#[async_trait]
impl ServerTransport for ChannelTransport {
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>> {
        self.receiver.recv().await.map(Ok)
    }

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()> {
        self.sender.send(msg).map_err(|_| {
            Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "session channel closed",
            ))
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.receiver.close();
        Ok(())
    }
}
