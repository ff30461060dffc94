use std::{
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::{Stream, stream::StreamExt};
use pin_project::pin_project;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    core::{protocol::message::JsonRpcMessage, utils::parse_json_rpc_message},
    error::{Error, Result},
    transport::traits::ServerTransport,
};

const BUFFER_CAPACITY: usize = 2 * 1024 * 1024;

/// Newline-delimited JSON-RPC over a pair of byte streams (stdin/stdout for stdio mode).
#[pin_project]
pub struct ByteTransport<R, W> {
    #[pin]
    reader: BufReader<R>,
    #[pin]
    writer: W,
    buf: Vec<u8>,
}

impl<R, W> ByteTransport<R, W>
where
    R: AsyncRead,
    W: AsyncWrite,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFFER_CAPACITY, reader),
            writer,
            buf: Vec::with_capacity(BUFFER_CAPACITY),
        }
    }
}

impl<R, W> Stream for ByteTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    type Item = Result<JsonRpcMessage>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Bytes of a partial line stay in `buf` across polls.
        let mut reader = this.reader.as_mut();
        let poll = {
            let mut read_future = Box::pin(reader.read_until(b'\n', this.buf));
            read_future.as_mut().poll(cx)
        };
        match poll {
            // A final line without a newline may already sit in `buf` from earlier polls.
            Poll::Ready(Ok(0)) if this.buf.iter().all(u8::is_ascii_whitespace) => {
                this.buf.clear();
                tracing::info!("Client closed connection (read 0 bytes)");
                Poll::Ready(None)
            }
            Poll::Ready(Ok(_)) => {
                let line = match String::from_utf8(std::mem::take(this.buf)) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(?e, "Invalid UTF-8 line");
                        return Poll::Ready(Some(Err(Error::Utf8(e))));
                    }
                };
                if line.trim().is_empty() {
                    cx.waker().wake_by_ref();
                    return Poll::Pending;
                }
                Poll::Ready(Some(parse_json_rpc_message(&line)))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(Error::Io(e)))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[async_trait]
impl<R, W> ServerTransport for ByteTransport<R, W>
where
    R: AsyncRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>> {
        self.next().await
    }

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()> {
        let mut this = Pin::new(self).project();
        let json = serde_json::to_string(&msg)?;
        this.writer.write_all(json.as_bytes()).await?;
        this.writer.write_all(b"\n").await?;
        this.writer.flush().await?;
        Ok(())
    }
}
