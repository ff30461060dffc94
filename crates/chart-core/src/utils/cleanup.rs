use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream as FuturesStream;
use tokio::sync::oneshot;

/// Wraps an outbound event stream and fires `shutdown_tx` once the stream finishes or
/// the HTTP client goes away, so the session's server task can stop.
pub struct CleanupStream<S> {
    inner: S,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl<S> CleanupStream<S> {
    pub fn new(inner: S, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self {
            inner,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn fire(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl<S, T, E> FuturesStream for CleanupStream<S>
where
    S: FuturesStream<Item = Result<T, E>> + Unpin,
{
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(None) = poll {
            self.fire();
        }
        poll
    }
}

impl<S> Drop for CleanupStream<S> {
    fn drop(&mut self) {
        self.fire();
    }
}
