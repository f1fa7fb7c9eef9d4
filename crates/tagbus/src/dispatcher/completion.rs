/// Completion handle returned by asynchronous publish
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Guard held by one launched handler task. Dropping it marks the task done.
#[derive(Debug, Clone)]
pub(crate) struct TaskGuard {
    _tx: mpsc::Sender<()>,
}

/// Resolves once every handler launched by one [`publish`](crate::Dispatcher::publish)
/// call has finished.
///
/// Each launched task holds a [`TaskGuard`]; the handle owns the receiving
/// side of the channel and completes when the channel reports that every
/// guard has been dropped. Nothing is ever sent, so the handle carries no
/// per-handler outcome.
///
/// Awaiting is optional: dropping the handle does not cancel anything.
#[derive(Debug)]
#[must_use = "a Completion does nothing unless awaited or waited on"]
pub struct Completion {
    rx: mpsc::Receiver<()>,
    launched: usize,
}

impl Completion {
    /// Creates a handle and the guard to clone into each launched task.
    pub(crate) fn channel(launched: usize) -> (TaskGuard, Self) {
        let (tx, rx) = mpsc::channel(1);
        (TaskGuard { _tx: tx }, Self { rx, launched })
    }

    /// Number of handler tasks launched by the publish call.
    pub fn launched(&self) -> usize {
        self.launched
    }

    /// Blocks the current thread until every launched handler has finished.
    ///
    /// Usable with or without a runtime; inside async code prefer `.await`.
    /// The wait is exempt from tokio's cooperative budget, which a blocking
    /// caller never gets to refill.
    pub fn wait(self) {
        futures::executor::block_on(tokio::task::unconstrained(self))
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            match self.rx.poll_recv(cx) {
                Poll::Ready(None) => return Poll::Ready(()),
                Poll::Ready(Some(())) => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
