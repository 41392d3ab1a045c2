//! Ordered dispatch of user input to a session.

use std::sync::Arc;

use chatcanvas_core::surface::UserAction;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::conversation::ConversationSession;

/// A request to the session, in input order.
#[derive(Debug)]
pub enum Outgoing {
    Message(String),
    Action(UserAction),
    Cancel,
}

/// Feeds a session from a single worker task.
///
/// Requests start in the order they were queued, so a later message always
/// preempts an earlier one. Started requests keep running concurrently until
/// they settle or are preempted.
pub struct SessionOutbox {
    tx: mpsc::UnboundedSender<Outgoing>,
    worker: JoinHandle<()>,
}

impl SessionOutbox {
    /// Spawns the worker. Must be called from within a Tokio runtime.
    pub fn spawn(session: Arc<ConversationSession>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(session, rx));
        Self { tx, worker }
    }

    /// Queues a request. Returns false once the worker has stopped.
    pub fn send(&self, outgoing: Outgoing) -> bool {
        self.tx.send(outgoing).is_ok()
    }

    /// Cancels whatever is in flight after all queued requests have started,
    /// then waits for the worker to drain.
    pub async fn shutdown(self) {
        let _ = self.tx.send(Outgoing::Cancel);
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::warn!(error = %e, "Session outbox worker failed");
        }
    }
}

async fn run(session: Arc<ConversationSession>, mut rx: mpsc::UnboundedReceiver<Outgoing>) {
    // New futures are first polled in push order.
    let mut running: FuturesUnordered<BoxFuture<'static, ()>> = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            outgoing = rx.recv() => match outgoing {
                Some(outgoing) => running.push(dispatch(Arc::clone(&session), outgoing)),
                None => break,
            },
            Some(()) = running.next(), if !running.is_empty() => {}
        }
    }

    while running.next().await.is_some() {}
}

fn dispatch(session: Arc<ConversationSession>, outgoing: Outgoing) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        match outgoing {
            Outgoing::Message(text) => session.send_message(text).await,
            Outgoing::Action(action) => {
                if let Err(e) = session.send_user_action(action).await {
                    tracing::warn!(error = %e, "Failed to send user action");
                }
            }
            Outgoing::Cancel => session.cancel_ongoing_stream().await,
        }
    })
}
