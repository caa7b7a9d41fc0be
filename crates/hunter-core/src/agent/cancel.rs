//! Cooperative cancellation plumbing.
//!
//! A `CancelHandle`/`CancelSignal` pair is created per task. The executor
//! keeps the handle and fires it on an explicit cancel request, on
//! shutdown, or when a configured deadline elapses; the signal travels
//! into the run and is observed at the next suspension point.

use tokio::sync::watch;

/// Sender half. Held by the executor for the duration of one run.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half. Cloneable so the envelope and the agent can both watch
/// the same run's signal.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Non-blocking check, for cooperative early exits between work phases.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested.
    ///
    /// A dropped handle means nobody will ever cancel this run, so the
    /// future stays pending forever rather than resolving spuriously.
    pub async fn cancelled(mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked handle/signal pair for one run.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}
