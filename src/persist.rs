//! Background writer for key-value updates.
//!
//! Store operations hand their writes to this task and return right away.
//! Operations are applied one at a time in the order they were queued.
//! Failures are logged and dropped.

use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug)]
enum PersistOp {
    Set { key: String, value: String },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Dropping every handle lets the task finish
/// the queued operations and exit.
#[derive(Debug, Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistOp>,
}

impl Persister {
    /// Start the writer on the current tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PersistOp>();

        tokio::spawn(async move {
            while let Some(op) = rx.recv().await {
                match op {
                    PersistOp::Set { key, value } => {
                        if let Err(e) = store.set(&key, &value).await {
                            warn!("Failed to persist key {}: {}", key, e);
                        }
                    }
                    PersistOp::Remove { key } => {
                        if let Err(e) = store.remove(&key).await {
                            warn!("Failed to remove persisted key {}: {}", key, e);
                        }
                    }
                    PersistOp::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("Persistence writer stopped");
        });

        Self { tx }
    }

    pub fn set(&self, key: &str, value: &str) {
        self.enqueue(PersistOp::Set {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    pub fn remove(&self, key: &str) {
        self.enqueue(PersistOp::Remove {
            key: key.to_string(),
        });
    }

    /// Wait until everything queued before this call has been applied
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(PersistOp::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    fn enqueue(&self, op: PersistOp) {
        if self.tx.send(op).is_err() {
            warn!("Persistence writer is gone; dropping update");
        }
    }
}
