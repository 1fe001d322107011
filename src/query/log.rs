//! Fire-and-forget query logging: rows go onto a bounded queue and a
//! background task writes them, so a slow or failing insert never
//! delays an answer.

use tokio::sync::mpsc;

use crate::store::{QueryLogEntry, SupabaseStore};

const LOG_QUEUE_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct QueryLogger {
    tx: mpsc::Sender<QueryLogEntry>,
}

impl QueryLogger {
    /// Starts the background writer and returns the queue handle.
    pub fn spawn(store: SupabaseStore) -> Self {
        let (tx, mut rx) = mpsc::channel::<QueryLogEntry>(LOG_QUEUE_CAPACITY);
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                if let Err(err) = store.insert_query_log(&entry).await {
                    tracing::warn!("query log insert failed: {}", err);
                }
            }
        });
        Self { tx }
    }

    /// Queues one row at most once, dropping it when the queue is full
    /// or the writer is gone.
    pub fn record(&self, entry: QueryLogEntry) {
        if let Err(err) = self.tx.try_send(entry) {
            tracing::debug!("query log row dropped: {}", err);
        }
    }
}
