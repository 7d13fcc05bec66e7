//! Activity logging
//!
//! Each API action is mirrored to the console and appended to the document
//! store's `logs` collection. The store write runs off the request path and
//! its failure never reaches the request: the entry goes to an optional
//! JSONL fallback file instead. Pending writes are tracked so `shutdown`
//! can wait for them before the process exits.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::db::{Action, DocumentStore, LogEntry};

/// Records API activity
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<dyn DocumentStore>,
    fallback: Arc<Mutex<Option<FallbackSink>>>,
    pending: Arc<StdMutex<JoinSet<()>>>,
}

struct FallbackSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            fallback: Arc::new(Mutex::new(None)),
            pending: Arc::new(StdMutex::new(JoinSet::new())),
        }
    }

    /// Send entries the store rejects to a local JSONL file
    pub async fn init_fallback_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut fallback = self.fallback.lock().await;
        *fallback = Some(FallbackSink {
            writer: BufWriter::new(file),
            path: path.clone(),
        });

        info!("Activity fallback log initialized to {}", path.display());
        Ok(())
    }

    /// Record an action
    ///
    /// The store write is queued and `record` returns immediately.
    pub fn record(&self, action: Action, details: impl Into<String>) {
        let entry = LogEntry::new(action, details);

        info!(
            target: "activity",
            action = %entry.action,
            timestamp = %entry.timestamp.to_rfc3339(),
            "[LOG] {}",
            entry.details
        );

        let logger = self.clone();
        let mut pending = self.pending();
        // Reap finished writes so the set only holds in-flight ones
        while pending.try_join_next().is_some() {}
        pending.spawn(async move { logger.persist(entry).await });
    }

    /// Wait for every queued store write to finish or fall back
    ///
    /// Entries recorded while draining are waited on as well.
    pub async fn shutdown(&self) {
        let mut drained = 0usize;
        loop {
            let mut batch = std::mem::take(&mut *self.pending());
            if batch.is_empty() {
                break;
            }
            while let Some(joined) = batch.join_next().await {
                drained += 1;
                if let Err(e) = joined {
                    error!("Activity write task failed: {}", e);
                }
            }
        }
        debug!(drained, "Activity logger drained");
    }

    fn pending(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn persist(&self, entry: LogEntry) {
        if let Err(e) = self.store.append_log(&entry).await {
            warn!(
                action = %entry.action,
                error = %e,
                "Failed to write activity log to {} store",
                self.store.backend()
            );
            self.write_fallback(&entry).await;
        }
    }

    async fn write_fallback(&self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize activity entry: {}", e);
                return;
            }
        };

        let mut fallback = self.fallback.lock().await;

        if let Some(ref mut sink) = *fallback {
            if let Err(e) = writeln!(sink.writer, "{}", line) {
                error!("Failed to write activity fallback to {}: {}", sink.path.display(), e);
            }
            if let Err(e) = sink.writer.flush() {
                error!("Failed to flush activity fallback: {}", e);
            }
        }
    }
}
