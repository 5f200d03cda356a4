//! Background cache population
//!
//! A buffered read that misses the cache hands its bytes to this worker
//! instead of caching inline, so the read returns without waiting for
//! cache bookkeeping. Jobs are fire-and-forget: callers get no handle,
//! and failures are logged, never propagated.
//!
//! The worker re-validates every job under the exclusive lock before
//! committing: a job is dropped if any mutation happened since the read
//! (the value may be stale) or if the key is already cached (a
//! concurrent read got there first — committing again would double-count
//! the cache size).

use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use crossbeam_channel::Sender;
use parking_lot::RwLock;

use crate::error::Result;

use super::Shared;

/// A pending cache insertion captured at read time
pub(crate) struct PopulateJob {
    pub(crate) key: String,
    pub(crate) value: Bytes,
    /// Store epoch observed while the value was read
    pub(crate) epoch: u64,
}

/// Owned worker thread draining population jobs
pub(crate) struct Populator {
    tx: Option<Sender<PopulateJob>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Populator {
    pub(crate) fn spawn(shared: Arc<RwLock<Shared>>) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded::<PopulateJob>();
        let worker = thread::Builder::new()
            .name("platter-populate".to_string())
            .spawn(move || {
                for job in rx {
                    let mut shared = shared.write();
                    if shared.epoch != job.epoch {
                        tracing::debug!(key = %job.key, "skipping stale cache population");
                        continue;
                    }
                    if shared.cache.contains(&job.key) {
                        continue;
                    }
                    if let Err(err) = shared.cache.try_insert(&job.key, job.value) {
                        tracing::debug!(key = %job.key, %err, "value not cached");
                    }
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Enqueue a job; never blocks the caller
    pub(crate) fn submit(&self, job: PopulateJob) {
        if let Some(tx) = &self.tx {
            // send only fails once the worker is gone, i.e. during drop
            let _ = tx.send(job);
        }
    }
}

impl Drop for Populator {
    fn drop(&mut self) {
        // closing the channel lets the worker drain pending jobs and exit
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
