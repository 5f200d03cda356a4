//! Siphon: streaming read with cache commit at end-of-data
//!
//! A streamed read of an uncached key wraps the (decompressed) disk
//! stream in a `Siphon`, which mirrors every drained byte into a buffer.
//! When the consumer reaches end-of-data the buffer is committed to the
//! cache exactly once, under the store's exclusive lock, with the same
//! re-validation as background population: a commit is dropped if any
//! mutation intervened since the stream was opened, or if a concurrent
//! reader already cached the key.

use std::io::{self, Read};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use super::Shared;

pub(crate) struct Siphon {
    inner: Box<dyn Read + Send>,
    shared: Arc<RwLock<Shared>>,
    key: String,
    /// Store epoch observed when the stream was opened
    epoch: u64,
    buf: Vec<u8>,
    committed: bool,
}

impl Siphon {
    pub(crate) fn new(
        inner: Box<dyn Read + Send>,
        shared: Arc<RwLock<Shared>>,
        key: String,
        epoch: u64,
    ) -> Self {
        Self {
            inner,
            shared,
            key,
            epoch,
            buf: Vec::new(),
            committed: false,
        }
    }

    fn commit(&mut self) {
        let value = Bytes::from(std::mem::take(&mut self.buf));
        let mut shared = self.shared.write();
        if shared.epoch != self.epoch {
            tracing::debug!(key = %self.key, "skipping stale siphon commit");
            return;
        }
        if shared.cache.contains(&self.key) {
            return;
        }
        if let Err(err) = shared.cache.try_insert(&self.key, value) {
            tracing::debug!(key = %self.key, %err, "value not cached");
        }
    }
}

impl Read for Siphon {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        let n = self.inner.read(out)?;
        if n > 0 {
            self.buf.extend_from_slice(&out[..n]);
        } else if !self.committed {
            self.committed = true;
            self.commit();
        }
        Ok(n)
    }
}
