//! Store Module
//!
//! The core store that coordinates all components.
//!
//! ## Responsibilities
//! - Resolve keys to file paths through the transform
//! - Coordinate disk, cache, and index on every mutation
//! - Run the compression pipeline around the file byte stream
//! - Dispatch lazy cache population after buffered reads

mod paths;
mod populate;
mod siphon;
mod walk;

pub use walk::Keys;

use std::fs;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::cache::Cache;
use crate::config::Options;
use crate::error::{Result, StoreError};
use crate::index::Index;

use populate::{PopulateJob, Populator};
use siphon::Siphon;

/// State guarded by the store's reader/writer lock: the cache, the
/// index, and the mutation epoch move together or not at all.
pub(crate) struct Shared {
    pub(crate) cache: Cache,
    pub(crate) index: Option<Box<dyn Index>>,
    /// Bumped by every mutation (write, erase, erase_all). Deferred
    /// cache commits captured under an older epoch are dropped, so a
    /// read racing an overwrite can never plant pre-overwrite bytes in
    /// the cache.
    pub(crate) epoch: u64,
}

/// A persistent key-value store, one file per value
///
/// ## Concurrency Model: Single Reader/Writer Lock
///
/// - **Mutations** (write/erase/erase_all): take the lock exclusively
///   for their full critical section, so no two mutations interleave
///   their effects on cache, index, or disk.
/// - **Reads**: take the lock shared for the cache lookup and the disk
///   read only. The lazy cache population they trigger runs on a
///   separate worker thread that takes the lock exclusively when it
///   commits, re-validating first — the read's return value is never
///   delayed by cache bookkeeping.
/// - **Streamed reads**: commit to the cache from the consumer's thread
///   at end-of-data, with the same exclusive-lock re-validation.
pub struct Store {
    options: Options,
    shared: Arc<RwLock<Shared>>,
    populator: Populator,
}

impl Store {
    /// Open a store over the given options.
    ///
    /// If an index is configured, the base directory is scanned once to
    /// populate it with existing keys. Data already present under the
    /// base path is accessible immediately, but not yet cached.
    pub fn open(mut options: Options) -> Result<Self> {
        let mut index = options.index.take();
        if let Some(index) = index.as_mut() {
            let started = Instant::now();
            let mut keys = walk::walk(&options.base_path);
            index.initialize(&mut keys);
            tracing::debug!(
                keys = index.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "index initialized from directory scan"
            );
        }

        let shared = Arc::new(RwLock::new(Shared {
            cache: Cache::new(options.cache_size_max),
            index,
            epoch: 0,
        }));
        let populator = Populator::spawn(Arc::clone(&shared))?;

        Ok(Self {
            options,
            shared,
            populator,
        })
    }

    /// Open a store rooted at the given path with default options
    pub fn open_path(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::open(Options::builder().base_path(path).build())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write the value under the key, making it immediately available
    /// for reads. Overwrites anything already stored under the key.
    ///
    /// Relies on the filesystem to perform an eventual sync to physical
    /// media; use [`write_and_sync`](Self::write_and_sync) for stronger
    /// guarantees.
    pub fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut reader = value;
        self.write_from(key, &mut reader, false)
    }

    /// As [`write`](Self::write), plus forcing file data to stable
    /// storage before returning
    pub fn write_and_sync(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut reader = value;
        self.write_from(key, &mut reader, true)
    }

    /// Write everything the reader yields under the key, optionally
    /// syncing to stable storage before returning
    pub fn write_stream<R: Read>(&self, key: &str, mut reader: R, sync: bool) -> Result<()> {
        self.write_from(key, &mut reader, sync)
    }

    fn write_from(&self, key: &str, reader: &mut dyn Read, sync: bool) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let mut shared = self.shared.write();

        // a failure here leaves disk, cache, and index all untouched
        paths::ensure_dirs(&self.options, key)?;

        // the cache entry is stale the moment the file is opened for
        // truncation, so invalidate whether or not the write succeeds
        let outcome = self.write_file(key, reader, sync);
        shared.epoch += 1;
        shared.cache.invalidate(key);
        outcome?;

        // index only on success
        if let Some(index) = shared.index.as_mut() {
            index.insert(key);
        }
        Ok(())
    }

    fn write_file(&self, key: &str, reader: &mut dyn Read, sync: bool) -> Result<()> {
        let mut file = paths::create_file(&self.options, key)?;
        match &self.options.compression {
            Some(codec) => codec.compress(&mut file, reader)?,
            None => {
                io::copy(reader, &mut file)?;
            }
        }
        if sync {
            file.sync_all()?;
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read the value stored under the key.
    ///
    /// A cache hit never touches the disk. A miss reads the file
    /// (decompressing if a codec is configured) and lazily schedules the
    /// value for caching; the returned bytes are not delayed by that.
    pub fn read(&self, key: &str) -> Result<Bytes> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let shared = self.shared.read();
        if let Some(value) = shared.cache.lookup(key) {
            return Ok(value);
        }

        let file = paths::open_for_read(&self.options, key)?;
        let mut reader = self.decode_reader(Box::new(file))?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let value = Bytes::from(buf);

        let epoch = shared.epoch;
        let cache_enabled = shared.cache.enabled();
        drop(shared);

        if cache_enabled {
            self.populator.submit(PopulateJob {
                key: key.to_string(),
                value: value.clone(),
                epoch,
            });
        }
        Ok(value)
    }

    /// Open a reader over the value stored under the key.
    ///
    /// With `bypass_cache` false, a cached value is served from memory
    /// with no further codec application; an uncached value streams from
    /// disk and is committed to the cache exactly once when the reader
    /// reaches end-of-data. With `bypass_cache` true, the stream always
    /// comes straight from disk and the cache is left alone.
    pub fn read_stream(
        &self,
        key: &str,
        bypass_cache: bool,
    ) -> Result<Box<dyn Read + Send + 'static>> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let shared = self.shared.read();
        if !bypass_cache {
            if let Some(value) = shared.cache.lookup(key) {
                return Ok(Box::new(io::Cursor::new(value)));
            }
        }

        let file = paths::open_for_read(&self.options, key)?;
        let reader = self.decode_reader(Box::new(file))?;

        if bypass_cache || !shared.cache.enabled() {
            return Ok(reader);
        }

        Ok(Box::new(Siphon::new(
            reader,
            Arc::clone(&self.shared),
            key.to_string(),
            shared.epoch,
        )))
    }

    /// Whether a value exists under the key.
    ///
    /// Cache membership short-circuits without touching the disk. A
    /// path that resolves to a directory is a key/transform collision
    /// and maps to `BadKey`.
    pub fn exists(&self, key: &str) -> Result<bool> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        if self.shared.read().cache.contains(key) {
            return Ok(true);
        }
        match fs::metadata(paths::file_for(&self.options, key)) {
            Ok(meta) if meta.is_dir() => Err(StoreError::BadKey),
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    // =========================================================================
    // Erases
    // =========================================================================

    /// Erase the value stored under the key from disk, cache, and
    /// index, then prune now-empty parent directories.
    pub fn erase(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let mut shared = self.shared.write();

        let path = paths::file_for(&self.options, key);
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound)
            }
            Err(err) => return Err(err.into()),
        };
        if meta.is_dir() {
            return Err(StoreError::BadKey);
        }
        fs::remove_file(&path)?;

        shared.epoch += 1;
        shared.cache.invalidate(key);
        if let Some(index) = shared.index.as_mut() {
            index.delete(key);
        }

        paths::prune_dirs(&self.options, key)
    }

    /// Delete everything in the store: the cache, the index, and the
    /// whole directory tree under the base path.
    ///
    /// `erase_all` doesn't distinguish store data from anything else
    /// living under the base path, so the base path should be a
    /// directory used exclusively by this store.
    pub fn erase_all(&self) -> Result<()> {
        let mut shared = self.shared.write();
        shared.epoch += 1;
        shared.cache.clear();
        if let Some(index) = shared.index.as_mut() {
            index.initialize(&mut std::iter::empty());
        }
        match fs::remove_dir_all(&self.options.base_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    // =========================================================================
    // Key Enumeration
    // =========================================================================

    /// Lazily yield every key in the store, in unspecified order.
    ///
    /// The walk is finite and not restartable; call again for a fresh
    /// enumeration. Under concurrent mutation it is a best-effort
    /// snapshot.
    pub fn keys(&self) -> Keys {
        walk::walk(&self.options.base_path)
    }

    /// As [`keys`](Self::keys), filtered to keys starting with `prefix`
    pub fn keys_prefix(&self, prefix: &str) -> Keys {
        walk::walk_prefix(&self.options.base_path, prefix)
    }

    /// Up to `count` keys in index order, starting after `from` (or at
    /// the minimum key when `from` is empty or unknown). See
    /// [`Index::keys_from`].
    ///
    /// # Panics
    ///
    /// Panics if the store was opened without an index.
    pub fn keys_from(&self, from: &str, count: usize) -> Vec<String> {
        let shared = self.shared.read();
        let index = shared
            .index
            .as_ref()
            .expect("store has no index configured");
        index.keys_from(from, count)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Base directory path
    pub fn base_path(&self) -> &std::path::Path {
        &self.options.base_path
    }

    /// Current total of cached bytes
    pub fn cache_size(&self) -> u64 {
        self.shared.read().cache.size()
    }

    /// Configured maximum cache size
    pub fn cache_size_max(&self) -> u64 {
        self.shared.read().cache.max()
    }

    /// Number of cached entries
    pub fn cache_len(&self) -> usize {
        self.shared.read().cache.len()
    }

    /// Whether the key currently has a cache entry
    pub fn is_cached(&self, key: &str) -> bool {
        self.shared.read().cache.contains(key)
    }

    /// Whether the store maintains an ordered index
    pub fn indexed(&self) -> bool {
        self.shared.read().index.is_some()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Wrap a raw file stream in the read-side codec, if configured
    fn decode_reader(
        &self,
        src: Box<dyn Read + Send + 'static>,
    ) -> Result<Box<dyn Read + Send + 'static>> {
        match &self.options.compression {
            Some(codec) => Ok(codec.decompress(src)?),
            None => Ok(src),
        }
    }
}
