//! Configuration for a platter store
//!
//! Centralized options with sensible defaults, built with the builder.

use std::path::PathBuf;
use std::sync::Arc;

use crate::compression::Compression;
use crate::index::Index;
use crate::transform::{flat_transform, TransformFn};

/// Default directory permissions (unix mode, ignored elsewhere)
pub const DEFAULT_DIR_PERM: u32 = 0o777;

/// Default file permissions (unix mode, ignored elsewhere)
pub const DEFAULT_FILE_PERM: u32 = 0o666;

/// Options for a [`Store`](crate::Store) instance
///
/// All values are optional; `Options::default()` gives a store rooted at
/// `./platter-data` with a flat layout, caching disabled, no index, and
/// no compression.
pub struct Options {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files. Every key's file lives somewhere
    /// under this directory; `erase_all` removes the whole tree.
    pub base_path: PathBuf,

    /// Key-to-path transform deciding the directory layout under
    /// `base_path`
    pub transform: TransformFn,

    /// Directory creation permissions (unix mode)
    pub dir_perm: u32,

    /// File creation permissions (unix mode)
    pub file_perm: u32,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Maximum total bytes held by the read cache. 0 disables caching
    /// entirely.
    pub cache_size_max: u64,

    // -------------------------------------------------------------------------
    // Optional Collaborators
    // -------------------------------------------------------------------------
    /// Ordered index over live keys, enabling `keys_from` pagination.
    /// Constructed with its comparator by the caller, e.g.
    /// `BTreeIndex::new(lexical_order())`.
    pub index: Option<Box<dyn Index>>,

    /// Compression codec applied around the file byte stream. `None`
    /// stores values verbatim.
    pub compression: Option<Arc<dyn Compression>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./platter-data"),
            transform: flat_transform(),
            dir_perm: DEFAULT_DIR_PERM,
            file_perm: DEFAULT_FILE_PERM,
            cache_size_max: 0,
            index: None,
            compression: None,
        }
    }
}

impl Options {
    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

/// Builder for [`Options`]
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the base directory (root for all stored files)
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.base_path = path.into();
        self
    }

    /// Set the key-to-path transform
    pub fn transform(mut self, transform: TransformFn) -> Self {
        self.options.transform = transform;
        self
    }

    /// Set the directory creation permissions (unix mode)
    pub fn dir_perm(mut self, mode: u32) -> Self {
        self.options.dir_perm = mode;
        self
    }

    /// Set the file creation permissions (unix mode)
    pub fn file_perm(mut self, mode: u32) -> Self {
        self.options.file_perm = mode;
        self
    }

    /// Set the maximum cache size in bytes (0 disables caching)
    pub fn cache_size_max(mut self, bytes: u64) -> Self {
        self.options.cache_size_max = bytes;
        self
    }

    /// Set the ordered index implementation
    pub fn index(mut self, index: Box<dyn Index>) -> Self {
        self.options.index = Some(index);
        self
    }

    /// Set the compression codec
    pub fn compression(mut self, compression: Arc<dyn Compression>) -> Self {
        self.options.compression = Some(compression);
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
