//! # platter
//!
//! A simple, persistent key-value store that keeps all data flatly on
//! the filesystem — one file per value — with:
//! - A bounded in-memory read cache with eviction
//! - An optional ordered index for range/pagination queries
//! - An optional streaming compression codec
//! - A pluggable key-to-path transform deciding the directory layout
//!
//! ## Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │           Store             │
//!                    │   (reader/writer lock)      │
//!                    └──────┬───────────┬──────────┘
//!                           │           │
//!              ┌────────────▼──┐   ┌────▼────────────┐
//!              │ Bounded Cache │   │  Ordered Index  │
//!              │ (map + size)  │   │  (BTree, cmp)   │
//!              └───────────────┘   └─────────────────┘
//!                           │
//!              ┌────────────▼────────────┐
//!              │  Compression Pipeline   │
//!              │  (codec, optional)      │
//!              └────────────┬────────────┘
//!                           │
//!              ┌────────────▼────────────┐
//!              │   Flat Files on Disk    │
//!              │ base/<transform>/<key>  │
//!              └─────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use platter::{Options, Store};
//!
//! # fn main() -> platter::Result<()> {
//! let store = Store::open(
//!     Options::builder()
//!         .base_path("my-data-dir")
//!         .cache_size_max(1024 * 1024)
//!         .build(),
//! )?;
//!
//! store.write("alpha", b"some value")?;
//! let value = store.read("alpha")?;
//! assert_eq!(&value[..], b"some value");
//! store.erase("alpha")?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod transform;
pub mod compression;
pub mod index;
pub mod store;

mod cache;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{is_not_found, Result, StoreError};
pub use config::{Options, OptionsBuilder};
pub use compression::{Compression, ZstdCompression};
pub use index::{lexical_order, BTreeIndex, Index, KeyCompare};
pub use store::{Keys, Store};
pub use transform::{block_transform, flat_transform, TransformFn};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of platter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
