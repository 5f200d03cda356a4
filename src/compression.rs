//! Compression codecs
//!
//! A codec is a stateless pair of stream filters applied transparently
//! around the file byte stream: compress on write, decompress on read.
//! The codec has no persisted identity — a store must be opened with the
//! same codec its files were written with, or decompression fails.
//!
//! Round-trip identity is required: decompressing the compressed form of
//! any byte sequence, including the empty one, yields the original.

use std::io::{self, Read, Write};

/// Stream codec applied around stored values
pub trait Compression: Send + Sync {
    /// Compress everything from `src` into `dst`
    fn compress(&self, dst: &mut dyn Write, src: &mut dyn Read) -> io::Result<()>;

    /// Wrap `src` in a decompressing reader
    fn decompress<'a>(
        &self,
        src: Box<dyn Read + Send + 'a>,
    ) -> io::Result<Box<dyn Read + Send + 'a>>;
}

/// Zstandard codec backed by the `zstd` crate's streaming encoder/decoder
#[derive(Debug, Clone, Copy)]
pub struct ZstdCompression {
    /// Compression level (1-21; 0 means zstd's default)
    pub level: i32,
}

impl ZstdCompression {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCompression {
    fn default() -> Self {
        Self { level: 0 }
    }
}

impl Compression for ZstdCompression {
    fn compress(&self, dst: &mut dyn Write, src: &mut dyn Read) -> io::Result<()> {
        zstd::stream::copy_encode(src, dst, self.level)
    }

    fn decompress<'a>(
        &self,
        src: Box<dyn Read + Send + 'a>,
    ) -> io::Result<Box<dyn Read + Send + 'a>> {
        let decoder = zstd::stream::read::Decoder::new(src)?;
        Ok(Box::new(decoder))
    }
}
