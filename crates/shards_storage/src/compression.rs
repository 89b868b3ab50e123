#[cfg(feature = "lz4")]
mod lz4_compression;

#[cfg(feature = "lz4")]
pub use lz4_compression::Lz4;

use serde::{Deserialize, Serialize};
use std::io;

/// A compression algorithm that acts directly on a slice of bytes.
pub trait BytesCompression {
    fn compress_bytes(&self, bytes: &[u8], compressed_bytes: impl io::Write) -> io::Result<()>;
    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()>;
}

/// Stores bytes as they are.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NoCompression;

impl BytesCompression for NoCompression {
    fn compress_bytes(&self, bytes: &[u8], mut compressed_bytes: impl io::Write) -> io::Result<()> {
        compressed_bytes.write_all(bytes)
    }

    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()> {
        bytes.write_all(compressed_bytes)
    }
}
