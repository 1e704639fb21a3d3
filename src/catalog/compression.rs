//! Compression format detection and transparent decompression for partitions.
//!
//! Bundled catalogs are often shipped as `iclr2026.csv.gz`; detection uses magic numbers
//! first and falls back to the file extension.

use crate::error::{Result, ScreenerError};
use async_compression::tokio::bufread::{BzDecoder, GzipDecoder, XzDecoder, ZstdDecoder};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// Supported compression formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl CompressionType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Detect the compression format of raw partition bytes.
///
/// # Magic Numbers Used
/// - Gzip: `1f 8b`
/// - Bzip2: `42 5a 68` ("BZh")
/// - XZ: `fd 37 7a 58 5a 00`
/// - Zstd: `28 b5 2f fd`
pub fn detect_compression(path: &Path, head: &[u8]) -> CompressionType {
    detect_by_magic(head)
        .or_else(|| detect_by_extension(path))
        .unwrap_or(CompressionType::None)
}

fn detect_by_magic(magic: &[u8]) -> Option<CompressionType> {
    if magic.starts_with(&[0x1f, 0x8b]) {
        Some(CompressionType::Gzip)
    } else if magic.starts_with(&[0x42, 0x5a, 0x68]) {
        Some(CompressionType::Bzip2)
    } else if magic.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
        Some(CompressionType::Zstd)
    } else if magic.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
        Some(CompressionType::Xz)
    } else {
        None
    }
}

fn detect_by_extension(path: &Path) -> Option<CompressionType> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "gz" => Some(CompressionType::Gzip),
        "bz2" => Some(CompressionType::Bzip2),
        "xz" => Some(CompressionType::Xz),
        "zst" | "zstd" => Some(CompressionType::Zstd),
        _ => None,
    }
}

/// Decompress `bytes` according to `compression`; uncompressed input is returned as is.
pub async fn decompress(bytes: Vec<u8>, compression: CompressionType) -> Result<Vec<u8>> {
    let reader = BufReader::new(std::io::Cursor::new(bytes));
    match compression {
        CompressionType::None => Ok(reader.into_inner().into_inner()),
        CompressionType::Gzip => read_all(GzipDecoder::new(reader), compression).await,
        CompressionType::Bzip2 => read_all(BzDecoder::new(reader), compression).await,
        CompressionType::Xz => read_all(XzDecoder::new(reader), compression).await,
        CompressionType::Zstd => read_all(ZstdDecoder::new(reader), compression).await,
    }
}

async fn read_all<R: AsyncRead + Unpin>(
    mut decoder: R,
    compression: CompressionType,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decoder.read_to_end(&mut output).await.map_err(|e| {
        ScreenerError::decompression(format!("{} stream: {}", compression.name(), e))
    })?;
    Ok(output)
}
