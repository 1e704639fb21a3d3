//! Catalog source abstraction.
//!
//! A source is one data partition (typically one conference-year). Sources are fetched
//! independently so that a broken partition never blocks the rest of the catalog.

use crate::catalog::compression::{decompress, detect_compression};
use crate::catalog::layout::FieldLayout;
use crate::catalog::parser::parse_partition;
use crate::catalog::record::{ConferenceId, PaperRecord};
use crate::catalog::validation::validate_source_path;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One partition of the catalog.
///
/// Implementations must be `Send + Sync` so that partitions can be fetched
/// concurrently from the loader.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Partition identifier every record of this source is tagged with
    fn conference(&self) -> &ConferenceId;

    /// Column layout of the partition's lines
    fn layout(&self) -> &FieldLayout;

    /// Short description for logs and load reports
    fn describe(&self) -> String;

    /// Fetch the raw partition text
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Fetch and parse the partition
    async fn load(&self) -> Result<Vec<PaperRecord>> {
        let bytes = self.fetch().await?;
        Ok(parse_partition(&bytes, self.conference(), self.layout()))
    }
}

/// Partition stored in a local, possibly compressed, file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    conference: ConferenceId,
    layout: FieldLayout,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, conference: ConferenceId, layout: FieldLayout) -> Self {
        Self {
            path: path.into(),
            conference,
            layout,
        }
    }

    /// Source whose conference is inferred from the file name (`iclr2026.csv.gz` gives
    /// `iclr2026`), read with the default layout.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let conference = conference_from_path(&path);
        Self::new(path, conference, FieldLayout::default())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn conference(&self) -> &ConferenceId {
        &self.conference
    }

    fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.conference, self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        validate_source_path(&self.path).await?;
        let bytes = tokio::fs::read(&self.path).await?;
        let compression = detect_compression(&self.path, &bytes[..bytes.len().min(8)]);
        if compression.is_compressed() {
            log::debug!(
                "decompressing {} partition {}",
                compression.name(),
                self.path.display()
            );
        }
        decompress(bytes, compression).await
    }
}

/// Conference identifier derived from the file name up to its first dot.
pub fn conference_from_path(path: &Path) -> ConferenceId {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>");
    let stem = name.split('.').next().unwrap_or(name);
    ConferenceId::new(stem)
}
