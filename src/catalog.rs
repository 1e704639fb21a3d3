//! Paper catalog: record model, partition parsing, sources and the shared store.
//!
//! Partitions are fetched through the [`CatalogSource`] trait, parsed positionally with a
//! [`FieldLayout`] and appended to the [`RecordStore`], which keeps the whole catalog
//! sorted by rating.

pub mod compression;
pub mod layout;
pub mod loader;
pub mod parser;
pub mod record;
pub mod source;
pub mod store;
pub mod validation;

pub use layout::{Column, FieldLayout};
pub use loader::{load_catalog, LoadStatus, SourceOutcome};
pub use parser::parse_partition;
pub use record::{ConferenceId, ExternalIds, PaperRecord};
pub use source::{CatalogSource, FileSource};
pub use store::{CatalogSnapshot, RecordStore};
