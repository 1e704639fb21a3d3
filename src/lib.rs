//! # paperscreen - Terminal Paper Catalog Screener
//!
//! Browse, search and filter catalogs of academic-conference papers loaded from CSV
//! partitions, with incremental search, match highlighting and paged results.
//!
//! ## Features
//!
//! - **Concurrent loading**: every partition loads in parallel and joins the catalog as
//!   soon as it is parsed
//! - **Compression Support**: Transparent handling of gzip, bzip2, xz and zstd partitions
//! - **Incremental search**: case-insensitive substring search over titles and abstracts
//! - **Conference filter**: restrict results to any set of conferences
//! - **Paged results**: the list grows one page at a time as you scroll
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - TOML configuration
//! - [`catalog`] - Partition parsing, loading and the shared record store
//! - [`search`] - Filtering, pagination, highlighting and the catalog worker
//! - [`input`] - Terminal input handling
//! - [`render`] - Render coordination, typesetting and the terminal UI
//! - [`app`] - Application core and component coordination

// Core modules
pub mod config;
pub mod error;

// Data and query engine
pub mod catalog;
pub mod search;

// Terminal front end
pub mod app;
pub mod input;
pub mod render;

// Re-export commonly used types for convenience
pub use error::{Result, ScreenerError};

// Public API surface for external usage
pub use app::Application;
pub use catalog::{load_catalog, CatalogSource, FileSource, PaperRecord, RecordStore};
pub use search::{filter, highlight, FilterState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
