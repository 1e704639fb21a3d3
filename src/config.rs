//! Configuration file support.
//!
//! The configuration lives in a TOML file, either given explicitly or found at
//! `<config_dir>/paperscreen/config.toml`. Every field is optional:
//!
//! ```toml
//! page_size = 100
//! math_rendering = true
//! theme = "high_contrast"
//!
//! [[sources]]
//! path = "data/iclr2026.csv"
//!
//! [[sources]]
//! path = "data/iclr2024.csv.gz"
//! conference = "iclr2024"
//! columns = ["id", "arxiv", "title", "abstract", "rating_sum", "rating_count"]
//! ```

use crate::catalog::source::conference_from_path;
use crate::catalog::{CatalogSource, Column, ConferenceId, FieldLayout, FileSource};
use crate::error::{Result, ScreenerError};
use crate::search::PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of a bundled color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

/// One catalog partition entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub columns: Option<Vec<Column>>,
}

impl SourceConfig {
    /// Entry for a bare path, with the conference inferred from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conference: None,
            columns: None,
        }
    }

    /// Parse a command-line source, `PATH[=CONFERENCE]`.
    pub fn from_arg(arg: &str) -> Self {
        match arg.rsplit_once('=') {
            Some((path, conference))
                if !path.is_empty()
                    && !conference.is_empty()
                    && !conference.contains(|c: char| c == '/' || c == '\\') =>
            {
                Self {
                    conference: Some(conference.to_string()),
                    ..Self::from_path(path)
                }
            }
            _ => Self::from_path(arg),
        }
    }

    pub fn conference(&self) -> ConferenceId {
        match &self.conference {
            Some(id) => ConferenceId::new(id.clone()),
            None => conference_from_path(&self.path),
        }
    }

    pub fn layout(&self) -> Result<FieldLayout> {
        match &self.columns {
            Some(columns) => FieldLayout::new(columns.clone()),
            None => Ok(FieldLayout::default()),
        }
    }

    pub fn to_source(&self) -> Result<FileSource> {
        Ok(FileSource::new(
            self.path.clone(),
            self.conference(),
            self.layout()?,
        ))
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenerConfig {
    pub page_size: usize,
    pub math_rendering: bool,
    pub theme: ThemeName,
    pub sources: Vec<SourceConfig>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            math_rendering: true,
            theme: ThemeName::Default,
            sources: Vec::new(),
        }
    }
}

impl ScreenerConfig {
    /// Default configuration file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paperscreen").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used when
    /// present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            ScreenerError::file_error(format!("Cannot read config {}", path.display()), e)
        })?;
        log::info!("using configuration {}", path.display());
        Self::from_toml(&text, path.parent())
    }

    /// Parse TOML text; relative source paths are resolved against `base_dir`.
    pub fn from_toml(text: &str, base_dir: Option<&Path>) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if let Some(base) = base_dir {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ScreenerError::config("page_size must be positive"));
        }
        for source in &self.sources {
            source.layout()?;
        }
        Ok(())
    }

    /// Conferences in declaration order, without duplicates.
    pub fn conferences(&self) -> Vec<ConferenceId> {
        let mut conferences: Vec<ConferenceId> = Vec::new();
        for source in &self.sources {
            let id = source.conference();
            if !conferences.contains(&id) {
                conferences.push(id);
            }
        }
        conferences
    }

    pub fn build_sources(&self) -> Result<Vec<Arc<dyn CatalogSource>>> {
        self.sources
            .iter()
            .map(|source| Ok(Arc::new(source.to_source()?) as Arc<dyn CatalogSource>))
            .collect()
    }
}
