//! Positional field layouts for catalog partitions.
//!
//! Partitions exported for different venues do not agree on column order, so every
//! source carries the layout its lines are read with.

use crate::error::{Result, ScreenerError};
use serde::Deserialize;

/// Meaning of a single CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Title,
    Abstract,
    RatingSum,
    RatingCount,
    Arxiv,
    Openreview,
    /// Column present in the file but not used
    Skip,
}

/// Ordered column list describing one partition's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    columns: Vec<Column>,
    id_is_openreview: bool,
}

impl FieldLayout {
    /// Build a layout from an explicit column order.
    ///
    /// `id`, `title` and `abstract` are mandatory. When no `openreview` column is present
    /// the record id is used as the OpenReview forum id.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        for required in [Column::Id, Column::Title, Column::Abstract] {
            let occurrences = columns.iter().filter(|c| **c == required).count();
            if occurrences != 1 {
                return Err(ScreenerError::config(format!(
                    "layout must contain exactly one {:?} column, found {}",
                    required, occurrences
                )));
            }
        }
        let id_is_openreview = !columns.contains(&Column::Openreview);
        Ok(Self {
            columns,
            id_is_openreview,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn id_is_openreview(&self) -> bool {
        self.id_is_openreview
    }

    /// Position of `column` in a line, if the layout has it.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

impl Default for FieldLayout {
    /// `id, title, abstract, rating_sum, rating_count`
    fn default() -> Self {
        Self {
            columns: vec![
                Column::Id,
                Column::Title,
                Column::Abstract,
                Column::RatingSum,
                Column::RatingCount,
            ],
            id_is_openreview: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = FieldLayout::default();
        assert_eq!(layout.position(Column::Id), Some(0));
        assert_eq!(layout.position(Column::RatingCount), Some(4));
        assert_eq!(layout.position(Column::Arxiv), None);
        assert!(layout.id_is_openreview());
    }

    #[test]
    fn test_custom_layout_with_external_ids() {
        let layout = FieldLayout::new(vec![
            Column::Id,
            Column::Arxiv,
            Column::Openreview,
            Column::Title,
            Column::Abstract,
            Column::RatingSum,
            Column::RatingCount,
        ])
        .unwrap();
        assert_eq!(layout.position(Column::Title), Some(3));
        assert!(!layout.id_is_openreview());
    }

    #[test]
    fn test_layout_requires_mandatory_columns() {
        let missing_abstract = FieldLayout::new(vec![Column::Id, Column::Title]);
        assert!(matches!(
            missing_abstract,
            Err(ScreenerError::ConfigError { .. })
        ));

        let duplicate_title =
            FieldLayout::new(vec![Column::Id, Column::Title, Column::Title, Column::Abstract]);
        assert!(duplicate_title.is_err());
    }

    #[test]
    fn test_columns_deserialize_from_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            columns: Vec<Column>,
        }
        let parsed: Wrapper =
            toml::from_str(r#"columns = ["id", "skip", "title", "abstract", "rating_sum"]"#)
                .unwrap();
        assert_eq!(
            parsed.columns,
            vec![
                Column::Id,
                Column::Skip,
                Column::Title,
                Column::Abstract,
                Column::RatingSum
            ]
        );
    }
}
