//! Layout settings (layout.json).
//!
//! JSON shape, every field optional:
//! {
//!   "bounding_box": { "x1": 0, "y1": 0, "width": 1000, "height": 600 },
//!   "avoid_overlap": true,
//!   "avoid_overlap_padding": 10,
//!   "condense": false,
//!   "node_width": 60,
//!   "node_height": 30
//! }
//!
//! Rows and columns are not configurable here: the timeline derives them
//! from the graph.

use crate::layout::{BoundingBox, GridOptions, Size};
use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub bounding_box: BoundingBox,
    pub avoid_overlap: bool,
    pub avoid_overlap_padding: f64,
    pub condense: bool,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let grid = GridOptions::default();
        Self {
            bounding_box: grid.bounding_box,
            avoid_overlap: grid.avoid_overlap,
            avoid_overlap_padding: grid.avoid_overlap_padding,
            condense: grid.condense,
            node_width: 60.0,
            node_height: 30.0,
        }
    }
}

/// Checked settings, ready for the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLayout {
    pub grid: GridOptions,
    pub node_size: Size,
}

impl LayoutConfig {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read layout config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parse layout config {}", path.display()))
    }

    pub fn validate_and_build(&self) -> anyhow::Result<ValidatedLayout> {
        let bb = &self.bounding_box;
        for (name, value) in [("x1", bb.x1), ("y1", bb.y1)] {
            if !value.is_finite() {
                bail!("bounding_box.{name} must be finite, got {value}");
            }
        }
        for (name, value) in [
            ("bounding_box.width", bb.width),
            ("bounding_box.height", bb.height),
            ("avoid_overlap_padding", self.avoid_overlap_padding),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{name} must be a non-negative number, got {value}");
            }
        }

        Ok(ValidatedLayout {
            grid: GridOptions {
                bounding_box: self.bounding_box,
                rows: None,
                cols: None,
                avoid_overlap: self.avoid_overlap,
                avoid_overlap_padding: self.avoid_overlap_padding,
                condense: self.condense,
            },
            node_size: Size {
                width: self.node_width,
                height: self.node_height,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn empty_object_takes_defaults() {
        let config: LayoutConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, LayoutConfig::default());

        let built = config.validate_and_build().expect("valid");
        assert_eq!(built.grid, GridOptions::default());
        assert_eq!(
            built.node_size,
            Size {
                width: 60.0,
                height: 30.0
            }
        );
    }

    #[test]
    fn partial_override() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{ "bounding_box": { "x1": 5, "y1": 0, "width": 200, "height": 100 }, "condense": true }"#,
        )
        .expect("parse");
        let built = config.validate_and_build().expect("valid");
        assert_eq!(built.grid.bounding_box, BoundingBox::new(5.0, 0.0, 200.0, 100.0));
        assert!(built.grid.condense);
        assert!(built.grid.avoid_overlap);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<LayoutConfig>(r#"{ "rows": 3 }"#).is_err());
    }

    #[rstest]
    #[case::width(r#"{ "bounding_box": { "x1": 0, "y1": 0, "width": -1, "height": 10 } }"#, "bounding_box.width")]
    #[case::height(r#"{ "bounding_box": { "x1": 0, "y1": 0, "width": 1, "height": -10 } }"#, "bounding_box.height")]
    #[case::padding(r#"{ "avoid_overlap_padding": -2 }"#, "avoid_overlap_padding")]
    #[case::node(r#"{ "node_width": -60 }"#, "node_width")]
    fn negative_extents_fail(#[case] json: &str, #[case] field: &str) {
        let config: LayoutConfig = serde_json::from_str(json).expect("parse");
        let err = config.validate_and_build().expect_err("should fail");
        assert!(err.to_string().starts_with(field), "{err}");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = LayoutConfig::from_path("/nonexistent/layout.json").expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/layout.json"));
    }
}
