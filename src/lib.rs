//! Left/Right Layout - recursive height calculation for view trees
//!
//! This library provides a view tree with constraint-aware measurement, a
//! recursive height calculator driven by sizing options, and a two-pane
//! left/right composition built on top of it.
//!
//! # Example
//!
//! ```rust
//! use left_right_layout::geometry::{EdgeInsets, Frame, Size};
//! use left_right_layout::layout::{FittedContent, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let left = tree.leaf_with_frame(FittedContent(Size::new(80.0, 40.0)), Frame::new(0.0, 0.0, 80.0, 0.0));
//! let right = tree.leaf_with_frame(FittedContent(Size::new(60.0, 100.0)), Frame::new(0.0, 0.0, 60.0, 0.0));
//! let row = tree.left_right(EdgeInsets::zero(), Some(left), Some(right)).unwrap();
//! tree.set_width(row, 320.0);
//! tree.layout_if_needed(row);
//!
//! assert_eq!(tree.height(row), 100.0);
//! assert_eq!(tree.y(left), 30.0);
//! assert_eq!(tree.x(right), 260.0);
//! ```

pub mod geometry;
pub mod layout;
pub mod scene;

pub use geometry::{EdgeInsets, Frame, Point, Screen, ScreenMetrics, Size};
pub use layout::{LayoutConfig, LayoutError, NodeId, SizingOption, SizingOptions, ViewTree};
pub use scene::{Scene, SceneError};

/// Lay out a TOML scene and return its frame dump
///
/// The scene's own `[layout]` table configures the tree.
///
/// # Example
///
/// ```rust
/// use left_right_layout::layout_scene;
///
/// let dump = layout_scene(r#"
///     [root]
///     kind = "fixed"
///     name = "icon"
///     size = [24, 24]
/// "#).unwrap();
///
/// assert_eq!(dump, "icon: 0 0 24 24");
/// ```
pub fn layout_scene(source: &str) -> Result<String, SceneError> {
    let mut scene = Scene::from_str(source)?;
    scene.layout();
    Ok(scene.dump())
}

/// Lay out a TOML scene with an explicit configuration
///
/// `config` replaces the scene's `[layout]` table.
pub fn layout_scene_with_config(source: &str, config: LayoutConfig) -> Result<String, SceneError> {
    let mut scene = Scene::from_str_with_config(source, config)?;
    scene.layout();
    Ok(scene.dump())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_single_leaf() {
        let dump = layout_scene("[root]\nkind = \"container\"\nname = \"box\"\nframe = [1, 2, 3, 4]\n").unwrap();
        assert_eq!(dump, "box: 1 2 3 4");
    }

    #[test]
    fn test_unnamed_nodes_are_not_dumped() {
        let dump = layout_scene("[root]\nkind = \"container\"\n").unwrap();
        assert_eq!(dump, "");
    }

    #[test]
    fn test_layout_composition() {
        let dump = layout_scene(
            r#"
[root]
kind = "left_right"
name = "row"
frame = [0, 0, 200, 0]

[root.left]
kind = "fitted"
name = "l"
frame = [0, 0, 50, 0]
size = [50, 40]

[root.right]
kind = "fitted"
name = "r"
frame = [0, 0, 50, 0]
size = [50, 100]
"#,
        )
        .unwrap();
        assert_eq!(dump, "row: 0 0 200 100\n  l: 0 30 50 40\n  r: 150 0 50 100");
    }

    #[test]
    fn test_parse_error_surfaces() {
        let result = layout_scene("root = 3");
        assert!(matches!(result, Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_with_config_replaces_layout_table() {
        let source = r#"
[layout]
compressed_extent = { width = 0, height = 0 }

[root]
kind = "left_right"
name = "row"
frame = [0, 0, 100, 0]

[root.left]
kind = "text"
name = "t"
glyphs = 10
"#;
        // Without a width of its own the text wraps at the compressed extent
        assert_eq!(layout_scene(source).unwrap(), "row: 0 0 100 16\n  t: 0 0 0 16");

        let config = LayoutConfig::default().with_compressed_extent(Size::new(40.0, 0.0));
        assert_eq!(
            layout_scene_with_config(source, config).unwrap(),
            "row: 0 0 100 32\n  t: 0 0 0 32"
        );
    }
}
