//! Configuration for the layout engine

use serde::Deserialize;

use crate::geometry::{Screen, Size};

/// Configuration options for height calculation and layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Smallest extent offered to a fitting measurement
    pub compressed_extent: Size,

    /// Largest extent offered to a fitting measurement
    pub expanded_extent: Size,

    /// Screen used by screen-relative helpers
    pub screen: Screen,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compressed_extent: Size::zero(),
            expanded_extent: Size::splat(10_000_000.0),
            screen: Screen::default(),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compressed fitting extent
    pub fn with_compressed_extent(mut self, extent: Size) -> Self {
        self.compressed_extent = extent;
        self
    }

    /// Set the expanded fitting extent
    pub fn with_expanded_extent(mut self, extent: Size) -> Self {
        self.expanded_extent = extent;
        self
    }

    /// Set the screen metrics
    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    /// Extent used for a fitting measurement
    pub fn fitting_extent(&self, compressed: bool) -> Size {
        if compressed {
            self.compressed_extent
        } else {
            self.expanded_extent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.compressed_extent, Size::zero());
        assert_eq!(config.expanded_extent, Size::splat(10_000_000.0));
        assert_eq!(config.screen, Screen::new(375.0, 812.0));
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_expanded_extent(Size::splat(1000.0))
            .with_screen(Screen::new(320.0, 568.0));

        assert_eq!(config.fitting_extent(false), Size::splat(1000.0));
        assert_eq!(config.fitting_extent(true), Size::zero());
        assert_eq!(config.screen.width, 320.0);
    }

    #[test]
    fn test_partial_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [screen]
            width = 414.0
            "#,
        )
        .unwrap();
        assert_eq!(config.screen.width, 414.0);
        assert_eq!(config.screen.height, 812.0);
        assert_eq!(config.expanded_extent, Size::splat(10_000_000.0));
    }
}
