//! Measurement oracles for leaf nodes

use std::fmt::Debug;

use crate::geometry::Size;

/// Content that can report how large it wants to be
pub trait Measure: Debug {
    /// Size based on the content alone, if the content has one
    fn intrinsic_size(&self) -> Option<Size> {
        None
    }

    /// Best size for the content inside `proposal`
    ///
    /// `current` is the node's frame size at the time of the query. The
    /// default keeps whatever size the node already has.
    fn size_that_fits(&self, _proposal: Size, current: Size) -> Size {
        current
    }
}

/// Plain container with no content of its own
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Measure for Container {}

/// Content with a fixed intrinsic size, such as an icon or a switch
#[derive(Debug, Clone, Copy)]
pub struct FixedContent(pub Size);

impl Measure for FixedContent {
    fn intrinsic_size(&self) -> Option<Size> {
        Some(self.0)
    }

    fn size_that_fits(&self, _proposal: Size, _current: Size) -> Size {
        self.0
    }
}

/// Content with no intrinsic size whose best fit is always the same size
#[derive(Debug, Clone, Copy)]
pub struct FittedContent(pub Size);

impl Measure for FittedContent {
    fn size_that_fits(&self, _proposal: Size, _current: Size) -> Size {
        self.0
    }
}

/// Text that wraps to the available width
#[derive(Debug, Clone, Copy)]
pub struct WrappingText {
    pub glyphs: usize,
    pub glyph_width: f64,
    pub line_height: f64,
}

impl WrappingText {
    pub fn new(glyphs: usize, glyph_width: f64, line_height: f64) -> Self {
        Self {
            glyphs,
            glyph_width,
            line_height,
        }
    }

    /// Width of the text laid out on a single line
    pub fn line_width(&self) -> f64 {
        self.glyphs as f64 * self.glyph_width
    }

    /// Number of lines needed at `width`
    pub fn lines_at(&self, width: f64) -> usize {
        if self.glyphs == 0 {
            return 0;
        }
        if width <= 0.0 || self.glyph_width <= 0.0 {
            return 1;
        }
        let per_line = ((width / self.glyph_width).floor() as usize).max(1);
        self.glyphs.div_ceil(per_line)
    }
}

impl Measure for WrappingText {
    fn size_that_fits(&self, proposal: Size, current: Size) -> Size {
        // Wrap at the node's own width when it has one
        let width = if current.width > 0.0 {
            current.width
        } else if proposal.width > 0.0 {
            proposal.width
        } else {
            self.line_width()
        };
        let lines = self.lines_at(width);
        Size::new(width.min(self.line_width()).max(0.0), lines as f64 * self.line_height)
    }
}
