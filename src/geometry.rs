//! Geometry primitives shared by the layout engine
//!
//! Frames are plain value types. Nothing in this module mutates a node; the
//! tree exposes mutating accessors built on top of these helpers.

use serde::Deserialize;

/// A 2D point in the coordinate system of a node's superview
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset the point by the given deltas
    pub fn move_by(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A width and height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// A size with both dimensions set to `value`
    pub fn splat(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Grow (or shrink, with negative deltas) each dimension
    pub fn grow_by(&self, dw: f64, dh: f64) -> Size {
        Size::new(self.width + dw, self.height + dh)
    }

    pub fn wh(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Keep the height, take the width of the screen
    pub fn apply_screen_width(&self, screen: &dyn ScreenMetrics) -> Size {
        Size::new(screen.width(), self.height)
    }

    /// Keep the width, take the height of the screen
    pub fn apply_screen_height(&self, screen: &dyn ScreenMetrics) -> Size {
        Size::new(self.width, screen.height())
    }

    /// Full screen width by the given height
    pub fn screen_width_by(height: f64, screen: &dyn ScreenMetrics) -> Size {
        Size::new(screen.width(), height)
    }

    /// Given width by the full screen height
    pub fn screen_height_by(width: f64, screen: &dyn ScreenMetrics) -> Size {
        Size::new(width, screen.height())
    }
}

/// Horizontal or vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Position and size of a node, relative to its superview
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub origin: Point,
    pub size: Size,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A zero-sized frame at the origin
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn xy(&self) -> (f64, f64) {
        self.origin.xy()
    }

    pub fn wh(&self) -> (f64, f64) {
        self.size.wh()
    }

    pub fn xywh(&self) -> (f64, f64, f64, f64) {
        (self.origin.x, self.origin.y, self.size.width, self.size.height)
    }

    /// Same frame at the local origin, as a node sees itself
    pub fn bounds(&self) -> Frame {
        Frame::from_parts(Point::default(), self.size)
    }

    /// Offset every component independently
    ///
    /// Negative deltas move the origin backwards or shrink the size.
    pub fn translate(&self, dx: f64, dy: f64, dw: f64, dh: f64) -> Frame {
        Frame::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width + dw,
            self.size.height + dh,
        )
    }

    /// Offset the origin, keeping the size
    pub fn move_by(&self, dx: f64, dy: f64) -> Frame {
        Frame::from_parts(self.origin.move_by(dx, dy), self.size)
    }

    /// Grow the size, keeping the origin
    pub fn grow_by(&self, dw: f64, dh: f64) -> Frame {
        Frame::from_parts(self.origin, self.size.grow_by(dw, dh))
    }

    /// Center the frame on one axis within `extent`, other axis unchanged
    pub fn center_within(&self, axis: Axis, extent: f64) -> Frame {
        match axis {
            Axis::Horizontal => Frame::new(
                extent / 2.0 - self.size.width / 2.0,
                self.origin.y,
                self.size.width,
                self.size.height,
            ),
            Axis::Vertical => Frame::new(
                self.origin.x,
                extent / 2.0 - self.size.height / 2.0,
                self.size.width,
                self.size.height,
            ),
        }
    }

    /// Center horizontally within `within`, or within the screen width
    pub fn center_width(&self, within: Option<f64>, screen: &dyn ScreenMetrics) -> Frame {
        self.center_within(Axis::Horizontal, within.unwrap_or_else(|| screen.width()))
    }

    /// Center vertically within `within`, or within the screen height
    pub fn center_height(&self, within: Option<f64>, screen: &dyn ScreenMetrics) -> Frame {
        self.center_within(Axis::Vertical, within.unwrap_or_else(|| screen.height()))
    }
}

/// Padding on each edge of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// The same inset on all four edges
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Source of screen dimensions for screen-relative helpers
pub trait ScreenMetrics {
    /// Bounds of the main screen
    fn bounds(&self) -> Frame;

    /// Insets of the key window's safe area
    fn safe_area(&self) -> EdgeInsets {
        EdgeInsets::zero()
    }

    fn width(&self) -> f64 {
        self.bounds().width()
    }

    fn height(&self) -> f64 {
        self.bounds().height()
    }

    fn top_safe_area(&self) -> f64 {
        self.safe_area().top
    }

    fn bottom_safe_area(&self) -> f64 {
        self.safe_area().bottom
    }
}

/// Fixed screen metrics, usually read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
    pub safe_area: EdgeInsets,
}

impl Screen {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            safe_area: EdgeInsets::zero(),
        }
    }

    pub fn with_safe_area(mut self, safe_area: EdgeInsets) -> Self {
        self.safe_area = safe_area;
        self
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(375.0, 812.0)
    }
}

impl ScreenMetrics for Screen {
    fn bounds(&self) -> Frame {
        Frame::new(0.0, 0.0, self.width, self.height)
    }

    fn safe_area(&self) -> EdgeInsets {
        self.safe_area
    }
}
