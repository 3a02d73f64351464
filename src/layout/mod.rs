//! Layout engine for measuring and placing view trees
//!
//! This module owns the view tree, the sizing options that drive the
//! recursive height calculator, and the left/right composition built on top
//! of it.

pub mod calculator;
pub mod config;
pub mod constraint;
pub mod error;
pub mod left_right;
pub mod measure;
pub mod options;
pub mod solver;
pub mod tree;

pub use config::LayoutConfig;
pub use constraint::{Anchor, Attribute, Constraint, ConstraintId, Relation, SuspendedConstraints};
pub use error::LayoutError;
pub use left_right::LeftRight;
pub use measure::{Container, FittedContent, FixedContent, Measure, WrappingText};
pub use options::{Alignment, SizingOption, SizingOptions, SizingPolicy};
pub use solver::{fitting_height, SolverError};
pub use tree::{Dirty, NodeId, NodeKind, ViewNode, ViewTree};
