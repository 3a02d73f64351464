//! Layout constraints and scoped suspension
//!
//! A constraint relates one attribute of its owning node to a constant, to
//! another attribute of the same node, or to an attribute of another node:
//!
//! `owner.attribute RELATION multiplier * anchor + constant`
//!
//! Constraints only take part in fitting measurements while active.

use std::ops::{Deref, DerefMut};

use serde::Deserialize;

use super::tree::{NodeId, ViewTree};

/// Handle to a constraint stored in a [`ViewTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

/// Properties that can be constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    Width,
    Height,
    /// Left + Width / 2
    CenterX,
    /// Top + Height / 2
    CenterY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[default]
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

/// Right-hand side attribute of a relative constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Another attribute of the owning node
    Own(Attribute),
    /// An attribute of another node
    Node(NodeId, Attribute),
}

/// A relation between an attribute of a node and a constant or anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub attribute: Attribute,
    pub relation: Relation,
    pub anchor: Option<Anchor>,
    pub multiplier: f64,
    pub constant: f64,
    pub active: bool,
}

impl Constraint {
    fn new(attribute: Attribute, relation: Relation, anchor: Option<Anchor>, constant: f64) -> Self {
        Self {
            attribute,
            relation,
            anchor,
            multiplier: 1.0,
            constant,
            active: true,
        }
    }

    /// attribute = value
    pub fn fixed(attribute: Attribute, value: f64) -> Self {
        Self::new(attribute, Relation::Equal, None, value)
    }

    /// attribute >= value
    pub fn at_least(attribute: Attribute, value: f64) -> Self {
        Self::new(attribute, Relation::GreaterOrEqual, None, value)
    }

    /// attribute <= value
    pub fn at_most(attribute: Attribute, value: f64) -> Self {
        Self::new(attribute, Relation::LessOrEqual, None, value)
    }

    /// attribute = other.other_attribute
    pub fn equal_to(attribute: Attribute, other: NodeId, other_attribute: Attribute) -> Self {
        Self::new(attribute, Relation::Equal, Some(Anchor::Node(other, other_attribute)), 0.0)
    }

    /// height = width * ratio
    pub fn aspect_ratio(ratio: f64) -> Self {
        Self::new(Attribute::Height, Relation::Equal, Some(Anchor::Own(Attribute::Width)), 0.0)
            .multiplied_by(ratio)
    }

    pub fn offset(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn multiplied_by(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Create the constraint without activating it
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Human readable form used in log messages and errors
    pub fn describe(&self) -> String {
        let relation = match self.relation {
            Relation::Equal => "=",
            Relation::GreaterOrEqual => ">=",
            Relation::LessOrEqual => "<=",
        };
        let rhs = match self.anchor {
            None => format!("{}", self.constant),
            Some(anchor) => {
                let anchor = match anchor {
                    Anchor::Own(attribute) => format!("self.{:?}", attribute),
                    Anchor::Node(node, attribute) => format!("{}.{:?}", node, attribute),
                };
                let scaled = if self.multiplier == 1.0 {
                    anchor
                } else {
                    format!("{} * {}", self.multiplier, anchor)
                };
                if self.constant == 0.0 {
                    scaled
                } else {
                    format!("{} + {}", scaled, self.constant)
                }
            }
        };
        format!("{:?} {} {}", self.attribute, relation, rhs)
    }
}

/// Active constraints of one node, deactivated for the lifetime of the scope
///
/// Exactly the constraints that were active on entry are reactivated when
/// the scope is dropped, including during unwinding. Constraints added while
/// the scope is open are left alone.
pub struct SuspendedConstraints<'a> {
    tree: &'a mut ViewTree,
    suspended: Vec<ConstraintId>,
}

impl<'a> SuspendedConstraints<'a> {
    /// Suspend the active constraints of `node` when `suspend` is set
    pub fn enter(tree: &'a mut ViewTree, node: NodeId, suspend: bool) -> Self {
        let suspended = if suspend {
            tree.active_constraints(node)
        } else {
            Vec::new()
        };
        for &id in &suspended {
            tree.set_constraint_state(id, false);
        }
        Self { tree, suspended }
    }

    pub fn suspended(&self) -> &[ConstraintId] {
        &self.suspended
    }
}

impl Deref for SuspendedConstraints<'_> {
    type Target = ViewTree;

    fn deref(&self) -> &ViewTree {
        self.tree
    }
}

impl DerefMut for SuspendedConstraints<'_> {
    fn deref_mut(&mut self) -> &mut ViewTree {
        self.tree
    }
}

impl Drop for SuspendedConstraints<'_> {
    fn drop(&mut self) {
        for &id in &self.suspended {
            self.tree.set_constraint_state(id, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::geometry::Size;
    use crate::layout::measure::{Container, Measure};
    use crate::layout::options::SizingOptions;

    #[test]
    fn test_describe_fixed() {
        assert_eq!(Constraint::fixed(Attribute::Height, 44.0).describe(), "Height = 44");
        assert_eq!(Constraint::at_least(Attribute::Width, 10.0).describe(), "Width >= 10");
    }

    #[test]
    fn test_describe_aspect_ratio() {
        assert_eq!(Constraint::aspect_ratio(0.5).describe(), "Height = 0.5 * self.Width");
    }

    #[test]
    fn test_suspension_restores_exact_subset() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        let a = tree.add_constraint(node, Constraint::fixed(Attribute::Height, 10.0));
        let b = tree.add_constraint(node, Constraint::at_least(Attribute::Width, 5.0).inactive());

        {
            let mut scope = SuspendedConstraints::enter(&mut tree, node, true);
            assert_eq!(scope.suspended(), &[a]);
            assert!(!scope.is_active(a));
            // Added during the window, must not be touched on exit
            let late = scope.add_constraint(node, Constraint::fixed(Attribute::Width, 1.0).inactive());
            assert!(!scope.is_active(late));
        }

        assert!(tree.is_active(a));
        assert!(!tree.is_active(b));
        assert_eq!(tree.active_constraints(node), vec![a]);
    }

    #[test]
    fn test_no_suspension_when_not_requested() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        let a = tree.add_constraint(node, Constraint::fixed(Attribute::Height, 10.0));
        let scope = SuspendedConstraints::enter(&mut tree, node, false);
        assert!(scope.suspended().is_empty());
        assert!(scope.is_active(a));
    }

    #[derive(Debug)]
    struct Exploding;

    impl Measure for Exploding {
        fn size_that_fits(&self, _proposal: Size, _current: Size) -> Size {
            panic!("measurement failed");
        }
    }

    #[test]
    fn test_constraints_restored_when_measurement_panics() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Exploding);
        let id = tree.add_constraint(node, Constraint::fixed(Attribute::Height, 10.0));

        let result = catch_unwind(AssertUnwindSafe(|| {
            tree.calculate_own_height(node, 0.0, 0.0, 0.0, &SizingOptions::defaults())
        }));

        assert!(result.is_err());
        assert!(tree.is_active(id));
        assert_eq!(tree.active_constraints(node), vec![id]);
    }
}
