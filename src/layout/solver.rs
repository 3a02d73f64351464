//! Constraint-aware fitting measurement
//!
//! This module wraps the kasuari Cassowary solver. A fitting measurement
//! builds a small system for a single node: its frame components are
//! suggested at their current values, its height is suggested at the fitting
//! extent with weak strength, and its active constraints are required. When
//! nothing pins the height, the solved height is the extent itself.

use kasuari::{Expression, Solver as KasuariSolver, Strength, Variable, WeightedRelation::*};
use thiserror::Error;

use crate::geometry::{Frame, Size};

use super::constraint::{Anchor, Attribute, Constraint, Relation};
use super::tree::{NodeId, ViewTree};

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint {constraint}: {reason}")]
    Unsatisfiable { constraint: String, reason: String },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Variables for the frame of the node being measured
struct FrameVariables {
    x: Variable,
    y: Variable,
    width: Variable,
    height: Variable,
}

impl FrameVariables {
    fn new() -> Self {
        Self {
            x: Variable::new(),
            y: Variable::new(),
            width: Variable::new(),
            height: Variable::new(),
        }
    }

    fn expression(&self, attribute: Attribute) -> Expression {
        match attribute {
            Attribute::Left => self.x.into(),
            Attribute::Top => self.y.into(),
            Attribute::Width => self.width.into(),
            Attribute::Height => self.height.into(),
            Attribute::Right => self.x + self.width,
            Attribute::Bottom => self.y + self.height,
            Attribute::CenterX => self.x + self.width * 0.5,
            Attribute::CenterY => self.y + self.height * 0.5,
        }
    }
}

/// Value of an attribute of a frame that is not being solved for
fn attribute_value(frame: Frame, attribute: Attribute) -> f64 {
    match attribute {
        Attribute::Left => frame.x(),
        Attribute::Top => frame.y(),
        Attribute::Width => frame.width(),
        Attribute::Height => frame.height(),
        Attribute::Right => frame.right(),
        Attribute::Bottom => frame.bottom(),
        Attribute::CenterX => frame.x() + frame.width() / 2.0,
        Attribute::CenterY => frame.y() + frame.height() / 2.0,
    }
}

/// Solver for the height of a single node
pub struct FittingSolver {
    solver: KasuariSolver,
    vars: FrameVariables,
}

impl FittingSolver {
    /// Anchor the node at `frame` and suggest `extent_height` for its height
    pub fn new(frame: Frame, extent_height: f64) -> Result<Self, SolverError> {
        let mut fitting = Self {
            solver: KasuariSolver::new(),
            vars: FrameVariables::new(),
        };
        let suggestions = [
            (fitting.vars.x, frame.x(), Strength::STRONG),
            (fitting.vars.y, frame.y(), Strength::STRONG),
            (fitting.vars.width, frame.width(), Strength::STRONG),
            (fitting.vars.height, extent_height, Strength::WEAK),
        ];
        for (var, value, strength) in suggestions {
            fitting
                .solver
                .add_edit_variable(var, strength)
                .map_err(|e| SolverError::Internal(format!("Failed to add edit variable: {}", e)))?;
            fitting
                .solver
                .suggest_value(var, value)
                .map_err(|e| SolverError::Internal(format!("Failed to suggest value: {}", e)))?;
        }
        Ok(fitting)
    }

    /// Add a required constraint
    ///
    /// `anchor_frame` is the frame of the anchored node, in the measured
    /// node's coordinate space, for constraints anchored to another node.
    pub fn add(&mut self, constraint: &Constraint, anchor_frame: Option<Frame>) -> Result<(), SolverError> {
        let lhs = self.vars.expression(constraint.attribute);
        let kasuari_constraint = match (constraint.anchor, anchor_frame) {
            (Some(Anchor::Own(attribute)), _) => {
                let rhs = constraint.multiplier * self.vars.expression(attribute) + constraint.constant;
                match constraint.relation {
                    Relation::Equal => lhs | EQ(Strength::REQUIRED) | rhs,
                    Relation::GreaterOrEqual => lhs | GE(Strength::REQUIRED) | rhs,
                    Relation::LessOrEqual => lhs | LE(Strength::REQUIRED) | rhs,
                }
            }
            (anchor, frame) => {
                let rhs = match (anchor, frame) {
                    (Some(Anchor::Node(_, attribute)), Some(frame)) => {
                        constraint.multiplier * attribute_value(frame, attribute) + constraint.constant
                    }
                    _ => constraint.constant,
                };
                match constraint.relation {
                    Relation::Equal => lhs | EQ(Strength::REQUIRED) | rhs,
                    Relation::GreaterOrEqual => lhs | GE(Strength::REQUIRED) | rhs,
                    Relation::LessOrEqual => lhs | LE(Strength::REQUIRED) | rhs,
                }
            }
        };

        self.solver.add_constraint(kasuari_constraint).map_err(|e| match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                constraint: constraint.describe(),
                reason: "conflicts with existing constraints".to_string(),
            },
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("Duplicate constraint: {}", constraint.describe()))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => SolverError::Internal(format!(
                "Internal solver error for {}: {}",
                constraint.describe(),
                msg
            )),
        })
    }

    /// Solve and return the node's height
    pub fn height(&mut self) -> f64 {
        let height = self.vars.height;
        self.solver
            .fetch_changes()
            .iter()
            .find(|(var, _)| *var == height)
            .map(|(_, value)| *value)
            .unwrap_or(0.0)
    }
}

/// Height of `node` under its active constraints when offered `extent`
///
/// Constraints that conflict with ones already added are dropped with a
/// warning. Returns `extent.height` when no active constraint determines
/// the height.
pub fn fitting_height(tree: &ViewTree, node: NodeId, extent: Size) -> f64 {
    let active = tree.active_constraints(node);
    if active.is_empty() {
        return extent.height;
    }

    let mut solver = match FittingSolver::new(tree.frame(node), extent.height) {
        Ok(solver) => solver,
        Err(e) => {
            log::warn!("fitting {} failed: {}", node, e);
            return extent.height;
        }
    };

    let parent = tree.parent(node);
    for id in active {
        let constraint = tree.constraint(id);
        let anchor_frame = match constraint.anchor {
            // The superview is seen through its bounds
            Some(Anchor::Node(other, _)) if Some(other) == parent => Some(tree.frame(other).bounds()),
            Some(Anchor::Node(other, _)) if tree.contains(other) => Some(tree.frame(other)),
            _ => None,
        };
        if let Err(e) = solver.add(constraint, anchor_frame) {
            log::warn!("dropping constraint on {} while fitting: {}", node, e);
        }
    }

    solver.height()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeInsets;
    use crate::layout::measure::Container;

    const EXTENT: f64 = 10_000.0;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_unconstrained_returns_extent() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        assert_eq!(fitting_height(&tree, node, Size::splat(EXTENT)), EXTENT);
    }

    #[test]
    fn test_fixed_height() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        tree.add_constraint(node, Constraint::fixed(Attribute::Height, 44.0));
        assert!(approx(fitting_height(&tree, node, Size::splat(EXTENT)), 44.0));
    }

    #[test]
    fn test_inactive_constraints_ignored() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        tree.add_constraint(node, Constraint::fixed(Attribute::Height, 44.0).inactive());
        assert_eq!(fitting_height(&tree, node, Size::splat(EXTENT)), EXTENT);
    }

    #[test]
    fn test_upper_bound_against_expanded_extent() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        tree.add_constraint(node, Constraint::at_most(Attribute::Height, 120.0));
        assert!(approx(fitting_height(&tree, node, Size::splat(EXTENT)), 120.0));
    }

    #[test]
    fn test_aspect_ratio_uses_current_width() {
        let mut tree = ViewTree::new();
        let node = tree.leaf_with_frame(Container, Frame::new(0.0, 0.0, 200.0, 0.0));
        tree.add_constraint(node, Constraint::aspect_ratio(0.5));
        assert!(approx(fitting_height(&tree, node, Size::zero()), 100.0));
    }

    #[test]
    fn test_pinned_to_superview() {
        let mut tree = ViewTree::new();
        let parent = tree.leaf_with_frame(Container, Frame::new(50.0, 50.0, 300.0, 90.0));
        let node = tree.leaf_with_frame(Container, Frame::new(5.0, 5.0, 290.0, 0.0));
        tree.append_child(parent, node).unwrap();
        tree.constrain_to(node, parent, EdgeInsets::uniform(5.0));
        assert!(approx(fitting_height(&tree, node, Size::zero()), 80.0));
    }

    #[test]
    fn test_conflicting_constraint_dropped() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(Container);
        tree.add_constraint(node, Constraint::fixed(Attribute::Height, 30.0));
        tree.add_constraint(node, Constraint::fixed(Attribute::Height, 60.0));
        assert!(approx(fitting_height(&tree, node, Size::splat(EXTENT)), 30.0));
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::Unsatisfiable {
            constraint: "Height = 60".to_string(),
            reason: "conflicts with existing constraints".to_string(),
        };
        assert!(err.to_string().contains("Height = 60"));
    }
}
