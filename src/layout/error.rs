//! Error types for the layout engine

use thiserror::Error;

use super::solver::SolverError;
use super::tree::NodeId;

/// Errors from structural changes to a view tree
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Handle that does not belong to the tree
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Left/right operation on a node that is not a composition
    #[error("node {0} is not a left/right composition")]
    NotAComposition(NodeId),

    /// Change that would make a node its own ancestor
    #[error("adding {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    /// Constraint solver error
    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl LayoutError {
    /// The node the error is about
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::UnknownNode(node) | Self::NotAComposition(node) => Some(*node),
            Self::CycleDetected { child, .. } => Some(*child),
            Self::Solver(_) => None,
        }
    }
}
