//! Two-pane left/right composition
//!
//! A composition places an optional left pane against its leading edge and
//! an optional right pane against its trailing edge. The shorter pane is
//! centered vertically against the taller one. The composition's own height
//! is the taller pane's measured height, padded by the top and bottom insets.

use crate::geometry::{Axis, EdgeInsets, Frame, Size};

use super::error::LayoutError;
use super::options::SizingOptions;
use super::tree::{NodeId, NodeKind, ViewTree};

/// State of a left/right composition node
///
/// The panes are handles to nodes owned elsewhere in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeftRight {
    insets: EdgeInsets,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl LeftRight {
    pub fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl ViewTree {
    /// Create a composition from two optional panes
    ///
    /// Panes without a superview become subviews of the composition. The new
    /// node starts at its intrinsic size.
    pub fn left_right(
        &mut self,
        insets: EdgeInsets,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> Result<NodeId, LayoutError> {
        for pane in left.iter().chain(right.iter()) {
            if !self.contains(*pane) {
                return Err(LayoutError::UnknownNode(*pane));
            }
        }

        let node = self.insert(
            NodeKind::LeftRight(LeftRight {
                insets,
                left,
                right,
            }),
            Frame::zero(),
        );
        for pane in left.into_iter().chain(right) {
            if self.parent(pane).is_none() {
                self.append_child(node, pane)?;
            }
        }

        let size = self.left_right_intrinsic_size(node);
        self.frame_mut(node).size = size;
        self.mark_composition_dirty(node);
        Ok(node)
    }

    /// Composition state of `node`, if it is one
    pub fn as_left_right(&self, node: NodeId) -> Option<&LeftRight> {
        match self.get(node).map(|n| &n.kind) {
            Some(NodeKind::LeftRight(state)) => Some(state),
            _ => None,
        }
    }

    fn left_right_mut(&mut self, node: NodeId) -> Result<&mut LeftRight, LayoutError> {
        if !self.contains(node) {
            return Err(LayoutError::UnknownNode(node));
        }
        match &mut self.node_mut(node).kind {
            NodeKind::LeftRight(state) => Ok(state),
            NodeKind::Leaf(_) => Err(LayoutError::NotAComposition(node)),
        }
    }

    pub fn set_insets(&mut self, node: NodeId, insets: EdgeInsets) -> Result<(), LayoutError> {
        self.left_right_mut(node)?.insets = insets;
        self.mark_composition_dirty(node);
        Ok(())
    }

    /// Replace the left pane
    ///
    /// A pane without a superview becomes a subview of the composition. The
    /// previous pane keeps its place in the hierarchy.
    pub fn set_left(&mut self, node: NodeId, pane: Option<NodeId>) -> Result<(), LayoutError> {
        self.set_pane(node, pane, Side::Left)
    }

    /// Replace the right pane, adopting it like [`ViewTree::set_left`]
    pub fn set_right(&mut self, node: NodeId, pane: Option<NodeId>) -> Result<(), LayoutError> {
        self.set_pane(node, pane, Side::Right)
    }

    fn set_pane(&mut self, node: NodeId, pane: Option<NodeId>, side: Side) -> Result<(), LayoutError> {
        self.left_right_mut(node)?;
        if let Some(pane) = pane {
            self.check(pane)?;
            if self.pane_reaches(pane, node) {
                return Err(LayoutError::CycleDetected {
                    parent: node,
                    child: pane,
                });
            }
            if self.parent(pane).is_none() {
                self.append_child(node, pane)?;
            }
        }

        let state = self.left_right_mut(node)?;
        match side {
            Side::Left => state.left = pane,
            Side::Right => state.right = pane,
        }
        self.mark_composition_dirty(node);
        Ok(())
    }

    /// True when `target` is `pane` or a pane of a composition nested in it
    fn pane_reaches(&self, pane: NodeId, target: NodeId) -> bool {
        if pane == target {
            return true;
        }
        match self.as_left_right(pane) {
            Some(state) => state
                .left
                .into_iter()
                .chain(state.right)
                .any(|nested| self.pane_reaches(nested, target)),
            None => false,
        }
    }

    fn mark_composition_dirty(&mut self, node: NodeId) {
        self.set_needs_update_constraints(node);
        self.set_needs_layout(node);
        self.set_needs_display(node);
    }

    /// Height a pane contributes to its composition's intrinsic size
    ///
    /// Nested compositions report their own intrinsic height, so their
    /// insets are not applied twice.
    fn pane_intrinsic_height(&mut self, pane: NodeId, insets: EdgeInsets) -> f64 {
        if self.node(pane).is_left_right() {
            self.left_right_intrinsic_size(pane).height
        } else {
            self.calculate_own_height(pane, insets.top, insets.bottom, 0.0, &SizingOptions::subview_sums())
        }
    }

    /// Current width by the taller pane's padded height
    pub fn left_right_intrinsic_size(&mut self, node: NodeId) -> Size {
        let Some(state) = self.as_left_right(node).copied() else {
            return self.frame(node).size;
        };

        let l = match state.left {
            Some(pane) => self.pane_intrinsic_height(pane, state.insets),
            None => 0.0,
        };
        let r = match state.right {
            Some(pane) => self.pane_intrinsic_height(pane, state.insets),
            None => 0.0,
        };

        Size::new(self.width(node), l.max(r))
    }

    /// Size the composition and place its panes
    ///
    /// Each pane gets its freshly calculated height, sits against its edge
    /// of the composition and is centered vertically; a pane taller than the
    /// composition is pinned to the top.
    pub fn layout_left_right(&mut self, node: NodeId) {
        let Some(state) = self.as_left_right(node).copied() else {
            return;
        };

        let size = self.left_right_intrinsic_size(node);
        self.set_size(node, size);

        if let Some(pane) = state.left {
            self.place_pane(node, pane, Side::Left, state.insets, size.height);
        }
        if let Some(pane) = state.right {
            self.place_pane(node, pane, Side::Right, state.insets, size.height);
        }

        log::debug!(
            "laid out {}: size={:?} left={:?} right={:?}",
            node,
            size,
            state.left.map(|p| self.frame(p)),
            state.right.map(|p| self.frame(p))
        );
    }

    fn place_pane(&mut self, node: NodeId, pane: NodeId, side: Side, insets: EdgeInsets, height: f64) {
        let pane_height = self.calculate_own_height(pane, 0.0, 0.0, 0.0, &SizingOptions::subview_sums());

        let mut frame = self.frame(pane);
        frame.origin.x = match side {
            Side::Left => insets.left,
            Side::Right => self.width(node) - insets.right - frame.width(),
        };
        frame.size.height = pane_height;
        frame = frame.center_within(Axis::Vertical, height);
        frame.origin.y = frame.origin.y.max(0.0);

        self.set_frame(pane, frame);
    }
}
