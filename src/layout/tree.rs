//! Arena-owned view tree
//!
//! Nodes live in a [`ViewTree`] and are addressed by [`NodeId`]. A node owns
//! its frame and its ordered children; the parent link is a plain handle.
//! Handles are only meaningful for the tree that created them.

use std::fmt;

use crate::geometry::{EdgeInsets, Frame, Size};

use super::config::LayoutConfig;
use super::constraint::{Anchor, Attribute, Constraint, ConstraintId, Relation};
use super::error::LayoutError;
use super::left_right::LeftRight;
use super::measure::Measure;

/// Handle to a node stored in a [`ViewTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pending work a host view system should perform for a node
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dirty {
    pub needs_update_constraints: bool,
    pub needs_layout: bool,
    pub needs_display: bool,
}

impl Dirty {
    pub fn is_clean(&self) -> bool {
        !self.needs_update_constraints && !self.needs_layout && !self.needs_display
    }
}

/// What a node is, as far as measurement is concerned
#[derive(Debug)]
pub enum NodeKind {
    /// Ordinary node measured through its content
    Leaf(Box<dyn Measure>),
    /// Two-pane composition whose size derives from its panes
    LeftRight(LeftRight),
}

/// A node in the view tree
#[derive(Debug)]
pub struct ViewNode {
    pub(crate) frame: Frame,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) constraints: Vec<ConstraintId>,
    pub(crate) dirty: Dirty,
}

impl ViewNode {
    fn new(kind: NodeKind, frame: Frame) -> Self {
        Self {
            frame,
            kind,
            parent: None,
            children: Vec::new(),
            constraints: Vec::new(),
            dirty: Dirty::default(),
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn constraint_ids(&self) -> &[ConstraintId] {
        &self.constraints
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    pub fn is_left_right(&self) -> bool {
        matches!(self.kind, NodeKind::LeftRight(_))
    }
}

#[derive(Debug)]
struct ConstraintRecord {
    owner: NodeId,
    constraint: Constraint,
}

/// Owner of every node and constraint taking part in layout
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    constraints: Vec<ConstraintRecord>,
    config: LayoutConfig,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn insert(&mut self, kind: NodeKind, frame: Frame) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ViewNode::new(kind, frame));
        id
    }

    /// Add a parentless leaf sized to its intrinsic size, if it has one
    pub fn leaf(&mut self, content: impl Measure + 'static) -> NodeId {
        let size = content.intrinsic_size().unwrap_or_default();
        self.leaf_with_frame(content, Frame::from_parts(Default::default(), size))
    }

    /// Add a parentless leaf with an explicit frame
    pub fn leaf_with_frame(&mut self, content: impl Measure + 'static, frame: Frame) -> NodeId {
        self.insert(NodeKind::Leaf(Box::new(content)), frame)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Borrow a node
    ///
    /// Panics when `id` was not created by this tree.
    pub fn node(&self, id: NodeId) -> &ViewNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ViewNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&ViewNode> {
        self.nodes.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub(crate) fn check(&self, id: NodeId) -> Result<(), LayoutError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(LayoutError::UnknownNode(id))
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// True when `ancestor` is `id` or one of its superviews
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor(child, parent) {
            return Err(LayoutError::CycleDetected { parent, child });
        }
        self.remove_from_parent(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        self.set_needs_layout(parent);
        Ok(())
    }

    /// Detach a node from its superview, if it has one
    pub fn remove_from_parent(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != child);
            self.set_needs_layout(parent);
        }
    }

    /// Width of the superview, if the node has one
    pub fn superview_width(&self, id: NodeId) -> Option<f64> {
        self.parent(id).map(|parent| self.node(parent).frame.width())
    }

    pub fn frame(&self, id: NodeId) -> Frame {
        self.node(id).frame
    }

    /// Replace the frame, marking the node for layout and display on change
    pub fn set_frame(&mut self, id: NodeId, frame: Frame) {
        let node = self.node_mut(id);
        if node.frame != frame {
            node.frame = frame;
            node.dirty.needs_layout = true;
            node.dirty.needs_display = true;
        }
    }

    /// Write the frame without signalling anything
    pub(crate) fn frame_mut(&mut self, id: NodeId) -> &mut Frame {
        &mut self.node_mut(id).frame
    }

    pub fn x(&self, id: NodeId) -> f64 {
        self.frame(id).x()
    }

    pub fn y(&self, id: NodeId) -> f64 {
        self.frame(id).y()
    }

    pub fn width(&self, id: NodeId) -> f64 {
        self.frame(id).width()
    }

    pub fn height(&self, id: NodeId) -> f64 {
        self.frame(id).height()
    }

    pub fn xy(&self, id: NodeId) -> (f64, f64) {
        self.frame(id).xy()
    }

    pub fn wh(&self, id: NodeId) -> (f64, f64) {
        self.frame(id).wh()
    }

    pub fn xywh(&self, id: NodeId) -> (f64, f64, f64, f64) {
        self.frame(id).xywh()
    }

    pub fn set_x(&mut self, id: NodeId, x: f64) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(x, frame.y(), frame.width(), frame.height()));
    }

    pub fn set_y(&mut self, id: NodeId, y: f64) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(frame.x(), y, frame.width(), frame.height()));
    }

    pub fn set_width(&mut self, id: NodeId, width: f64) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(frame.x(), frame.y(), width, frame.height()));
    }

    pub fn set_height(&mut self, id: NodeId, height: f64) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(frame.x(), frame.y(), frame.width(), height));
    }

    pub fn set_xy(&mut self, id: NodeId, (x, y): (f64, f64)) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(x, y, frame.width(), frame.height()));
    }

    pub fn set_wh(&mut self, id: NodeId, (width, height): (f64, f64)) {
        let frame = self.frame(id);
        self.set_frame(id, Frame::new(frame.x(), frame.y(), width, height));
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) {
        self.set_wh(id, size.wh());
    }

    pub fn set_xywh(&mut self, id: NodeId, (x, y, width, height): (f64, f64, f64, f64)) {
        self.set_frame(id, Frame::new(x, y, width, height));
    }

    /// Offset the node's origin
    pub fn move_by(&mut self, id: NodeId, dx: f64, dy: f64) {
        let frame = self.frame(id).move_by(dx, dy);
        self.set_frame(id, frame);
    }

    /// Grow the node's size
    pub fn grow_by(&mut self, id: NodeId, dw: f64, dh: f64) {
        let frame = self.frame(id).grow_by(dw, dh);
        self.set_frame(id, frame);
    }

    /// Offset origin and size together
    pub fn translate(&mut self, id: NodeId, dx: f64, dy: f64, dw: f64, dh: f64) {
        let frame = self.frame(id).translate(dx, dy, dw, dh);
        self.set_frame(id, frame);
    }

    /// Whether the node reports an intrinsic content size
    pub fn has_intrinsic_size(&self, id: NodeId) -> bool {
        match &self.node(id).kind {
            NodeKind::Leaf(content) => content.intrinsic_size().is_some(),
            NodeKind::LeftRight(_) => true,
        }
    }

    /// The node's intrinsic content size, if it has one
    ///
    /// Compositions compute theirs from their panes, which may run the
    /// height calculator on them.
    pub fn intrinsic_content_size(&mut self, id: NodeId) -> Option<Size> {
        if self.node(id).is_left_right() {
            return Some(self.left_right_intrinsic_size(id));
        }
        match &self.node(id).kind {
            NodeKind::Leaf(content) => content.intrinsic_size(),
            NodeKind::LeftRight(_) => None,
        }
    }

    /// Best size for the node's content inside `proposal`
    pub fn size_that_fits(&mut self, id: NodeId, proposal: Size) -> Size {
        if self.node(id).is_left_right() {
            return self.left_right_intrinsic_size(id);
        }
        let current = self.frame(id).size;
        match &self.node(id).kind {
            NodeKind::Leaf(content) => content.size_that_fits(proposal, current),
            NodeKind::LeftRight(_) => current,
        }
    }

    /// Attach a constraint to `node`, active unless built with `inactive()`
    pub fn add_constraint(&mut self, node: NodeId, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        self.constraints.push(ConstraintRecord {
            owner: node,
            constraint,
        });
        self.node_mut(node).constraints.push(id);
        self.set_needs_update_constraints(node);
        id
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0].constraint
    }

    pub fn constraint_owner(&self, id: ConstraintId) -> NodeId {
        self.constraints[id.0].owner
    }

    /// Constraints attached to `node`, active or not
    pub fn constraints(&self, node: NodeId) -> &[ConstraintId] {
        &self.node(node).constraints
    }

    pub fn active_constraints(&self, node: NodeId) -> Vec<ConstraintId> {
        self.constraints(node)
            .iter()
            .copied()
            .filter(|&id| self.is_active(id))
            .collect()
    }

    pub fn is_active(&self, id: ConstraintId) -> bool {
        self.constraint(id).active
    }

    /// Activate a constraint; activating an active constraint does nothing
    pub fn activate(&mut self, id: ConstraintId) {
        if !self.is_active(id) {
            self.set_constraint_state(id, true);
            self.set_needs_update_constraints(self.constraint_owner(id));
        }
    }

    /// Deactivate a constraint; deactivating an inactive constraint does nothing
    pub fn deactivate(&mut self, id: ConstraintId) {
        if self.is_active(id) {
            self.set_constraint_state(id, false);
            self.set_needs_update_constraints(self.constraint_owner(id));
        }
    }

    pub(crate) fn set_constraint_state(&mut self, id: ConstraintId, active: bool) {
        self.constraints[id.0].constraint.active = active;
    }

    /// First `Equal` constraint on the given attribute of `node`
    pub fn constraint_for(&self, node: NodeId, attribute: Attribute) -> Option<ConstraintId> {
        self.constraints(node).iter().copied().find(|&id| {
            let constraint = self.constraint(id);
            constraint.attribute == attribute && constraint.relation == Relation::Equal
        })
    }

    pub fn x_constraint(&self, node: NodeId) -> Option<ConstraintId> {
        self.constraint_for(node, Attribute::Left)
    }

    pub fn y_constraint(&self, node: NodeId) -> Option<ConstraintId> {
        self.constraint_for(node, Attribute::Top)
    }

    pub fn width_constraint(&self, node: NodeId) -> Option<ConstraintId> {
        self.constraint_for(node, Attribute::Width)
    }

    pub fn height_constraint(&self, node: NodeId) -> Option<ConstraintId> {
        self.constraint_for(node, Attribute::Height)
    }

    /// Pin the four edges of `node` to `other`, offset by `insets`
    ///
    /// The node must already have a superview; otherwise nothing is added.
    pub fn constrain_to(&mut self, node: NodeId, other: NodeId, insets: EdgeInsets) -> Vec<ConstraintId> {
        if self.parent(node).is_none() {
            log::warn!("unable to apply constraints to {} when not in a view", node);
            return Vec::new();
        }
        let edges = [
            (Attribute::Top, insets.top),
            (Attribute::Left, insets.left),
            (Attribute::Right, -insets.right),
            (Attribute::Bottom, -insets.bottom),
        ];
        edges
            .into_iter()
            .map(|(attribute, offset)| {
                let constraint = Constraint {
                    anchor: Some(Anchor::Node(other, attribute)),
                    ..Constraint::fixed(attribute, offset)
                };
                self.add_constraint(node, constraint)
            })
            .collect()
    }

    pub fn dirty(&self, id: NodeId) -> Dirty {
        self.node(id).dirty
    }

    pub fn set_needs_update_constraints(&mut self, id: NodeId) {
        self.node_mut(id).dirty.needs_update_constraints = true;
    }

    pub fn set_needs_layout(&mut self, id: NodeId) {
        self.node_mut(id).dirty.needs_layout = true;
    }

    pub fn set_needs_display(&mut self, id: NodeId) {
        self.node_mut(id).dirty.needs_display = true;
    }

    /// Flag a node whose geometry was changed behind the host's back
    pub fn invalidate(&mut self, id: NodeId) {
        if !self.constraints(id).is_empty() {
            self.set_needs_update_constraints(id);
        }
        self.set_needs_layout(id);
        self.set_needs_display(id);
    }

    /// Drain every pending invalidation, clearing the flags
    pub fn take_invalidations(&mut self) -> Vec<(NodeId, Dirty)> {
        let mut pending = Vec::new();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if !node.dirty.is_clean() {
                pending.push((NodeId(index), std::mem::take(&mut node.dirty)));
            }
        }
        pending
    }

    /// Run `layout()` on every composition under `root` that needs layout
    ///
    /// Parents are laid out before their children.
    pub fn layout_if_needed(&mut self, root: NodeId) {
        if self.node(root).dirty.needs_layout {
            if self.node(root).is_left_right() {
                self.layout_left_right(root);
            }
            self.node_mut(root).dirty.needs_layout = false;
        }
        let children = self.children(root).to_vec();
        for child in children {
            self.layout_if_needed(child);
        }
    }
}
