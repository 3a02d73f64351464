//! Recursive height calculation
//!
//! The calculator walks a [`ViewTree`] and decides, per node, which height
//! source wins: the measured height, the height already set on the frame,
//! or the sum of the node's children. Depending on the options it also
//! mutates geometry along the way (stacking, stretching, aligning) and
//! reports those mutations through the tree's dirty flags.

use crate::geometry::Size;

use super::constraint::SuspendedConstraints;
use super::options::{Alignment, SizingOption, SizingOptions, SizingPolicy};
use super::solver::fitting_height;
use super::tree::{NodeId, ViewTree};

impl ViewTree {
    /// Height of `node` under `options`, padded by `pad_start` and `pad_end`
    ///
    /// `pad_per_child` is only used when the options prefer the sum of the
    /// node's children.
    pub fn calculate_own_height(
        &mut self,
        node: NodeId,
        pad_start: f64,
        pad_end: f64,
        pad_per_child: f64,
        options: &SizingOptions,
    ) -> f64 {
        let policy = options.resolve();

        let mutated = self.apply_horizontal_mutation(node, &policy);

        let mut scope = SuspendedConstraints::enter(self, node, policy.suspend_constraints);

        let measured = scope.measure_height(node, policy.compressed_fit);
        let calculated = pad_start + measured + pad_end;
        let set_size = scope.height(node);

        let subview_sum = if policy.prefer_child_sum {
            let child_options = options.except([SizingOption::PreferChildSum]);
            Some(scope.calculate_subviews_height(node, 0.0, pad_per_child, 0.0, &child_options))
        } else {
            None
        };

        drop(scope);

        if mutated {
            self.invalidate(node);
        }

        let height = match (policy.prefer_explicit, subview_sum) {
            (true, Some(sum)) => policy.pick(&[set_size, calculated, sum]),
            (false, Some(sum)) => policy.pick(&[calculated, sum]),
            (true, None) => policy.pick(&[calculated, set_size]),
            (false, None) => calculated,
        };

        log::trace!(
            "own height of {}: measured={} set={} children={:?} -> {}",
            node,
            measured,
            set_size,
            subview_sum,
            height
        );

        height
    }

    /// Sum of the heights of `node`'s children, in order
    ///
    /// With `StackVertically`, each child's y is set to the running total
    /// before it is measured.
    pub fn calculate_subviews_height(
        &mut self,
        node: NodeId,
        pad_start: f64,
        pad_per_child: f64,
        pad_end: f64,
        options: &SizingOptions,
    ) -> f64 {
        let policy = options.resolve();
        let children = self.children(node).to_vec();

        let mut total = pad_start;
        for child in children {
            if policy.stack {
                self.frame_mut(child).origin.y = total;
            }
            if policy.include_y_offset {
                total += self.y(child);
            }
            total += self.calculate_own_height(child, pad_start, pad_end, pad_per_child, options);
            if policy.stack {
                self.invalidate(child);
            }
        }

        total + pad_end
    }

    /// Aggregate height of an arbitrary list of nodes
    ///
    /// `pad_per_child` only separates consecutive nodes; an empty list is
    /// `pad_start + pad_end`.
    pub fn calculate_height_of(
        &mut self,
        nodes: &[NodeId],
        pad_start: f64,
        pad_per_child: f64,
        pad_end: f64,
        options: &SizingOptions,
    ) -> f64 {
        let policy = options.resolve();

        let mut total = pad_start;
        for &node in nodes {
            if policy.stack {
                self.frame_mut(node).origin.y = total;
            }
            total += self.calculate_own_height(node, 0.0, 0.0, 0.0, options) + pad_per_child;
            if policy.stack {
                self.invalidate(node);
            }
        }
        if !nodes.is_empty() {
            total -= pad_per_child;
        }

        log::debug!("height of {} nodes: {}", nodes.len(), total + pad_end);

        total + pad_end
    }

    /// Apply width and x mutations requested by the policy
    ///
    /// Returns true when the policy asked for any mutation.
    fn apply_horizontal_mutation(&mut self, node: NodeId, policy: &SizingPolicy) -> bool {
        if let Some(width) = policy.width_override {
            self.frame_mut(node).size.width = width;
        }

        let node_width = self.width(node);
        match policy.alignment {
            Some(Alignment::Left) => self.frame_mut(node).origin.x = 0.0,
            Some(Alignment::Right(extent)) => self.frame_mut(node).origin.x = extent - node_width,
            Some(Alignment::Center(extent)) => {
                self.frame_mut(node).origin.x = extent / 2.0 - node_width / 2.0
            }
            None => {}
        }

        policy.mutates_geometry()
    }

    /// Height of a single node, without padding or preferences
    ///
    /// Nodes with an intrinsic size are trusted at their current height.
    /// Everything else is measured at zero height: first through the
    /// constraint solver, then, if the solver had no opinion, through the
    /// content's best fit for the compressed extent. The node's height is
    /// restored either way.
    fn measure_height(&mut self, node: NodeId, compressed: bool) -> f64 {
        if self.has_intrinsic_size(node) {
            return self.height(node);
        }

        let extent = self.config().fitting_extent(compressed);
        let compressed_extent = self.config().compressed_extent;
        let current_height = self.height(node);

        self.frame_mut(node).size.height = 0.0;
        let mut height = fitting_height(self, node, extent);
        if height == extent.height {
            height = self.size_that_fits(node, compressed_extent).height;
        }
        self.frame_mut(node).size.height = current_height;

        height
    }

    /// Current width by the height the active constraints settle on within `proposal`
    pub fn fitting_size(&mut self, node: NodeId, proposal: Size) -> Size {
        let width = self.width(node);
        Size::new(width, fitting_height(self, node, proposal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Frame;
    use crate::layout::constraint::{Attribute, Constraint};
    use crate::layout::measure::{Container, FittedContent, FixedContent};

    fn fitted(tree: &mut ViewTree, height: f64) -> NodeId {
        tree.leaf(FittedContent(Size::new(50.0, height)))
    }

    #[test]
    fn test_fitted_leaf_with_padding() {
        let mut tree = ViewTree::new();
        let node = fitted(&mut tree, 42.0);
        let height = tree.calculate_own_height(node, 3.0, 5.0, 0.0, &SizingOptions::defaults());
        assert_eq!(height, 50.0);
    }

    #[test]
    fn test_intrinsic_leaf_trusts_frame() {
        let mut tree = ViewTree::new();
        let node = tree.leaf(FixedContent(Size::new(20.0, 20.0)));
        tree.set_height(node, 33.0);
        let height = tree.calculate_own_height(node, 0.0, 0.0, 0.0, &SizingOptions::defaults());
        assert_eq!(height, 33.0);
    }

    #[test]
    fn test_measurement_restores_height() {
        let mut tree = ViewTree::new();
        let node = tree.leaf_with_frame(FittedContent(Size::new(10.0, 70.0)), Frame::new(0.0, 0.0, 10.0, 12.0));
        tree.calculate_own_height(node, 0.0, 0.0, 0.0, &SizingOptions::defaults());
        assert_eq!(tree.height(node), 12.0);
        assert!(tree.dirty(node).is_clean());
    }

    #[test]
    fn test_active_constraint_wins_without_suspension() {
        let mut tree = ViewTree::new();
        let node = fitted(&mut tree, 42.0);
        let id = tree.add_constraint(node, Constraint::fixed(Attribute::Height, 60.0));

        let unsuspended = tree.calculate_own_height(node, 0.0, 0.0, 0.0, &SizingOptions::default());
        assert!((unsuspended - 60.0).abs() < 0.001);

        let suspended = tree.calculate_own_height(node, 0.0, 0.0, 0.0, &SizingOptions::defaults());
        assert_eq!(suspended, 42.0);
        assert!(tree.is_active(id));
    }

    #[test]
    fn test_prefer_explicit_size() {
        let mut tree = ViewTree::new();
        let node = tree.leaf_with_frame(FittedContent(Size::new(10.0, 20.0)), Frame::new(0.0, 0.0, 10.0, 90.0));
        let options = SizingOptions::defaults().adding([SizingOption::PreferExplicitSize]);
        assert_eq!(tree.calculate_own_height(node, 0.0, 0.0, 0.0, &options), 90.0);

        let options = options.adding([SizingOption::UseMinimum]);
        assert_eq!(tree.calculate_own_height(node, 0.0, 0.0, 0.0, &options), 20.0);
    }

    #[test]
    fn test_prefer_child_sum_without_children() {
        let mut tree = ViewTree::new();
        let node = fitted(&mut tree, 15.0);
        let options = SizingOptions::subview_sums().adding([SizingOption::UseMinimum]);
        assert_eq!(tree.calculate_own_height(node, 0.0, 0.0, 4.0, &options), 0.0);
    }

    #[test]
    fn test_stretch_and_align_mutate_and_invalidate() {
        let mut tree = ViewTree::new();
        let node = tree.leaf_with_frame(FittedContent(Size::new(10.0, 20.0)), Frame::new(7.0, 0.0, 10.0, 0.0));

        let options = SizingOptions::new([SizingOption::StretchWidth(100.0), SizingOption::AlignRightIn(300.0)]);
        tree.calculate_own_height(node, 0.0, 0.0, 0.0, &options);
        assert_eq!(tree.xywh(node), (200.0, 0.0, 100.0, 0.0));
        assert!(tree.dirty(node).needs_layout);

        let options = SizingOptions::new([SizingOption::AlignCenterIn(300.0)]);
        tree.calculate_own_height(node, 0.0, 0.0, 0.0, &options);
        assert_eq!(tree.x(node), 100.0);
    }

    #[test]
    fn test_stacking_sets_origins() {
        let mut tree = ViewTree::new();
        let parent = tree.leaf(Container);
        for height in [10.0, 20.0, 30.0] {
            let child = fitted(&mut tree, height);
            tree.set_y(child, 500.0);
            tree.append_child(parent, child).unwrap();
        }

        let total = tree.calculate_subviews_height(parent, 0.0, 5.0, 0.0, &SizingOptions::stack_views());
        assert_eq!(total, 60.0);

        let ys: Vec<f64> = tree.children(parent).iter().map(|&c| tree.y(c)).collect();
        assert_eq!(ys, vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn test_child_padding_applies_to_each_child() {
        let mut tree = ViewTree::new();
        let parent = tree.leaf(Container);
        for height in [10.0, 20.0] {
            let child = fitted(&mut tree, height);
            tree.append_child(parent, child).unwrap();
        }

        // Each child is padded by pad_start and pad_end, the total once more
        let total = tree.calculate_subviews_height(parent, 1.0, 0.0, 2.0, &SizingOptions::stack_views());
        assert_eq!(total, 1.0 + 13.0 + 23.0 + 2.0);
        assert_eq!(tree.y(tree.children(parent)[1]), 14.0);
    }

    #[test]
    fn test_include_y_offset() {
        let mut tree = ViewTree::new();
        let parent = tree.leaf(Container);
        let child = fitted(&mut tree, 10.0);
        tree.set_y(child, 8.0);
        tree.append_child(parent, child).unwrap();

        let total = tree.calculate_subviews_height(parent, 0.0, 0.0, 0.0, &SizingOptions::subview_sums_with_y());
        assert_eq!(total, 18.0);
    }

    #[test]
    fn test_height_of_empty_list() {
        let mut tree = ViewTree::new();
        let height = tree.calculate_height_of(&[], 4.0, 10.0, 6.0, &SizingOptions::defaults());
        assert_eq!(height, 10.0);
    }

    #[test]
    fn test_height_of_pads_between_items_only() {
        let mut tree = ViewTree::new();
        let a = fitted(&mut tree, 10.0);
        let b = fitted(&mut tree, 20.0);
        let height = tree.calculate_height_of(&[a, b], 1.0, 5.0, 2.0, &SizingOptions::stack_views());
        assert_eq!(height, 38.0);
        assert_eq!(tree.y(a), 1.0);
        assert_eq!(tree.y(b), 16.0);
    }

    #[test]
    fn test_fitting_size_reports_solver_height() {
        let mut tree = ViewTree::new();
        let node = tree.leaf_with_frame(Container, Frame::new(0.0, 0.0, 40.0, 0.0));
        tree.add_constraint(node, Constraint::aspect_ratio(2.0));
        let size = tree.fitting_size(node, Size::zero());
        assert_eq!(size.width, 40.0);
        assert!((size.height - 80.0).abs() < 0.001);
    }
}
