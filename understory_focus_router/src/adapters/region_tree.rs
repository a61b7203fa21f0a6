// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene traits for Understory Region Tree.
//!
//! ## Feature
//!
//! Enable with `region_tree_adapter`.
//!
//! ## Notes
//!
//! - Point queries only return regions that are both visible and pickable and share
//!   a layer with the router's mask.
//! - Query results are in slot order; the router applies stacking order itself.
//! - Stale ids stack at zero as roots and have no children.
//! - Geometry is read as of the last [`Tree::commit`]; commit before polling.

use alloc::vec::Vec;

use kurbo::Point;
use understory_region_tree::{Layers, NodeId, QueryFilter, Tree};

use crate::scene::{SceneGraph, SpatialQuery};
use crate::stacking::StackingLookup;

impl StackingLookup<NodeId> for Tree {
    fn z_index(&self, node: &NodeId) -> i32 {
        Self::z_index(self, *node).unwrap_or(0)
    }

    fn z_as_relative(&self, node: &NodeId) -> bool {
        Self::z_as_relative(self, *node).unwrap_or(false)
    }

    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}

impl SpatialQuery<NodeId> for Tree {
    type Mask = Layers;

    fn intersect_point(&self, point: Point, mask: Layers, max_results: usize, out: &mut Vec<NodeId>) {
        let filter = QueryFilter::new().visible().pickable();
        out.extend(self.containing_point(point, mask, filter).take(max_results));
    }
}

impl SceneGraph<NodeId> for Tree {
    fn resolve_path(&self, origin: NodeId, path: &str) -> Option<NodeId> {
        Self::resolve_path(self, Some(origin), path)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        Self::children_of(self, node).to_vec()
    }
}
