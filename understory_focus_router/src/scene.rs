// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts the router requires from the host scene.
//!
//! The router does not implement spatial queries or own the scene graph. Hosts
//! implement these traits over whatever structure they use; the
//! `region_tree_adapter` feature provides them for `understory_region_tree::Tree`.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;
use kurbo::Point;

use crate::focusable::Focusable;
use crate::stacking::StackingLookup;

/// Point queries over interactive regions.
pub trait SpatialQuery<K>: StackingLookup<K> {
    /// Region filter passed through from the router's configuration.
    type Mask: Copy;

    /// Append to `out` every region overlapping `point` that matches `mask`,
    /// stopping after `max_results` regions.
    ///
    /// Order is unspecified beyond being deterministic; the router ranks results
    /// by absolute stacking order and keeps this order for ties.
    fn intersect_point(&self, point: Point, mask: Self::Mask, max_results: usize, out: &mut Vec<K>);
}

/// Path lookup and child traversal over the scene graph.
pub trait SceneGraph<K> {
    /// Resolve `path` relative to `origin`.
    fn resolve_path(&self, origin: K, path: &str) -> Option<K>;
    /// The direct children of `node`, in scene order.
    fn children_of(&self, node: K) -> Vec<K>;
}

/// Resolve scene nodes to focusable participants.
///
/// Returning `None` means the node exists but does not implement [`Focusable`].
pub trait EndpointLookup<K> {
    /// The focusable behind `node`, if any.
    fn focusable(&self, node: &K) -> Option<Rc<dyn Focusable>>;
}

impl<K, S> EndpointLookup<K> for HashMap<K, Rc<dyn Focusable>, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn focusable(&self, node: &K) -> Option<Rc<dyn Focusable>> {
        self.get(node).cloned()
    }
}
