// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Absolute stacking order.
//!
//! A region's local `z_index` may be relative to its parent. The absolute value is
//! the sum of local values from the region upward, stopping after the first region
//! that is not relative (or at a root, whose absolute value is its own local value).
//! Hit candidates are ranked by that sum, highest first.

use core::cmp::Reverse;

/// Stacking information for scene nodes of type `K`.
pub trait StackingLookup<K> {
    /// The node's local stacking value. Higher is on top.
    fn z_index(&self, node: &K) -> i32;
    /// Whether the node's stacking value adds to its parent's.
    fn z_as_relative(&self, node: &K) -> bool;
    /// The node's parent, or `None` for roots.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Compute the absolute stacking value of `node`.
///
/// Saturates instead of overflowing. A parent chain that loops back on itself
/// ends the walk once the loop is detected.
pub fn absolute_z_index<K, S>(scene: &S, node: K) -> i32
where
    K: Copy + PartialEq,
    S: StackingLookup<K> + ?Sized,
{
    let mut z = 0_i32;
    let mut current = node;
    // Brent's cycle detection: `anchor` jumps ahead at power-of-two steps.
    let mut anchor = node;
    let mut steps = 0_usize;
    let mut lap = 1_usize;
    loop {
        z = z.saturating_add(scene.z_index(&current));
        if !scene.z_as_relative(&current) {
            break;
        }
        let Some(parent) = scene.parent_of(&current) else {
            break;
        };
        if parent == anchor {
            break;
        }
        steps += 1;
        if steps == lap {
            anchor = parent;
            lap = lap.saturating_mul(2);
            steps = 0;
        }
        current = parent;
    }
    z
}

/// Sort `nodes` by descending absolute stacking value.
///
/// The sort is stable, so equal values keep the order the query produced.
pub fn rank_by_absolute_z<K, S>(scene: &S, nodes: &mut [K])
where
    K: Copy + PartialEq,
    S: StackingLookup<K> + ?Sized,
{
    nodes.sort_by_cached_key(|&n| Reverse(absolute_z_index(scene, n)));
}
