// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries, and path lookup.

use alloc::{vec, vec::Vec};
use kurbo::{Affine, Point, Rect};

use crate::types::{Layers, LocalRegion, NodeFlags, NodeId};

/// Tree of regions.
///
/// Changes to local region data (bounds, transform) do **not** take effect
/// for point queries until [`Tree::commit`] recomputes world transforms.
/// Structural data (parents, names, z-index, flags, layers) is live.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_region_tree::{Layers, LocalRegion, QueryFilter, Tree};
///
/// let mut tree = Tree::new();
/// let table = tree.insert(None, LocalRegion::named("table", Rect::new(0.0, 0.0, 100.0, 100.0)));
/// let card = tree.insert(Some(table), LocalRegion::named("card", Rect::new(10.0, 10.0, 30.0, 40.0)));
/// tree.commit();
///
/// let hits: Vec<_> = tree
///     .containing_point(Point::new(20.0, 20.0), Layers::all(), QueryFilter::new().pickable())
///     .collect();
/// assert_eq!(hits, vec![table, card]);
/// assert_eq!(tree.resolve_path(Some(table), "card"), Some(card));
/// ```
#[derive(Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

/// Filters applied during point queries.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required region flags. Only regions containing all these flags are included.
    pub required_flags: NodeFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: NodeFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all regions).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only visible regions.
    pub fn visible(mut self) -> Self {
        self.required_flags |= NodeFlags::VISIBLE;
        self
    }

    /// Filter to only pickable regions.
    pub fn pickable(mut self) -> Self {
        self.required_flags |= NodeFlags::PICKABLE;
        self
    }

    /// Check if a region's flags satisfy this filter.
    pub fn matches(&self, flags: NodeFlags) -> bool {
        flags.contains(self.required_flags)
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalRegion,
    world_transform: Affine,
    world_bounds: Rect,
    dirty: bool,
}

impl Node {
    fn new(generation: u32, local: LocalRegion) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world_transform: Affine::IDENTITY,
            world_bounds: Rect::ZERO,
            dirty: true,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new region as a child of `parent` (or as a root if `None`).
    ///
    /// World-space data is only updated on the next call to [`Tree::commit`].
    /// A stale `parent` inserts the region as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalRegion) -> NodeId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.generations[idx] = self.generations[idx].saturating_add(1);
                self.nodes[idx] = Some(Node::new(self.generations[idx], local));
                idx
            }
            None => {
                self.nodes.push(Some(Node::new(1, local)));
                self.generations.push(1);
                self.nodes.len() - 1
            }
        };
        let id = id_at(idx, self.generations[idx]);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a region and its subtree. Stale ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Reparent `id` under `new_parent` (or make it a root).
    ///
    /// Moving a region under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) || new_parent.is_some_and(|p| self.is_ancestor_or_self(id, p)) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        self.node_mut(id).dirty = true;
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.local_transform != tf
        {
            n.local.local_transform = tf;
            n.dirty = true;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.local_bounds != bounds
        {
            n.local.local_bounds = bounds;
            n.dirty = true;
        }
    }

    /// Update z index. Takes effect immediately.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update region flags. Takes effect immediately.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Update collision layers. Takes effect immediately.
    pub fn set_layers(&mut self, id: NodeId, layers: Layers) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.layers = layers;
        }
    }

    /// Recompute world transforms and bounds for every region.
    ///
    /// Returns the number of regions whose world data changed because they, or
    /// an ancestor, were modified since the previous commit.
    pub fn commit(&mut self) -> usize {
        let mut updated = 0;
        let mut stack: Vec<(NodeId, Affine, bool)> =
            self.roots().map(|r| (r, Affine::IDENTITY, false)).collect();
        while let Some((id, parent_tf, parent_dirty)) = stack.pop() {
            let node = self.node_mut(id);
            let dirty = node.dirty || parent_dirty;
            if dirty {
                node.world_transform = parent_tf * node.local.local_transform;
                node.world_bounds = node.world_transform.transform_rect_bbox(node.local.local_bounds);
                node.dirty = false;
                updated += 1;
            }
            for &child in node.children.iter().rev() {
                stack.push((child, node.world_transform, dirty));
            }
        }
        updated
    }

    /// Iterate live regions whose transformed local bounds contain a world-space point.
    ///
    /// Regions must satisfy the [`QueryFilter`] and share at least one layer with
    /// `layers`. Results come in slot order; no z-sorting is applied.
    pub fn containing_point(
        &self,
        point: Point,
        layers: Layers,
        filter: QueryFilter,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(move |(i, slot)| {
            let node = slot.as_ref()?;
            if !filter.matches(node.local.flags) || !node.local.layers.intersects(layers) {
                return None;
            }
            if !node.world_bounds.contains(point) {
                return None;
            }
            let local_point = node.world_transform.inverse() * point;
            if !node.local.local_bounds.contains(local_point) {
                return None;
            }
            Some(id_at(i, node.generation))
        })
    }

    /// Resolve a `/`-separated path of region names.
    ///
    /// Relative paths start at `origin`; `.` names the current region and `..`
    /// its parent. A leading `/` starts from the root whose name matches the
    /// first segment. Returns `None` when any segment fails to resolve.
    pub fn resolve_path(&self, origin: Option<NodeId>, path: &str) -> Option<NodeId> {
        let (mut current, rest) = if let Some(absolute) = path.strip_prefix('/') {
            let mut segments = absolute.split('/').filter(|s| !s.is_empty());
            let root_name = segments.next()?;
            let root = self.roots().find(|&r| self.node(r).local.name == root_name)?;
            (root, segments.collect::<Vec<_>>())
        } else {
            let origin = origin.filter(|&o| self.is_alive(o))?;
            (origin, path.split('/').filter(|s| !s.is_empty()).collect())
        };

        for segment in rest {
            current = match segment {
                "." => current,
                ".." => self.parent_of(current)?,
                name => self
                    .children_of(current)
                    .iter()
                    .copied()
                    .find(|&c| self.node(c).local.name == name)?,
            };
        }
        Some(current)
    }

    fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, slot)| {
            let node = slot.as_ref()?;
            node.parent.is_none().then(|| id_at(i, node.generation))
        })
    }
}

impl Tree {
    /// Returns true if `id` refers to a live region.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the z-index of a region if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.local.z_index)
    }

    /// Returns whether a live region's z-index is relative to its parent.
    pub fn z_as_relative(&self, id: NodeId) -> Option<bool> {
        self.node_opt(id)
            .map(|n| n.local.flags.contains(NodeFlags::Z_AS_RELATIVE))
    }

    /// Returns the parent of a region if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns the flags of a region if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Returns the layers of a region if the identifier is live.
    pub fn layers(&self, id: NodeId) -> Option<Layers> {
        self.node_opt(id).map(|n| n.local.layers)
    }

    /// Returns the name of a region if the identifier is live.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| n.local.name.as_str())
    }

    /// Get the children of a region, or an empty slice if the region is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// World transform for a live region as of the last [`Tree::commit`].
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world_transform)
    }

    /// World-space AABB for a live region as of the last [`Tree::commit`].
    ///
    /// Loose under rotation or shear.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world_bounds)
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Callers check liveness first.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

fn id_at(idx: usize, generation: u32) -> NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    let idx = idx as u32;
    NodeId::new(idx, generation)
}
