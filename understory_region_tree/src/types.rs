// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the region tree: identifiers, flags, layers, and local geometry.

use alloc::string::String;
use kurbo::{Affine, Rect};

/// Identifier for a region in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Region flags controlling visibility, picking, and stacking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Region is visible.
        const VISIBLE       = 0b0000_0001;
        /// Region participates in point queries.
        const PICKABLE      = 0b0000_0010;
        /// The region's `z_index` is relative to its parent's absolute z-index.
        const Z_AS_RELATIVE = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE | Self::Z_AS_RELATIVE
    }
}

bitflags::bitflags! {
    /// Collision layers a region lives on; queries pass a mask of layers to match.
    ///
    /// Any of the 32 bits may be used; only the first layer is named.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// The first layer, used by [`LocalRegion::default`].
        const LAYER_1 = 1;
        const _ = !0;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::LAYER_1
    }
}

/// Local data for a region.
#[derive(Clone, Debug)]
pub struct LocalRegion {
    /// Name used by [`Tree::resolve_path`](crate::Tree::resolve_path). May be empty.
    pub name: String,
    /// Local (untransformed) bounds.
    pub local_bounds: Rect,
    /// Local transform relative to the parent region.
    pub local_transform: Affine,
    /// Stacking value. Higher is on top. See [`NodeFlags::Z_AS_RELATIVE`].
    pub z_index: i32,
    /// Visibility, picking and stacking flags.
    pub flags: NodeFlags,
    /// Layers this region lives on.
    pub layers: Layers,
}

impl Default for LocalRegion {
    fn default() -> Self {
        Self {
            name: String::new(),
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            z_index: 0,
            flags: NodeFlags::default(),
            layers: Layers::default(),
        }
    }
}

impl LocalRegion {
    /// A region with the given name and local bounds, default everything else.
    pub fn named(name: impl Into<String>, local_bounds: Rect) -> Self {
        Self {
            name: name.into(),
            local_bounds,
            ..Self::default()
        }
    }
}
