// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_region_tree --heading-base-level=0

//! Understory Region Tree: a Kurbo-native tree of named, layered regions.
//!
//! The region tree is the scene-side collaborator for pointer focus routing.
//! It answers three kinds of questions:
//!
//! - **Where**: which regions contain a world-space point, filtered by collision
//!   [`Layers`] and [`NodeFlags`] ([`Tree::containing_point`]).
//! - **Above what**: each region carries a local `z_index` and may mark it as relative
//!   to its parent ([`NodeFlags::Z_AS_RELATIVE`]), so callers can compute an
//!   absolute stacking order by walking [`Tree::parent_of`].
//! - **Which one**: regions have names, and [`Tree::resolve_path`] looks them up by
//!   `/`-separated paths relative to an origin region (with `.` and `..`), the way
//!   declarative configuration refers to nodes.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Upstream code computes positions and sizes and
//! writes them as local bounds and transforms; [`Tree::commit`] then recomputes world
//! transforms. Queries scan live regions linearly, which is appropriate for the handful
//! to few hundred interactive regions of a typical scene.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing regions.
//! - [`LocalRegion`]: per-region local data (name, bounds, transform, z, flags, layers).
//! - [`NodeId`]: generational handle of a region.
//! - [`QueryFilter`]: restricts query results by required flags.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{QueryFilter, Tree};
pub use types::{Layers, LocalRegion, NodeFlags, NodeId};
