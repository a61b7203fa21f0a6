// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_focus_router --heading-base-level=0

//! Understory Focus Router: pointer focus routing among overlapping regions.
//!
//! This crate decides which of many spatially arranged participants is *focused*
//! (accepts input) as the pointer moves, while letting nested sub-scenes manage their
//! own focus independently. It is built from:
//!
//! - **The focusable contract** ([`Focusable`]): focus, hold-focus, sole-focus and
//!   focus-lock state plus three change signals ([`FocusSignal`]). [`FocusState`] is a
//!   ready-made implementation to embed.
//! - **Routes** ([`Route`]): pairs of an *activator* region key and an *endpoint*
//!   focusable, owned by one router.
//! - **Routers** ([`FocusRouter`]): on every pointer motion, query the scene at the
//!   pointer, rank hits by absolute stacking order, focus the endpoint of the topmost
//!   routed region and unfocus the rest. A router is itself [`Focusable`], so routers
//!   nest: only the root needs raw input, and a parent silences an inactive child by
//!   unfocusing it.
//! - **Drag groups** ([`FocusableDragGroup`]): focusables that stay focused while a
//!   press on one of their [`DragHandle`]s lasts, even after the pointer leaves.
//! - **Dispatch** ([`FocusDispatcher`]): feeds pointer motion, presses, releases and
//!   ticks to routers and drag groups in the right order.
//!
//! The scene is a collaborator. Routers require [`SpatialQuery`] (point queries plus
//! [`StackingLookup`]); declared routes additionally require [`SceneGraph`] for path
//! lookup and an [`EndpointLookup`] from nodes to focusables.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_focus_router::{
//!     FocusRouter, FocusState, Focusable, SpatialQuery, StackingLookup,
//! };
//!
//! /// Two overlapping squares; square 1 stacks above square 0.
//! struct Squares;
//!
//! impl StackingLookup<u32> for Squares {
//!     fn z_index(&self, node: &u32) -> i32 { *node as i32 }
//!     fn z_as_relative(&self, _: &u32) -> bool { false }
//!     fn parent_of(&self, _: &u32) -> Option<u32> { None }
//! }
//!
//! impl SpatialQuery<u32> for Squares {
//!     type Mask = ();
//!     fn intersect_point(&self, p: Point, _: (), max: usize, out: &mut Vec<u32>) {
//!         if (0.0..10.0).contains(&p.x) { out.push(0); }
//!         if (5.0..15.0).contains(&p.x) { out.push(1); }
//!         out.truncate(max);
//!     }
//! }
//!
//! let router = FocusRouter::new(());
//! let back = Rc::new(FocusState::new());
//! let front = Rc::new(FocusState::new());
//! router.register_route(0, back.clone()).unwrap();
//! router.register_route(1, front.clone()).unwrap();
//!
//! // Over both: the higher square wins.
//! assert_eq!(router.on_pointer_motion(&Squares, Point::new(7.0, 0.0)), Some(1));
//! assert!(front.is_focused() && !back.is_focused());
//!
//! // A held endpoint keeps focus after the pointer leaves.
//! front.set_hold_focus(true);
//! router.on_pointer_motion(&Squares, Point::new(2.0, 0.0));
//! assert!(front.is_focused() && back.is_focused());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `region_tree_adapter`: enables [`adapters::region_tree`], implementing the scene
//!   traits for `understory_region_tree::Tree`.
//!
//! ## Logging
//!
//! Configuration warnings are logged with `tracing` at `warn`; focus transitions at
//! `debug` and `trace`. Install any subscriber to see them.
//!
//! This crate is `no_std` and uses `alloc`. Everything is single threaded: state lives
//! in `Cell`s behind `Rc`, and notifications run synchronously.

#![no_std]

extern crate alloc;

pub mod adapters;

mod dispatch;
mod drag;
mod error;
mod focusable;
mod route;
mod router;
mod scene;
mod signal;
mod stacking;

pub use dispatch::{FocusDispatcher, PointerButtons, PointerState};
pub use drag::{DragHandle, DragNodeKind, FocusableDragGroup};
pub use error::{ConfigWarning, DuplicateRouteError};
pub use focusable::{FocusState, Focusable};
pub use route::{Route, RouteDecl, RouteTable};
pub use router::{FocusRouter, RouterConfig};
pub use scene::{EndpointLookup, SceneGraph, SpatialQuery};
pub use signal::{FocusChange, FocusSignal, FocusSignals, ListenerId};
pub use stacking::{StackingLookup, absolute_z_index, rank_by_absolute_z};
