// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the router stays lightweight and
//! `no_std` by default.
//!
//! ## Available Adapters
//!
//! - [`region_tree`] (`region_tree_adapter` feature): implements the scene traits for
//!   [`understory_region_tree::Tree`], keyed by its `NodeId` and masked by its collision
//!   `Layers`.

#[cfg(feature = "region_tree_adapter")]
pub mod region_tree;
