// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors and configuration warnings.

use alloc::string::String;
use core::fmt;

/// Error returned when a router already has a route for an activator.
///
/// The registry is left exactly as it was before the failed call.
#[derive(Clone, PartialEq, Eq)]
pub struct DuplicateRouteError<K> {
    /// The activator that is already routed.
    pub activator: K,
}

impl<K: fmt::Debug> fmt::Debug for DuplicateRouteError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DuplicateRouteError {{ activator: {:?} }}", self.activator)
    }
}

impl<K: fmt::Debug> fmt::Display for DuplicateRouteError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "activator {:?} already has a route; registering it again would make an endpoint unreachable",
            self.activator
        )
    }
}

impl<K: fmt::Debug> core::error::Error for DuplicateRouteError<K> {}

/// A non-fatal configuration problem.
///
/// Warnings are returned to the caller and logged with `tracing`; every other
/// correctly configured participant keeps working.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A declared activator path did not resolve to a scene node.
    ActivatorNotFound {
        /// The declared path.
        path: String,
    },
    /// A declared endpoint path did not resolve to a scene node.
    EndpointNotFound {
        /// The declared path.
        path: String,
    },
    /// A declared endpoint resolved to a node that does not implement [`Focusable`](crate::Focusable).
    EndpointNotFocusable {
        /// The declared path.
        path: String,
    },
    /// A drag group has no drag handles, so it can never be dragged or routed to.
    NoDragHandles,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActivatorNotFound { path } => {
                write!(f, "route activator `{path}` does not resolve to a node")
            }
            Self::EndpointNotFound { path } => {
                write!(f, "route endpoint `{path}` does not resolve to a node")
            }
            Self::EndpointNotFocusable { path } => write!(
                f,
                "route endpoint `{path}` is not focusable; only focusable nodes can be routed to"
            ),
            Self::NoDragHandles => write!(
                f,
                "drag group has no drag handles, so it cannot be dragged; add a drag handle region"
            ),
        }
    }
}
