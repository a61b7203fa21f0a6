// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes and the per-router route registry.
//!
//! A [`Route`] pairs an *activator* (a region key the router hit-tests) with an
//! *endpoint* (the [`Focusable`] focused when the activator is the top match).
//! Routes never change after registration.
//!
//! One endpoint may appear under several activators of the same router, for
//! example a drag group registered once per drag handle. The table counts routes
//! per endpoint so the owning router subscribes to each endpoint once.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::error::DuplicateRouteError;
use crate::focusable::Focusable;
use crate::signal::ListenerId;

/// An activator → endpoint pair.
#[derive(Clone)]
pub struct Route<K> {
    activator: K,
    endpoint: Rc<dyn Focusable>,
}

impl<K: fmt::Debug> fmt::Debug for Route<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("activator", &self.activator)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl<K: Copy> Route<K> {
    /// The region key that triggers this route.
    pub fn activator(&self) -> K {
        self.activator
    }

    /// The focusable this route drives.
    pub fn endpoint(&self) -> &Rc<dyn Focusable> {
        &self.endpoint
    }
}

/// A route declared by scene paths, resolved when the router initializes.
///
/// Both paths are relative to the router's own scene node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDecl {
    /// Path of the region that detects the pointer.
    pub activator: String,
    /// Path of the node focused when the activator is hit. It must be focusable.
    pub endpoint: String,
}

impl RouteDecl {
    /// Declare a route from two paths.
    pub fn new(activator: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            activator: activator.into(),
            endpoint: endpoint.into(),
        }
    }
}

pub(crate) struct Subscription {
    endpoint: Rc<dyn Focusable>,
    routes: usize,
    listeners: [ListenerId; 3],
}

/// Registry of routes owned by one router.
///
/// Iteration order is unspecified.
pub struct RouteTable<K> {
    routes: HashMap<K, Route<K>>,
    subscriptions: Vec<Subscription>,
}

impl<K> Default for RouteTable<K> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            subscriptions: Vec::new(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RouteTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("activators", &self.routes.keys().collect::<Vec<_>>())
            .field("endpoints", &self.subscriptions.len())
            .finish()
    }
}

impl<K> RouteTable<K> {
    /// Remove every route, calling `unsubscribe` once per endpoint.
    pub(crate) fn clear_with(&mut self, mut unsubscribe: impl FnMut(&Rc<dyn Focusable>, [ListenerId; 3])) {
        self.routes.clear();
        for sub in self.subscriptions.drain(..) {
            unsubscribe(&sub.endpoint, sub.listeners);
        }
    }
}

pub(crate) fn same_endpoint(a: &Rc<dyn Focusable>, b: &Rc<dyn Focusable>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl<K: Copy + Eq + Hash> RouteTable<K> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether `activator` has a route.
    pub fn contains(&self, activator: &K) -> bool {
        self.routes.contains_key(activator)
    }

    /// The route for `activator`.
    pub fn get(&self, activator: &K) -> Option<&Route<K>> {
        self.routes.get(activator)
    }

    /// All routes.
    pub fn iter(&self) -> impl Iterator<Item = &Route<K>> {
        self.routes.values()
    }

    /// Each distinct endpoint once, however many activators route to it.
    pub fn endpoints(&self) -> impl Iterator<Item = &Rc<dyn Focusable>> {
        self.subscriptions.iter().map(|s| &s.endpoint)
    }

    /// Add a route. `subscribe` runs only for an endpoint's first route.
    ///
    /// On a duplicate activator nothing changes and `subscribe` is not called.
    pub(crate) fn insert_with(
        &mut self,
        activator: K,
        endpoint: Rc<dyn Focusable>,
        subscribe: impl FnOnce(&Rc<dyn Focusable>) -> [ListenerId; 3],
    ) -> Result<(), DuplicateRouteError<K>> {
        if self.routes.contains_key(&activator) {
            return Err(DuplicateRouteError { activator });
        }
        match self
            .subscriptions
            .iter()
            .position(|s| same_endpoint(&s.endpoint, &endpoint))
        {
            Some(pos) => self.subscriptions[pos].routes += 1,
            None => {
                let listeners = subscribe(&endpoint);
                self.subscriptions.push(Subscription {
                    endpoint: Rc::clone(&endpoint),
                    routes: 1,
                    listeners,
                });
            }
        }
        self.routes.insert(activator, Route { activator, endpoint });
        Ok(())
    }

    /// Remove a route. `unsubscribe` runs when it was the endpoint's last route.
    pub(crate) fn remove_with(
        &mut self,
        activator: &K,
        unsubscribe: impl FnOnce(&Rc<dyn Focusable>, [ListenerId; 3]),
    ) -> Option<Route<K>> {
        let route = self.routes.remove(activator)?;
        if let Some(pos) = self
            .subscriptions
            .iter()
            .position(|s| same_endpoint(&s.endpoint, &route.endpoint))
        {
            let sub = &mut self.subscriptions[pos];
            sub.routes -= 1;
            if sub.routes == 0 {
                let sub = self.subscriptions.swap_remove(pos);
                unsubscribe(&sub.endpoint, sub.listeners);
            }
        }
        Some(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focusable::FocusState;
    use core::cell::Cell;

    fn fake_listeners() -> [ListenerId; 3] {
        let state = FocusState::new();
        crate::signal::FocusChange::ALL.map(|c| state.signal(c).connect(|_| {}))
    }

    #[test]
    fn duplicate_activator_leaves_table_untouched() {
        let mut table = RouteTable::new();
        let a: Rc<dyn Focusable> = Rc::new(FocusState::new());
        let b: Rc<dyn Focusable> = Rc::new(FocusState::new());
        table.insert_with(1_u32, Rc::clone(&a), |_| fake_listeners()).unwrap();

        let subscribed = Cell::new(false);
        let err = table
            .insert_with(1, Rc::clone(&b), |_| {
                subscribed.set(true);
                fake_listeners()
            })
            .unwrap_err();
        assert_eq!(err.activator, 1);
        assert!(!subscribed.get());
        assert_eq!(table.len(), 1);
        assert!(same_endpoint(table.get(&1).unwrap().endpoint(), &a));
        assert_eq!(table.endpoints().count(), 1);
    }

    #[test]
    fn shared_endpoint_subscribes_once_and_unsubscribes_last() {
        let mut table = RouteTable::new();
        let shared: Rc<dyn Focusable> = Rc::new(FocusState::new());
        let subscribes = Cell::new(0);
        for activator in [10_u32, 11, 12] {
            table
                .insert_with(activator, Rc::clone(&shared), |_| {
                    subscribes.set(subscribes.get() + 1);
                    fake_listeners()
                })
                .unwrap();
        }
        assert_eq!(subscribes.get(), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.endpoints().count(), 1);

        let unsubscribes = Cell::new(0);
        for activator in [10_u32, 11] {
            assert!(table.remove_with(&activator, |_, _| unsubscribes.set(1)).is_some());
        }
        assert_eq!(unsubscribes.get(), 0);
        assert!(table.remove_with(&12, |_, _| unsubscribes.set(1)).is_some());
        assert_eq!(unsubscribes.get(), 1);
        assert!(table.is_empty());
        assert!(table.remove_with(&12, |_, _| unreachable!()).is_none());
    }
}
