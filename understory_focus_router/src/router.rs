// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus router implementation.
//!
//! ## Overview
//!
//! A [`FocusRouter`] owns a table of routes and, on every pointer motion it receives
//! while focused, grants focus to the endpoint of the topmost routed region under the
//! pointer and takes it away from the others.
//!
//! ## Poll
//!
//! 1. A router that is not focused does nothing. This is how a parent router silences
//!    an entire inactive subtree.
//! 2. Query the scene for regions under the pointer (mask, capped at `max_results`).
//! 3. Rank by descending absolute stacking order; ties keep query order.
//! 4. The top match is the first ranked region that has a route. Regions without a
//!    route still occupy their rank.
//! 5. Every other endpoint that is focused and not holding focus is unfocused, and
//!    every other endpoint loses its focus lock. This runs even with no top match.
//! 6. If the top match's endpoint is not focused and the router is not under sole
//!    focus, it is focused and locked.
//!
//! All unfocus transitions of a poll happen before its focus transition.
//!
//! ## Derived flags
//!
//! A router's `hold_focus` (`sole_focus`) is true while any of its endpoints is
//! focused and holding (claiming sole) focus. Endpoint notifications drive the
//! update: the notifying endpoint can raise a flag on its own, but clearing it
//! re-scans every endpoint so interleaved notifications never clear a flag another
//! endpoint still asserts. External writes to these flags are ignored.
//!
//! ## Nesting
//!
//! A router is itself [`Focusable`], so it can be the endpoint of another router.
//! Unfocusing or unlocking a router releases the focus locks it placed on its own
//! endpoints, since it no longer drives them.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::hash::Hash;

use kurbo::Point;
use smallvec::SmallVec;

use crate::error::{ConfigWarning, DuplicateRouteError};
use crate::focusable::Focusable;
use crate::route::{RouteDecl, RouteTable, same_endpoint};
use crate::scene::{EndpointLookup, SceneGraph, SpatialQuery};
use crate::signal::{FocusChange, FocusSignal, FocusSignals, ListenerId};
use crate::stacking::rank_by_absolute_z;

type Endpoints = SmallVec<[Rc<dyn Focusable>; 8]>;
type Predicate = fn(&dyn Focusable) -> bool;

fn holding(f: &dyn Focusable) -> bool {
    f.is_holding_focus()
}

fn claiming_sole(f: &dyn Focusable) -> bool {
    f.is_claiming_sole_focus()
}

/// Construction parameters for a [`FocusRouter`].
#[derive(Clone, Debug)]
pub struct RouterConfig<M> {
    /// Initial focus. A root router is normally focused for its whole life.
    pub focused: bool,
    /// Region filter passed to the spatial query.
    pub mask: M,
    /// Cap on query results. Very large values make dense overlaps expensive.
    pub max_results: usize,
    /// Routes resolved by [`FocusRouter::register_declared`].
    pub routes: Vec<RouteDecl>,
}

impl<M> RouterConfig<M> {
    /// Default for [`RouterConfig::max_results`].
    pub const DEFAULT_MAX_RESULTS: usize = 1028;

    /// A focused router over `mask` with no declared routes.
    pub fn new(mask: M) -> Self {
        Self {
            focused: true,
            mask,
            max_results: Self::DEFAULT_MAX_RESULTS,
            routes: Vec::new(),
        }
    }
}

/// Routes pointer focus among registered endpoints.
///
/// Create it with [`FocusRouter::new`] or [`FocusRouter::with_config`]; routers are
/// always shared (`Rc`) because endpoints notify them through weak references.
pub struct FocusRouter<K, M> {
    this: Weak<Self>,
    focused: Cell<bool>,
    hold_focus: Cell<bool>,
    sole_focus: Cell<bool>,
    focus_locked: Cell<bool>,
    signals: FocusSignals,
    routes: RefCell<RouteTable<K>>,
    declared: RefCell<Vec<RouteDecl>>,
    mask: Cell<M>,
    max_results: Cell<usize>,
    hits: RefCell<Vec<K>>,
}

impl<K: fmt::Debug, M: Copy + fmt::Debug> fmt::Debug for FocusRouter<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRouter")
            .field("focused", &self.focused.get())
            .field("hold_focus", &self.hold_focus.get())
            .field("sole_focus", &self.sole_focus.get())
            .field("focus_locked", &self.focus_locked.get())
            .field("mask", &self.mask.get())
            .field("max_results", &self.max_results.get())
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl<K, M> FocusRouter<K, M>
where
    K: Copy + Eq + Hash + fmt::Debug + 'static,
    M: Copy + 'static,
{
    /// A focused router over `mask` with no routes.
    pub fn new(mask: M) -> Rc<Self> {
        Self::with_config(RouterConfig::new(mask))
    }

    /// A router built from `config`. Declared routes wait for
    /// [`register_declared`](Self::register_declared).
    pub fn with_config(config: RouterConfig<M>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: Weak::clone(this),
            focused: Cell::new(config.focused),
            hold_focus: Cell::new(false),
            sole_focus: Cell::new(false),
            focus_locked: Cell::new(false),
            signals: FocusSignals::default(),
            routes: RefCell::new(RouteTable::new()),
            declared: RefCell::new(config.routes),
            mask: Cell::new(config.mask),
            max_results: Cell::new(config.max_results),
            hits: RefCell::new(Vec::new()),
        })
    }

    /// Register a route from `activator` to `endpoint`.
    ///
    /// Fails without changing anything if `activator` already has a route.
    pub fn register_route(
        &self,
        activator: K,
        endpoint: Rc<dyn Focusable>,
    ) -> Result<(), DuplicateRouteError<K>> {
        let holds = endpoint.is_holding_focus() || endpoint.is_claiming_sole_focus();
        self.routes
            .borrow_mut()
            .insert_with(activator, endpoint, |e| self.subscribe(e))?;
        tracing::trace!(activator = ?activator, "registered focus route");
        if holds {
            self.refresh_derived();
        }
        Ok(())
    }

    /// Resolve and register the routes declared in this router's configuration.
    ///
    /// Paths resolve relative to `origin`, normally the router's own scene node.
    /// Declarations that do not resolve, or whose endpoint is not focusable, are
    /// skipped and reported as warnings. If any resolved activator is already routed
    /// (or declared twice) nothing is registered and the declarations are kept.
    pub fn register_declared<G, L>(
        &self,
        scene: &G,
        origin: K,
        lookup: &L,
    ) -> Result<Vec<ConfigWarning>, DuplicateRouteError<K>>
    where
        G: SceneGraph<K> + ?Sized,
        L: EndpointLookup<K> + ?Sized,
    {
        let declared = core::mem::take(&mut *self.declared.borrow_mut());
        let mut warnings = Vec::new();
        let mut resolved: Vec<(K, Rc<dyn Focusable>)> = Vec::with_capacity(declared.len());

        for decl in &declared {
            let Some(activator) = scene.resolve_path(origin, &decl.activator) else {
                warnings.push(ConfigWarning::ActivatorNotFound {
                    path: decl.activator.clone(),
                });
                continue;
            };
            let Some(node) = scene.resolve_path(origin, &decl.endpoint) else {
                warnings.push(ConfigWarning::EndpointNotFound {
                    path: decl.endpoint.clone(),
                });
                continue;
            };
            let Some(endpoint) = lookup.focusable(&node) else {
                warnings.push(ConfigWarning::EndpointNotFocusable {
                    path: decl.endpoint.clone(),
                });
                continue;
            };
            resolved.push((activator, endpoint));
        }

        let duplicate = {
            let routes = self.routes.borrow();
            resolved.iter().enumerate().find_map(|(i, (activator, _))| {
                let repeated = resolved[..i].iter().any(|(other, _)| other == activator);
                (repeated || routes.contains(activator)).then_some(*activator)
            })
        };
        if let Some(activator) = duplicate {
            *self.declared.borrow_mut() = declared;
            return Err(DuplicateRouteError { activator });
        }

        for (activator, endpoint) in resolved {
            self.register_route(activator, endpoint)?;
        }
        for warning in &warnings {
            tracing::warn!(%warning, "skipped declared focus route");
        }
        Ok(warnings)
    }

    /// Remove the route for `activator`, returning its endpoint.
    ///
    /// When this was the endpoint's last route in this router, the endpoint loses
    /// its focus lock and stops notifying the router. Derived flags are
    /// recomputed either way.
    pub fn unregister_route(&self, activator: &K) -> Option<Rc<dyn Focusable>> {
        let route = self
            .routes
            .borrow_mut()
            .remove_with(activator, |endpoint, listeners| {
                for (change, id) in FocusChange::ALL.into_iter().zip(listeners) {
                    endpoint.signal(change).disconnect(id);
                }
            })?;
        let endpoint = Rc::clone(route.endpoint());
        let still_routed = self
            .routes
            .borrow()
            .endpoints()
            .any(|e| same_endpoint(e, &endpoint));
        if !still_routed {
            endpoint.set_focus_locked(false);
        }
        self.refresh_derived();
        Some(endpoint)
    }

    /// Run one poll at `point`. Returns the top match, if any.
    ///
    /// Call this for every pointer motion. Does nothing unless the router is focused.
    pub fn on_pointer_motion<S>(&self, scene: &S, point: Point) -> Option<K>
    where
        S: SpatialQuery<K, Mask = M> + ?Sized,
    {
        if !self.focused.get() {
            return None;
        }
        let top = self.top_match(scene, point);

        let (top_endpoint, others) = {
            let routes = self.routes.borrow();
            let top_endpoint = top
                .and_then(|activator| routes.get(&activator))
                .map(|route| Rc::clone(route.endpoint()));
            let others: Endpoints = routes
                .endpoints()
                .filter(|e| top_endpoint.as_ref().is_none_or(|t| !same_endpoint(t, e)))
                .cloned()
                .collect();
            (top_endpoint, others)
        };

        for endpoint in &others {
            if endpoint.is_focused() && !endpoint.hold_focus() {
                endpoint.unfocus();
            }
            endpoint.set_focus_locked(false);
        }

        if let Some(endpoint) = top_endpoint
            && !self.sole_focus.get()
            && !endpoint.is_focused()
        {
            tracing::debug!(activator = ?top, "routing focus");
            endpoint.focus();
            endpoint.set_focus_locked(true);
        }
        top
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.routes.borrow().len()
    }

    /// The endpoint routed from `activator`.
    pub fn endpoint_for(&self, activator: &K) -> Option<Rc<dyn Focusable>> {
        self.routes
            .borrow()
            .get(activator)
            .map(|route| Rc::clone(route.endpoint()))
    }

    /// Every routed activator, in unspecified order.
    pub fn activators(&self) -> Vec<K> {
        self.routes.borrow().iter().map(|route| route.activator()).collect()
    }

    /// Declarations still waiting for [`register_declared`](Self::register_declared).
    pub fn pending_declarations(&self) -> Vec<RouteDecl> {
        self.declared.borrow().clone()
    }

    /// The query mask.
    pub fn mask(&self) -> M {
        self.mask.get()
    }

    /// Replace the query mask. Takes effect on the next poll.
    pub fn set_mask(&self, mask: M) {
        self.mask.set(mask);
    }

    /// The query result cap.
    pub fn max_results(&self) -> usize {
        self.max_results.get()
    }

    /// Replace the query result cap. Takes effect on the next poll.
    pub fn set_max_results(&self, max_results: usize) {
        self.max_results.set(max_results);
    }

    fn top_match<S>(&self, scene: &S, point: Point) -> Option<K>
    where
        S: SpatialQuery<K, Mask = M> + ?Sized,
    {
        let mut hits = self.hits.borrow_mut();
        hits.clear();
        let max_results = self.max_results.get();
        scene.intersect_point(point, self.mask.get(), max_results, &mut hits);
        hits.truncate(max_results);
        rank_by_absolute_z(scene, &mut hits);
        let routes = self.routes.borrow();
        hits.iter().copied().find(|activator| routes.contains(activator))
    }

    fn subscribe(&self, endpoint: &Rc<dyn Focusable>) -> [ListenerId; 3] {
        FocusChange::ALL.map(|change| {
            let router = Weak::clone(&self.this);
            endpoint.signal(change).connect(move |source| {
                if let Some(router) = router.upgrade() {
                    router.on_endpoint_changed(source);
                }
            })
        })
    }

    fn on_endpoint_changed(&self, source: &dyn Focusable) {
        self.update_derived(source, FocusChange::HoldFocus);
        self.update_derived(source, FocusChange::SoleFocus);
    }

    fn update_derived(&self, source: &dyn Focusable, change: FocusChange) {
        let Some((flag, asserts)) = self.derived(change) else {
            return;
        };
        if asserts(source) {
            flag.set(true);
            self.signals.get(change).emit(self);
        } else if !self.any_endpoint(asserts) {
            flag.set(false);
            self.signals.get(change).emit(self);
        }
    }

    /// Recompute both derived flags from scratch, notifying only on change.
    fn refresh_derived(&self) {
        for change in [FocusChange::HoldFocus, FocusChange::SoleFocus] {
            let Some((flag, asserts)) = self.derived(change) else {
                continue;
            };
            let value = self.any_endpoint(asserts);
            if flag.replace(value) != value {
                self.signals.get(change).emit(self);
            }
        }
    }

    fn derived(&self, change: FocusChange) -> Option<(&Cell<bool>, Predicate)> {
        match change {
            FocusChange::HoldFocus => Some((&self.hold_focus, holding as Predicate)),
            FocusChange::SoleFocus => Some((&self.sole_focus, claiming_sole as Predicate)),
            FocusChange::Focus => None,
        }
    }

    fn any_endpoint(&self, pred: Predicate) -> bool {
        self.routes.borrow().endpoints().any(|e| pred(&**e))
    }

    fn release_focus_locks(&self) {
        let endpoints: Endpoints = self.routes.borrow().endpoints().cloned().collect();
        for endpoint in endpoints {
            endpoint.set_focus_locked(false);
        }
    }
}

impl<K, M> Focusable for FocusRouter<K, M>
where
    K: Copy + Eq + Hash + fmt::Debug + 'static,
    M: Copy + 'static,
{
    fn is_focused(&self) -> bool {
        self.focused.get()
    }

    fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
        self.signals.get(FocusChange::Focus).emit(self);
        if !focused {
            self.release_focus_locks();
        }
    }

    fn hold_focus(&self) -> bool {
        self.hold_focus.get()
    }

    /// Ignored: a router's hold flag is derived from its endpoints.
    fn set_hold_focus(&self, _hold: bool) {}

    fn sole_focus(&self) -> bool {
        self.sole_focus.get()
    }

    /// Ignored: a router's sole flag is derived from its endpoints.
    fn set_sole_focus(&self, _sole: bool) {}

    fn focus_locked(&self) -> bool {
        self.focus_locked.get()
    }

    fn set_focus_locked(&self, locked: bool) {
        self.focus_locked.set(locked);
        if !locked {
            self.release_focus_locks();
        }
    }

    fn signal(&self, change: FocusChange) -> &FocusSignal {
        self.signals.get(change)
    }
}

impl<K, M> Drop for FocusRouter<K, M> {
    fn drop(&mut self) {
        self.routes.get_mut().clear_with(|endpoint, listeners| {
            for (change, id) in FocusChange::ALL.into_iter().zip(listeners) {
                endpoint.signal(change).disconnect(id);
            }
        });
    }
}
