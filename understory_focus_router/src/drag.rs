// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag groups that take part in focus routing.
//!
//! ## Overview
//!
//! A [`FocusableDragGroup`] is moved by its [`DragHandle`] regions. It is registered
//! in a router once per handle (see [`FocusableDragGroup::register_to`]), so the
//! router focuses it while the pointer is over any of its handles.
//!
//! Dragging must outlive the pointer leaving the handle, which happens as soon as
//! the pointer moves faster than the group follows. So:
//!
//! - A primary press on a handle while the group is focused sets `hold_focus`; the
//!   router then keeps the group focused even when another region becomes the top
//!   match. Any release clears the hold again.
//! - Every tick, [`FocusableDragGroup::process`] unfocuses the group once it is
//!   neither locked by a router nor held by a pressed primary button. This runs on
//!   button state, so a release without any motion still ends the drag.
//!
//! Applying the yielded delta to the group's position is the host's job.
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::{Point, Vec2};
//! use understory_focus_router::{
//!     Focusable, FocusableDragGroup, PointerButtons, PointerState,
//! };
//!
//! let group = Rc::new(FocusableDragGroup::new([7_u32]));
//! let mut pointer = PointerState::default();
//!
//! // A router focused the group; the user presses on handle 7 and moves.
//! group.focus();
//! pointer.press(PointerButtons::PRIMARY);
//! group.on_pointer_pressed(&[7]);
//! group.on_pointer_motion(Vec2::new(4.0, 0.0));
//! assert_eq!(group.process(&pointer), Some(Vec2::new(4.0, 0.0)));
//!
//! // Releasing ends the drag and, with no router lock, the focus.
//! pointer.release(PointerButtons::PRIMARY);
//! group.on_pointer_released();
//! assert_eq!(group.process(&pointer), None);
//! assert!(!group.is_focused());
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;
use core::hash::Hash;

use kurbo::Vec2;

use crate::dispatch::{PointerButtons, PointerState};
use crate::error::{ConfigWarning, DuplicateRouteError};
use crate::focusable::{FocusState, Focusable};
use crate::router::FocusRouter;
use crate::scene::SceneGraph;
use crate::signal::{FocusChange, FocusSignal};

/// A region by which a drag group is dragged.
#[derive(Clone, Debug)]
pub struct DragHandle<K> {
    region: K,
    dragging: Cell<bool>,
}

impl<K: Copy> DragHandle<K> {
    /// A handle over `region`, not dragging.
    pub fn new(region: K) -> Self {
        Self {
            region,
            dragging: Cell::new(false),
        }
    }

    /// The handle's region.
    pub fn region(&self) -> K {
        self.region
    }

    /// Whether the handle was pressed and not yet released.
    ///
    /// This does not mean the group is moving.
    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }
}

/// How [`FocusableDragGroup::from_scene`] classifies a scene node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragNodeKind {
    /// A drag handle of the nearest enclosing group.
    Handle,
    /// A nested drag group. Its handles belong to it, so the search stops here.
    Group,
    /// Anything else. The search continues into its children.
    Other,
}

/// A drag group that only moves while focused.
#[derive(Debug)]
pub struct FocusableDragGroup<K> {
    state: FocusState,
    handles: Vec<DragHandle<K>>,
    enabled: Cell<bool>,
    pending: Cell<Vec2>,
    holding: Cell<bool>,
}

impl<K: Copy + PartialEq> FocusableDragGroup<K> {
    /// A group dragged by the given handle regions. Dragging starts enabled.
    pub fn new(handles: impl IntoIterator<Item = K>) -> Self {
        Self {
            state: FocusState::new(),
            handles: handles.into_iter().map(DragHandle::new).collect(),
            enabled: Cell::new(true),
            pending: Cell::new(Vec2::ZERO),
            holding: Cell::new(false),
        }
    }

    /// Build a group for the scene node `root`, discovering its handles.
    ///
    /// Descendants are searched depth first in scene order. The search does not
    /// enter nested groups, so groups can be nested. A group with no handles is
    /// still returned; the problem is logged and listed by
    /// [`configuration_warnings`](Self::configuration_warnings).
    pub fn from_scene<G>(scene: &G, root: K, kind: impl Fn(&K) -> DragNodeKind) -> Self
    where
        G: SceneGraph<K> + ?Sized,
    {
        let mut handles = Vec::new();
        collect_handles(scene, root, &kind, &mut handles);
        let group = Self::new(handles);
        for warning in group.configuration_warnings() {
            tracing::warn!(%warning, "drag group is misconfigured");
        }
        group
    }

    /// The group's handles.
    pub fn handles(&self) -> &[DragHandle<K>] {
        &self.handles
    }

    /// Problems that keep this group from working.
    pub fn configuration_warnings(&self) -> Vec<ConfigWarning> {
        if self.handles.is_empty() {
            alloc::vec![ConfigWarning::NoDragHandles]
        } else {
            Vec::new()
        }
    }

    /// Allow the group to be dragged.
    pub fn enable_dragging(&self) {
        self.enabled.set(true);
    }

    /// Disallow the group to be dragged.
    pub fn disable_dragging(&self) {
        self.enabled.set(false);
    }

    /// Flip whether the group may be dragged.
    pub fn toggle_dragging(&self) {
        self.enabled.set(!self.enabled.get());
    }

    /// Whether the group may be dragged.
    pub fn is_dragging_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Whether dragging is enabled and any handle is dragging.
    pub fn is_being_dragged(&self) -> bool {
        self.enabled.get() && self.handles.iter().any(DragHandle::is_dragging)
    }

    /// A primary press hit the regions in `hits`.
    ///
    /// Handles among them start dragging. If one did and the group is focused,
    /// the group holds its focus until release.
    pub fn on_pointer_pressed(&self, hits: &[K]) {
        let mut started = false;
        for handle in &self.handles {
            if hits.contains(&handle.region) {
                handle.dragging.set(true);
                started = true;
            }
        }
        if started && self.state.is_focused() && !self.holding.get() {
            self.holding.set(true);
            self.set_hold_focus(true);
        }
    }

    /// Any button was released, wherever the pointer is.
    pub fn on_pointer_released(&self) {
        for handle in &self.handles {
            handle.dragging.set(false);
        }
        if self.holding.replace(false) {
            self.set_hold_focus(false);
        }
    }

    /// The pointer moved by `delta`. Accumulates while a handle is dragging.
    pub fn on_pointer_motion(&self, delta: Vec2) {
        if self.handles.iter().any(DragHandle::is_dragging) {
            self.pending.set(self.pending.get() + delta);
        }
    }

    /// Per-tick update.
    ///
    /// Returns the motion accumulated since the last tick if the group is focused,
    /// enabled and being dragged; accumulated motion is discarded otherwise. Then
    /// unfocuses the group if it is focused but neither locked nor held by a
    /// pressed primary button.
    pub fn process(&self, pointer: &PointerState) -> Option<Vec2> {
        let delta = self.pending.replace(Vec2::ZERO);
        let moved = (self.state.is_focused() && self.is_being_dragged()).then_some(delta);

        if self.state.is_focused()
            && !self.state.focus_locked()
            && !pointer.is_pressed(PointerButtons::PRIMARY)
        {
            tracing::trace!("drag group released focus");
            self.unfocus();
        }
        moved
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug + 'static> FocusableDragGroup<K> {
    /// Register every handle in `router` with this group as the endpoint.
    ///
    /// Stops at the first handle that is already routed; handles registered
    /// before it stay registered.
    pub fn register_to<M>(self: &Rc<Self>, router: &FocusRouter<K, M>) -> Result<(), DuplicateRouteError<K>>
    where
        M: Copy + 'static,
    {
        let endpoint: Rc<dyn Focusable> = Rc::clone(self) as Rc<dyn Focusable>;
        for handle in &self.handles {
            router.register_route(handle.region, Rc::clone(&endpoint))?;
        }
        Ok(())
    }
}

fn collect_handles<K, G>(scene: &G, parent: K, kind: &dyn Fn(&K) -> DragNodeKind, out: &mut Vec<K>)
where
    K: Copy,
    G: SceneGraph<K> + ?Sized,
{
    for child in scene.children_of(parent) {
        match kind(&child) {
            DragNodeKind::Handle => out.push(child),
            DragNodeKind::Group => {}
            DragNodeKind::Other => collect_handles(scene, child, kind, out),
        }
    }
}

impl<K> Focusable for FocusableDragGroup<K> {
    fn is_focused(&self) -> bool {
        self.state.is_focused()
    }

    fn set_focused(&self, focused: bool) {
        self.state.set_focused_from(focused, self);
    }

    fn hold_focus(&self) -> bool {
        self.state.hold_focus()
    }

    fn set_hold_focus(&self, hold: bool) {
        self.state.set_hold_focus_from(hold, self);
    }

    fn sole_focus(&self) -> bool {
        self.state.sole_focus()
    }

    fn set_sole_focus(&self, sole: bool) {
        self.state.set_sole_focus_from(sole, self);
    }

    fn focus_locked(&self) -> bool {
        self.state.focus_locked()
    }

    fn set_focus_locked(&self, locked: bool) {
        self.state.set_focus_locked(locked);
    }

    fn signal(&self, change: FocusChange) -> &FocusSignal {
        self.state.signal(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pressed() -> PointerState {
        let mut pointer = PointerState::default();
        pointer.press(PointerButtons::PRIMARY);
        pointer
    }

    #[test]
    fn press_on_handle_while_focused_holds_focus_until_release() {
        let group = FocusableDragGroup::new([1_u32, 2]);
        group.focus();
        group.on_pointer_pressed(&[5, 2]);
        assert!(group.is_being_dragged());
        assert!(group.is_holding_focus());

        group.on_pointer_released();
        assert!(!group.is_being_dragged());
        assert!(!group.hold_focus());
    }

    #[test]
    fn press_while_unfocused_drags_without_holding() {
        let group = FocusableDragGroup::new([1_u32]);
        group.on_pointer_pressed(&[1]);
        assert!(group.is_being_dragged());
        assert!(!group.hold_focus());
    }

    #[test]
    fn release_keeps_hold_it_did_not_set() {
        let group = FocusableDragGroup::new([1_u32]);
        group.set_hold_focus(true);
        group.on_pointer_released();
        assert!(group.hold_focus());
    }

    #[test]
    fn press_elsewhere_does_not_drag() {
        let group = FocusableDragGroup::new([1_u32]);
        group.focus();
        group.on_pointer_pressed(&[3]);
        assert!(!group.is_being_dragged());
        assert!(!group.hold_focus());
    }

    #[test]
    fn process_yields_accumulated_motion_only_while_focused_and_dragging() {
        let group = FocusableDragGroup::new([1_u32]);
        let pointer = pressed();

        group.on_pointer_motion(Vec2::new(1.0, 1.0));
        group.focus();
        assert_eq!(group.process(&pointer), None, "motion before the press is ignored");

        group.on_pointer_pressed(&[1]);
        group.on_pointer_motion(Vec2::new(2.0, 0.0));
        group.on_pointer_motion(Vec2::new(1.0, 3.0));
        assert_eq!(group.process(&pointer), Some(Vec2::new(3.0, 3.0)));
        assert_eq!(group.process(&pointer), Some(Vec2::ZERO));

        group.unfocus();
        group.on_pointer_motion(Vec2::new(5.0, 5.0));
        assert_eq!(group.process(&pointer), None);
    }

    #[test]
    fn disabled_group_does_not_move() {
        let group = FocusableDragGroup::new([1_u32]);
        let pointer = pressed();
        group.focus();
        group.on_pointer_pressed(&[1]);
        group.disable_dragging();
        group.on_pointer_motion(Vec2::new(2.0, 0.0));
        assert!(!group.is_being_dragged());
        assert_eq!(group.process(&pointer), None);

        group.toggle_dragging();
        assert!(group.is_dragging_enabled());
        assert!(group.is_being_dragged());
    }

    #[test]
    fn tick_unfocuses_when_unlocked_and_released() {
        let group = FocusableDragGroup::new([1_u32]);
        group.focus();
        group.set_focus_locked(true);
        group.process(&PointerState::default());
        assert!(group.is_focused(), "a router lock keeps focus");

        group.set_focus_locked(false);
        group.process(&pressed());
        assert!(group.is_focused(), "a pressed primary button keeps focus");

        group.process(&PointerState::default());
        assert!(!group.is_focused());
    }

    #[test]
    fn tick_does_not_renotify_unfocused_group() {
        let group = FocusableDragGroup::new([1_u32]);
        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            group
                .signal(FocusChange::Focus)
                .connect(move |_| count.set(count.get() + 1));
        }
        group.process(&PointerState::default());
        group.process(&PointerState::default());
        assert_eq!(count.get(), 0);
    }

    struct Nodes(Vec<Vec<usize>>, Vec<DragNodeKind>);

    impl SceneGraph<usize> for Nodes {
        fn resolve_path(&self, _origin: usize, _path: &str) -> Option<usize> {
            None
        }
        fn children_of(&self, node: usize) -> Vec<usize> {
            self.0[node].clone()
        }
    }

    #[test]
    fn from_scene_skips_nested_groups() {
        use DragNodeKind::*;
        // 0 group: [1 handle, 2 other: [3 handle], 4 group: [5 handle]]
        let scene = Nodes(
            vec![vec![1, 2, 4], vec![], vec![3], vec![], vec![5], vec![]],
            vec![Group, Handle, Other, Handle, Group, Handle],
        );
        let group = FocusableDragGroup::from_scene(&scene, 0, |n| scene.1[*n]);
        let regions: Vec<usize> = group.handles().iter().map(DragHandle::region).collect();
        assert_eq!(regions, vec![1, 3]);
        assert!(group.configuration_warnings().is_empty());

        let inner = FocusableDragGroup::from_scene(&scene, 4, |n| scene.1[*n]);
        assert_eq!(inner.handles().len(), 1);
    }

    #[test]
    fn group_without_handles_warns() {
        let group = FocusableDragGroup::<u32>::new([]);
        assert_eq!(group.configuration_warnings(), vec![ConfigWarning::NoDragHandles]);
    }

    #[test]
    fn register_to_routes_every_handle_to_the_group() {
        let router: Rc<FocusRouter<u32, ()>> = FocusRouter::new(());
        let group = Rc::new(FocusableDragGroup::new([1_u32, 2]));
        group.register_to(&router).unwrap();
        assert_eq!(router.route_count(), 2);

        group.focus();
        group.on_pointer_pressed(&[1]);
        assert!(router.hold_focus(), "the router sees the group's hold");

        let again = Rc::new(FocusableDragGroup::new([2_u32]));
        assert_eq!(again.register_to(&router).unwrap_err().activator, 2);
    }

    #[test]
    fn listeners_receive_the_group_as_source() {
        let group = Rc::new(FocusableDragGroup::new([1_u32]));
        let sources = Rc::new(core::cell::RefCell::new(Vec::new()));
        for change in [FocusChange::Focus, FocusChange::HoldFocus] {
            let sources = Rc::clone(&sources);
            group.signal(change).connect(move |source| {
                sources.borrow_mut().push(core::ptr::from_ref(source).cast::<()>());
            });
        }

        group.focus();
        group.on_pointer_pressed(&[1]);
        group.on_pointer_released();
        group.process(&PointerState::default());

        let expected = Rc::as_ptr(&group).cast::<()>();
        let sources = sources.borrow();
        assert_eq!(sources.len(), 4, "focus, hold, release, tick unfocus");
        assert!(sources.iter().all(|&s| s == expected));
    }
}
