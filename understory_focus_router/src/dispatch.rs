// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input plumbing for routers and drag groups.
//!
//! Only the root router needs raw input; nested routers are driven through the
//! focusable contract. A [`FocusDispatcher`] still lists nested routers so each
//! one polls on motion once its parent has focused it. Routers are polled in the
//! order they were added, so add parents before their children.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use bitflags::bitflags;
use kurbo::{Point, Vec2};

use crate::drag::FocusableDragGroup;
use crate::router::{FocusRouter, RouterConfig};
use crate::scene::SpatialQuery;

bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// The primary (usually left) button.
        const PRIMARY = 1 << 0;
        /// The secondary (usually right) button.
        const SECONDARY = 1 << 1;
        /// The auxiliary (usually middle) button.
        const AUXILIARY = 1 << 2;
    }
}

/// Last known pointer position and buttons.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Last position, `None` until the first motion.
    pub position: Option<Point>,
    /// Buttons held down.
    pub buttons: PointerButtons,
}

impl PointerState {
    /// Move to `position`, returning the motion since the last position.
    ///
    /// The first motion has no previous position and yields zero.
    pub fn move_to(&mut self, position: Point) -> Vec2 {
        let delta = self.position.map_or(Vec2::ZERO, |last| position - last);
        self.position = Some(position);
        delta
    }

    /// Mark `buttons` as held.
    pub fn press(&mut self, buttons: PointerButtons) {
        self.buttons.insert(buttons);
    }

    /// Mark `buttons` as released.
    pub fn release(&mut self, buttons: PointerButtons) {
        self.buttons.remove(buttons);
    }

    /// Whether all of `buttons` are held.
    pub fn is_pressed(&self, buttons: PointerButtons) -> bool {
        self.buttons.contains(buttons)
    }
}

/// Feeds pointer events to routers and drag groups in the required order.
pub struct FocusDispatcher<K, M> {
    routers: Vec<Rc<FocusRouter<K, M>>>,
    drag_groups: Vec<Rc<FocusableDragGroup<K>>>,
    pointer: PointerState,
    drag_mask: M,
    max_results: usize,
    hits: Vec<K>,
}

impl<K: fmt::Debug, M: Copy + fmt::Debug> fmt::Debug for FocusDispatcher<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusDispatcher")
            .field("routers", &self.routers.len())
            .field("drag_groups", &self.drag_groups.len())
            .field("pointer", &self.pointer)
            .field("drag_mask", &self.drag_mask)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl<K, M> FocusDispatcher<K, M>
where
    K: Copy + Eq + Hash + fmt::Debug + 'static,
    M: Copy + 'static,
{
    /// A dispatcher whose presses hit-test drag handles with `drag_mask`.
    ///
    /// Press queries are capped at [`RouterConfig::DEFAULT_MAX_RESULTS`] hits.
    pub fn new(drag_mask: M) -> Self {
        Self {
            routers: Vec::new(),
            drag_groups: Vec::new(),
            pointer: PointerState::default(),
            drag_mask,
            max_results: RouterConfig::<M>::DEFAULT_MAX_RESULTS,
            hits: Vec::new(),
        }
    }

    /// Maximum number of hits a press query returns.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Set the press query cap.
    pub fn set_max_results(&mut self, max_results: usize) {
        self.max_results = max_results;
    }

    /// Add a router after every router added so far.
    pub fn add_router(&mut self, router: Rc<FocusRouter<K, M>>) {
        self.routers.push(router);
    }

    /// Add a drag group to receive presses, releases, motion and ticks.
    pub fn add_drag_group(&mut self, group: Rc<FocusableDragGroup<K>>) {
        self.drag_groups.push(group);
    }

    /// The routers, in poll order.
    pub fn routers(&self) -> &[Rc<FocusRouter<K, M>>] {
        &self.routers
    }

    /// The drag groups.
    pub fn drag_groups(&self) -> &[Rc<FocusableDragGroup<K>>] {
        &self.drag_groups
    }

    /// The current pointer state.
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// The pointer moved to `position`. Returns the motion delta.
    pub fn pointer_moved<S>(&mut self, scene: &S, position: Point) -> Vec2
    where
        S: SpatialQuery<K, Mask = M> + ?Sized,
    {
        let delta = self.pointer.move_to(position);
        for router in &self.routers {
            router.on_pointer_motion(scene, position);
        }
        for group in &self.drag_groups {
            group.on_pointer_motion(delta);
        }
        delta
    }

    /// `buttons` went down at the current pointer position.
    ///
    /// A primary press starts dragging every handle under the pointer.
    pub fn pointer_pressed<S>(&mut self, scene: &S, buttons: PointerButtons)
    where
        S: SpatialQuery<K, Mask = M> + ?Sized,
    {
        self.pointer.press(buttons);
        if !buttons.contains(PointerButtons::PRIMARY) {
            return;
        }
        let Some(position) = self.pointer.position else {
            return;
        };
        self.hits.clear();
        scene.intersect_point(
            position,
            self.drag_mask,
            self.max_results,
            &mut self.hits,
        );
        for group in &self.drag_groups {
            group.on_pointer_pressed(&self.hits);
        }
    }

    /// `buttons` went up. Any release stops every drag.
    pub fn pointer_released(&mut self, buttons: PointerButtons) {
        self.pointer.release(buttons);
        for group in &self.drag_groups {
            group.on_pointer_released();
        }
    }

    /// Per-frame update. `apply` receives each group that moved and its delta.
    pub fn tick(&self, mut apply: impl FnMut(&Rc<FocusableDragGroup<K>>, Vec2)) {
        for group in &self.drag_groups {
            if let Some(delta) = group.process(&self.pointer) {
                apply(group, delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focusable::Focusable;
    use crate::stacking::StackingLookup;
    use alloc::vec;
    use kurbo::Rect;

    /// Axis-aligned regions; index order is query order, all at z 0.
    struct Boxes(Vec<Rect>);

    impl StackingLookup<usize> for Boxes {
        fn z_index(&self, _: &usize) -> i32 {
            0
        }
        fn z_as_relative(&self, _: &usize) -> bool {
            false
        }
        fn parent_of(&self, _: &usize) -> Option<usize> {
            None
        }
    }

    impl SpatialQuery<usize> for Boxes {
        type Mask = ();
        fn intersect_point(&self, point: Point, _: (), max_results: usize, out: &mut Vec<usize>) {
            out.extend(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.contains(point))
                    .map(|(i, _)| i)
                    .take(max_results),
            );
        }
    }

    #[test]
    fn pointer_state_tracks_deltas_and_buttons() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.move_to(Point::new(3.0, 4.0)), Vec2::ZERO);
        assert_eq!(pointer.move_to(Point::new(5.0, 1.0)), Vec2::new(2.0, -3.0));

        pointer.press(PointerButtons::PRIMARY | PointerButtons::SECONDARY);
        pointer.release(PointerButtons::SECONDARY);
        assert!(pointer.is_pressed(PointerButtons::PRIMARY));
        assert!(!pointer.is_pressed(PointerButtons::SECONDARY));
    }

    #[test]
    fn drag_keeps_focus_after_leaving_the_handle() {
        // 0: handle, 1: another routed region.
        let scene = Boxes(vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(50.0, 0.0, 60.0, 10.0),
        ]);
        let router = FocusRouter::new(());
        let group = Rc::new(FocusableDragGroup::new([0_usize]));
        group.register_to(&router).unwrap();
        let other = Rc::new(crate::focusable::FocusState::new());
        router.register_route(1, other.clone()).unwrap();

        let mut dispatcher = FocusDispatcher::new(());
        dispatcher.add_router(Rc::clone(&router));
        dispatcher.add_drag_group(Rc::clone(&group));

        dispatcher.pointer_moved(&scene, Point::new(5.0, 5.0));
        assert!(group.is_focused());
        dispatcher.pointer_pressed(&scene, PointerButtons::PRIMARY);
        assert!(group.is_being_dragged());

        dispatcher.pointer_moved(&scene, Point::new(55.0, 5.0));
        assert!(group.is_focused(), "held while dragging");
        assert!(other.is_focused(), "holding focus does not block other routes");

        let mut moved = Vec::new();
        dispatcher.tick(|_, delta| moved.push(delta));
        assert_eq!(moved, vec![Vec2::new(50.0, 0.0)]);
        assert!(group.is_focused());

        dispatcher.pointer_released(PointerButtons::PRIMARY);
        dispatcher.tick(|_, _| {});
        assert!(!group.is_focused(), "release ends focus without any motion");
    }

    #[test]
    fn secondary_press_does_not_drag() {
        let scene = Boxes(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let group = Rc::new(FocusableDragGroup::new([0_usize]));
        let mut dispatcher: FocusDispatcher<usize, ()> = FocusDispatcher::new(());
        dispatcher.add_drag_group(Rc::clone(&group));
        dispatcher.pointer_moved(&scene, Point::new(5.0, 5.0));
        dispatcher.pointer_pressed(&scene, PointerButtons::SECONDARY);
        assert!(!group.is_being_dragged());
    }

    #[test]
    fn press_query_honors_the_result_cap() {
        // The handle (1) is the second hit under the pointer.
        let scene = Boxes(vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let group = Rc::new(FocusableDragGroup::new([1_usize]));
        let mut dispatcher: FocusDispatcher<usize, ()> = FocusDispatcher::new(());
        assert_eq!(dispatcher.max_results(), RouterConfig::<()>::DEFAULT_MAX_RESULTS);
        dispatcher.set_max_results(1);
        dispatcher.add_drag_group(Rc::clone(&group));
        dispatcher.pointer_moved(&scene, Point::new(5.0, 5.0));

        dispatcher.pointer_pressed(&scene, PointerButtons::PRIMARY);
        assert!(!group.is_being_dragged());

        dispatcher.pointer_released(PointerButtons::PRIMARY);
        dispatcher.set_max_results(2);
        dispatcher.pointer_pressed(&scene, PointerButtons::PRIMARY);
        assert!(group.is_being_dragged());
    }
}
