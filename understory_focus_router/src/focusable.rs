// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focusable contract shared by every routing participant.
//!
//! ## State
//!
//! - `is_focused`: whether the participant currently accepts input. What being focused
//!   means is up to the implementer (skip its own input handling, disable a child
//!   region, and so on).
//! - `hold_focus`: a request not to be unfocused while focused. Callers should not call
//!   [`Focusable::unfocus`] on a participant that is [holding focus](Focusable::is_holding_focus).
//! - `sole_focus`: a request that nothing else gains focus while this participant is
//!   focused. Callers should not newly focus a sibling while any participant is
//!   [claiming sole focus](Focusable::is_claiming_sole_focus).
//! - `focus_locked`: set by a router that is continuously driving the participant.
//!   Participants should not unfocus themselves while focused and locked.
//!
//! These expectations are cooperative. Nothing enforces them at runtime; breaking
//! them is a bug in the caller.
//!
//! ## Notifications
//!
//! Setting `is_focused`, `hold_focus` or `sole_focus` always emits the matching
//! [`FocusChange`] signal, even when the value does not change. Setting `focus_locked`
//! never emits: routers set it repeatedly, so implementers that attach side effects to
//! it should compare against the previous value themselves.

use core::cell::Cell;
use core::fmt;

use crate::signal::{FocusChange, FocusSignal, FocusSignals};

/// A participant in focus routing.
///
/// The trait is object safe; routers store endpoints as `Rc<dyn Focusable>`.
/// Setters take `&self` so that notifications may re-enter the participant's
/// observers while the caller is still running.
pub trait Focusable {
    /// Whether the participant is focused.
    fn is_focused(&self) -> bool;
    /// Set focus and emit [`FocusChange::Focus`].
    fn set_focused(&self, focused: bool);

    /// Whether the participant asks to keep its focus.
    fn hold_focus(&self) -> bool;
    /// Set the hold request and emit [`FocusChange::HoldFocus`].
    fn set_hold_focus(&self, hold: bool);

    /// Whether the participant asks to be the only focused sibling.
    fn sole_focus(&self) -> bool;
    /// Set the sole request and emit [`FocusChange::SoleFocus`].
    fn set_sole_focus(&self, sole: bool);

    /// Whether a router is continuously driving this participant.
    fn focus_locked(&self) -> bool;
    /// Set the lock marker. Emits nothing.
    fn set_focus_locked(&self, locked: bool);

    /// The signal emitted when the given flag is set.
    fn signal(&self, change: FocusChange) -> &FocusSignal;

    /// Focus this participant.
    fn focus(&self) {
        self.set_focused(true);
    }

    /// Unfocus this participant.
    fn unfocus(&self) {
        self.set_focused(false);
    }

    /// Flip between focused and unfocused.
    fn toggle(&self) {
        self.set_focused(!self.is_focused());
    }

    /// `is_focused && hold_focus`.
    fn is_holding_focus(&self) -> bool {
        self.is_focused() && self.hold_focus()
    }

    /// `is_focused && sole_focus`.
    fn is_claiming_sole_focus(&self) -> bool {
        self.is_focused() && self.sole_focus()
    }
}

impl fmt::Debug for dyn Focusable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Focusable")
            .field("is_focused", &self.is_focused())
            .field("hold_focus", &self.hold_focus())
            .field("sole_focus", &self.sole_focus())
            .field("focus_locked", &self.focus_locked())
            .finish()
    }
}

/// Plain focusable state with notifications.
///
/// Use it directly as a route endpoint, or embed it in a component and forward the
/// [`Focusable`] methods to it. A standalone `FocusState` reports itself as the
/// notification source; crate types embedding it report themselves instead.
///
/// ```rust
/// use understory_focus_router::{FocusChange, FocusState, Focusable};
///
/// let state = FocusState::new();
/// state.signal(FocusChange::Focus).connect(|s| {
///     assert!(s.is_focused());
/// });
/// state.focus();
/// assert!(state.is_focused());
/// ```
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Cell<bool>,
    hold_focus: Cell<bool>,
    sole_focus: Cell<bool>,
    focus_locked: Cell<bool>,
    signals: FocusSignals,
}

impl FocusState {
    /// Unfocused state with every flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// State with initial flags, set without emitting.
    pub fn with_flags(focused: bool, hold_focus: bool, sole_focus: bool) -> Self {
        Self {
            focused: Cell::new(focused),
            hold_focus: Cell::new(hold_focus),
            sole_focus: Cell::new(sole_focus),
            ..Self::default()
        }
    }

    /// Set focus and notify with `source` as the changed endpoint.
    pub(crate) fn set_focused_from(&self, focused: bool, source: &dyn Focusable) {
        self.focused.set(focused);
        self.signals.get(FocusChange::Focus).emit(source);
    }

    pub(crate) fn set_hold_focus_from(&self, hold: bool, source: &dyn Focusable) {
        self.hold_focus.set(hold);
        self.signals.get(FocusChange::HoldFocus).emit(source);
    }

    pub(crate) fn set_sole_focus_from(&self, sole: bool, source: &dyn Focusable) {
        self.sole_focus.set(sole);
        self.signals.get(FocusChange::SoleFocus).emit(source);
    }
}

impl Focusable for FocusState {
    fn is_focused(&self) -> bool {
        self.focused.get()
    }

    fn set_focused(&self, focused: bool) {
        self.set_focused_from(focused, self);
    }

    fn hold_focus(&self) -> bool {
        self.hold_focus.get()
    }

    fn set_hold_focus(&self, hold: bool) {
        self.set_hold_focus_from(hold, self);
    }

    fn sole_focus(&self) -> bool {
        self.sole_focus.get()
    }

    fn set_sole_focus(&self, sole: bool) {
        self.set_sole_focus_from(sole, self);
    }

    fn focus_locked(&self) -> bool {
        self.focus_locked.get()
    }

    fn set_focus_locked(&self, locked: bool) {
        self.focus_locked.set(locked);
    }

    fn signal(&self, change: FocusChange) -> &FocusSignal {
        self.signals.get(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;

    fn counter(state: &FocusState, change: FocusChange) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        state.signal(change).connect(move |_| c.set(c.get() + 1));
        count
    }

    #[test]
    fn setters_always_notify() {
        let state = FocusState::new();
        let focus = counter(&state, FocusChange::Focus);
        let hold = counter(&state, FocusChange::HoldFocus);
        let sole = counter(&state, FocusChange::SoleFocus);

        state.unfocus();
        state.unfocus();
        state.set_hold_focus(false);
        state.set_sole_focus(true);
        state.set_sole_focus(true);

        assert_eq!(focus.get(), 2, "same-value writes still notify");
        assert_eq!(hold.get(), 1);
        assert_eq!(sole.get(), 2);
    }

    #[test]
    fn focus_lock_is_silent() {
        let state = FocusState::new();
        let focus = counter(&state, FocusChange::Focus);
        let hold = counter(&state, FocusChange::HoldFocus);
        let sole = counter(&state, FocusChange::SoleFocus);

        state.set_focus_locked(true);
        state.set_focus_locked(false);

        assert!(!state.focus_locked());
        assert_eq!(focus.get() + hold.get() + sole.get(), 0);
    }

    #[test]
    fn focus_unfocus_toggle() {
        let state = FocusState::new();
        let focus = counter(&state, FocusChange::Focus);
        state.focus();
        assert!(state.is_focused());
        state.toggle();
        assert!(!state.is_focused());
        state.toggle();
        assert!(state.is_focused());
        state.unfocus();
        assert!(!state.is_focused());
        assert_eq!(focus.get(), 4);
    }

    #[test]
    fn derived_predicates() {
        let state = FocusState::with_flags(false, true, true);
        assert!(!state.is_holding_focus());
        assert!(!state.is_claiming_sole_focus());
        state.focus();
        assert!(state.is_holding_focus());
        assert!(state.is_claiming_sole_focus());
    }
}
