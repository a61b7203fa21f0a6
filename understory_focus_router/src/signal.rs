// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications for [`Focusable`] state.
//!
//! Each focusable exposes three independent signals, one per observable flag
//! (see [`FocusChange`]). Listeners receive the focusable whose state was set,
//! so a router can subscribe the same callback to many endpoints and still tell
//! them apart.
//!
//! Emission is synchronous and re-entrant: the listener list is snapshotted
//! before any listener runs, so listeners may set state on other focusables
//! (causing nested emits) or connect and disconnect listeners while being
//! notified. Listeners connected during an emit are first called by the next one;
//! listeners disconnected during an emit are not called again, even by that emit.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::focusable::Focusable;

type Listener = Rc<dyn Fn(&dyn Focusable)>;

/// Which observable flag of a [`Focusable`] changed.
///
/// `focus_locked` has no signal: routers set it on every poll.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusChange {
    /// `is_focused` was set.
    Focus,
    /// `hold_focus` was set.
    HoldFocus,
    /// `sole_focus` was set.
    SoleFocus,
}

impl FocusChange {
    /// All three changes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Focus, Self::HoldFocus, Self::SoleFocus];
}

/// Handle returned by [`FocusSignal::connect`], used to disconnect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A list of listeners notified when one flag of a focusable is set.
#[derive(Default)]
pub struct FocusSignal {
    next_id: Cell<u64>,
    listeners: RefCell<SmallVec<[(ListenerId, Listener); 2]>>,
}

impl fmt::Debug for FocusSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusSignal")
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

impl FocusSignal {
    /// Create a signal with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is called on every subsequent [`emit`](Self::emit).
    pub fn connect(&self, listener: impl Fn(&dyn Focusable) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(other, _)| *other != id);
        listeners.len() != before
    }

    /// Notify every listener connected before this call, in connection order.
    ///
    /// A listener disconnected by an earlier listener of the same emit is skipped.
    pub fn emit(&self, source: &dyn Focusable) {
        let snapshot: SmallVec<[(ListenerId, Listener); 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            if self.is_connected(id) {
                listener(source);
            }
        }
    }

    fn is_connected(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|(other, _)| *other == id)
    }

    /// Number of connected listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether no listener is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three signals of a focusable, addressed by [`FocusChange`].
#[derive(Debug, Default)]
pub struct FocusSignals {
    focus: FocusSignal,
    hold_focus: FocusSignal,
    sole_focus: FocusSignal,
}

impl FocusSignals {
    /// The signal for `change`.
    pub fn get(&self, change: FocusChange) -> &FocusSignal {
        match change {
            FocusChange::Focus => &self.focus,
            FocusChange::HoldFocus => &self.hold_focus,
            FocusChange::SoleFocus => &self.sole_focus,
        }
    }
}
