// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Active input event tracking for update priority.

use std::cell::Cell;
use std::rc::Rc;

use canopy_host_port::EventPriority;

/// Input events the window glue reports while dispatching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Pointer button pressed.
    PointerDown,
    /// Pointer button released.
    PointerUp,
    /// Completed click or tap.
    Click,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Pointer moved.
    PointerMove,
    /// Wheel rotated.
    Wheel,
    /// Viewport scrolled.
    Scroll,
    /// Drag in progress.
    Drag,
}

impl InputEvent {
    /// Update priority for work triggered by this event.
    pub const fn priority(self) -> EventPriority {
        match self {
            Self::PointerDown | Self::PointerUp | Self::Click | Self::KeyDown | Self::KeyUp => {
                EventPriority::Discrete
            }
            Self::PointerMove | Self::Wheel | Self::Scroll | Self::Drag => {
                EventPriority::Continuous
            }
        }
    }
}

/// Shared slot holding the event currently being dispatched.
///
/// Clones observe the same slot.
#[derive(Clone, Debug, Default)]
pub struct EventSource {
    current: Rc<Cell<Option<InputEvent>>>,
}

impl EventSource {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Event being dispatched right now.
    pub fn current(&self) -> Option<InputEvent> {
        self.current.get()
    }

    /// Run `f` with `event` marked active, restoring the previous value after.
    pub fn dispatch<R>(&self, event: InputEvent, f: impl FnOnce() -> R) -> R {
        let previous = self.current.replace(Some(event));
        let out = f();
        self.current.set(previous);
        out
    }
}
