// src/focus.rs
//
// Generic per-device-class focus record shared by the pointer, keyboard,
// touch and tablet redirects. The transition function is the single place
// where the leave-before-enter ordering and the idempotence guarantee are
// enforced; device-specific suppression rules (buttons held, drag active,
// selection modes) stay in the owning redirect.

use tracing::trace;

use crate::space::{DecorationId, PlatformWindowId};
use crate::window::WindowRef;

/// What a device is focused on. At most one variant is active per device
/// class; keyboard focus only ever uses `Window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    None,
    Window(WindowRef),
    Decoration(WindowRef, DecorationId),
    Internal(WindowRef, PlatformWindowId),
}

impl FocusTarget {
    pub fn window(&self) -> Option<WindowRef> {
        match self {
            FocusTarget::None => None,
            FocusTarget::Window(w)
            | FocusTarget::Decoration(w, _)
            | FocusTarget::Internal(w, _) => Some(*w),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FocusTarget::None)
    }
}

/// Focus plus "at" state for one device class. "At" is the window
/// geometrically under the device, independent of focus; updating it has no
/// side effects on its own.
#[derive(Debug, Default)]
pub struct FocusState {
    focus: FocusTarget,
    at: Option<WindowRef>,
}

impl FocusState {
    pub fn focus(&self) -> &FocusTarget {
        &self.focus
    }

    pub fn focused_window(&self) -> Option<WindowRef> {
        self.focus.window()
    }

    pub fn at(&self) -> Option<WindowRef> {
        self.at
    }

    /// Records the window under the device. Returns true if it changed.
    pub fn set_at(&mut self, at: Option<WindowRef>) -> bool {
        if self.at == at {
            return false;
        }
        trace!("focus: at changed {:?} -> {:?}", self.at, at);
        self.at = at;
        true
    }

    /// Applies a focus transition. If the target is unchanged nothing is
    /// emitted; otherwise `on_leave` runs for the old target strictly
    /// before `on_enter` runs for the new one, never interleaved.
    pub fn set_focus(
        &mut self,
        new: FocusTarget,
        mut on_leave: impl FnMut(&FocusTarget),
        mut on_enter: impl FnMut(&FocusTarget),
    ) -> bool {
        if self.focus == new {
            return false;
        }
        trace!("focus: {:?} -> {:?}", self.focus, new);
        let old = std::mem::replace(&mut self.focus, new);
        if !old.is_none() {
            on_leave(&old);
        }
        if !self.focus.is_none() {
            on_enter(&self.focus);
        }
        true
    }

    /// Forces focus to empty, used when the device loses capability, on
    /// forced resets, and when the focused window is removed.
    pub fn unset_focus(&mut self, mut on_leave: impl FnMut(&FocusTarget)) -> bool {
        if self.focus.is_none() {
            return false;
        }
        let old = std::mem::replace(&mut self.focus, FocusTarget::None);
        on_leave(&old);
        true
    }

    /// Drops every reference to a removed window. Focus held on the window
    /// is treated as an immediate unset; returns whether focus was cleared.
    pub fn clear_window(&mut self, window: &WindowRef, on_leave: impl FnMut(&FocusTarget)) -> bool {
        if self.at == Some(*window) {
            self.at = None;
        }
        if self.focus.window() == Some(*window) {
            self.unset_focus(on_leave)
        } else {
            false
        }
    }
}
