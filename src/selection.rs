// src/selection.rs
//
// Shared state for the interactive window/position selection modes. The
// router starts a mode, the window-selector filter (installed in the
// reserved pipeline slot) finishes it; both hold this state through an
// `Rc<RefCell<..>>`.

use crate::geometry::Point;
use crate::pipeline::FilterHandle;
use crate::window::WindowRef;

pub type WindowSelectionCallback = Box<dyn FnOnce(Option<WindowRef>)>;
pub type PointSelectionCallback = Box<dyn FnOnce(Option<Point>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Window,
    Position,
}

pub enum SelectionCallback {
    Window(WindowSelectionCallback),
    Position(PointSelectionCallback),
}

struct ActiveSelection {
    kind: SelectionKind,
    callback: Option<SelectionCallback>,
    filter: FilterHandle,
}

/// At most one selection mode is active at a time. The callback is invoked
/// exactly once, with the result or with the cancellation sentinel (`None`).
#[derive(Default)]
pub struct SelectionState {
    active: Option<ActiveSelection>,
    just_ended: bool,
}

impl SelectionState {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<SelectionKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn filter_handle(&self) -> Option<FilterHandle> {
        self.active.as_ref().map(|a| a.filter)
    }

    pub fn begin(&mut self, kind: SelectionKind, callback: SelectionCallback, filter: FilterHandle) {
        debug_assert!(self.active.is_none(), "selection mode started twice");
        self.active = Some(ActiveSelection {
            kind,
            callback: Some(callback),
            filter,
        });
    }

    /// Ends the mode, handing back the callback and filter handle so the
    /// caller can invoke the callback outside of any borrow of this state.
    pub fn take_active(&mut self) -> Option<(SelectionKind, SelectionCallback, FilterHandle)> {
        let mut active = self.active.take()?;
        self.just_ended = true;
        let callback = active.callback.take()?;
        Some((active.kind, callback, active.filter))
    }

    /// One-shot flag the router polls after each dispatch to restore the
    /// pointer focus that was suppressed during the mode.
    pub fn take_just_ended(&mut self) -> bool {
        std::mem::take(&mut self.just_ended)
    }
}
