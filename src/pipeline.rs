// src/pipeline.rs
//
// Ordered chain-of-responsibility of filters (each may consume an event,
// stopping propagation) plus an unordered set of spies (always notified,
// never consuming). Shared by all device redirects.
//
// Removal during dispatch is legal: filters request their own removal
// through the dispatch context, entries are tombstoned and swept after the
// iteration finishes, and the iteration itself walks indices so concurrent
// list growth cannot invalidate it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::cursor::CursorImageResolver;
use crate::event::{
    AxisEvent, ButtonEvent, GestureEndEvent, HoldBeginEvent, KeyEvent, ModifiersState,
    MotionEvent, PinchBeginEvent, PinchUpdateEvent, PointerButtons, SwipeBeginEvent,
    SwipeUpdateEvent, TabletToolAxisEvent, TabletToolButtonEvent, TabletToolProximityEvent,
    TabletToolTipEvent, TouchDownEvent, TouchMotionEvent, TouchUpEvent,
};
use crate::focus::FocusTarget;
use crate::geometry::Point;
use crate::selection::SelectionState;
use crate::space::Collaborators;
use crate::window::WindowRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpyHandle(u64);

/// Read-only view of the pointer redirect's state, snapshotted before each
/// dispatch so filters can base decisions on it without borrowing the
/// redirect itself.
#[derive(Debug, Clone, Default)]
pub struct PointerSnapshot {
    pub position: Point,
    pub focus: FocusTarget,
    pub at: Option<WindowRef>,
    pub buttons: PointerButtons,
    pub pressed_count: usize,
}

/// Context handed to spies and filters during a dispatch.
pub struct DispatchCtx<'a> {
    pub cx: &'a Collaborators,
    pub cursor: &'a Rc<RefCell<CursorImageResolver>>,
    pub selection: &'a Rc<RefCell<SelectionState>>,
    pub pointer: PointerSnapshot,
    pub mods: ModifiersState,
    uninstalls: Vec<FilterHandle>,
}

impl<'a> DispatchCtx<'a> {
    pub fn new(
        cx: &'a Collaborators,
        cursor: &'a Rc<RefCell<CursorImageResolver>>,
        selection: &'a Rc<RefCell<SelectionState>>,
        pointer: PointerSnapshot,
        mods: ModifiersState,
    ) -> Self {
        Self {
            cx,
            cursor,
            selection,
            pointer,
            mods,
            uninstalls: Vec::new(),
        }
    }

    /// Requests removal of a filter. Safe to call from inside the filter
    /// being dispatched; the removal takes effect once the current
    /// iteration finishes, and the filter is skipped for the remainder of
    /// the event.
    pub fn uninstall_filter(&mut self, handle: FilterHandle) {
        self.uninstalls.push(handle);
    }

    fn is_pending_uninstall(&self, handle: FilterHandle) -> bool {
        self.uninstalls.contains(&handle)
    }

    fn take_uninstalls(&mut self) -> Vec<FilterHandle> {
        std::mem::take(&mut self.uninstalls)
    }
}

/// Per-call bundle the router hands to a device redirect. The redirect
/// derives a [`DispatchCtx`] from it (refreshing the pointer snapshot after
/// its own state updates) before pushing the event through the pipeline.
pub struct RedirectCtx<'a> {
    pub cx: &'a Collaborators,
    pub cursor: &'a Rc<RefCell<CursorImageResolver>>,
    pub selection: &'a Rc<RefCell<SelectionState>>,
    pub mods: ModifiersState,
    /// Whether any touch point is currently down; suppresses pointer focus
    /// updates while true.
    pub touch_active: bool,
    pub pointer: PointerSnapshot,
}

impl<'a> RedirectCtx<'a> {
    pub fn dispatch_ctx(&self) -> DispatchCtx<'a> {
        DispatchCtx::new(
            self.cx,
            self.cursor,
            self.selection,
            self.pointer.clone(),
            self.mods,
        )
    }

    pub fn dispatch_ctx_with(&self, pointer: PointerSnapshot) -> DispatchCtx<'a> {
        DispatchCtx::new(self.cx, self.cursor, self.selection, pointer, self.mods)
    }
}

macro_rules! event_methods {
    ($ret:ty, $default:expr, $($name:ident: $ev:ty,)+) => {
        $(
            fn $name(&mut self, event: &$ev, ctx: &mut DispatchCtx<'_>) -> $ret {
                let _ = (event, ctx);
                $default
            }
        )+
    };
}

/// Ordered interceptor. Returning `true` consumes the event and stops
/// propagation; a filter not interested in a method inherits the
/// not-consumed default.
pub trait InputFilter {
    event_methods! { bool, false,
        pointer_motion: MotionEvent,
        pointer_button: ButtonEvent,
        pointer_axis: AxisEvent,
        key: KeyEvent,
        key_repeat: KeyEvent,
        touch_down: TouchDownEvent,
        touch_motion: TouchMotionEvent,
        touch_up: TouchUpEvent,
        swipe_begin: SwipeBeginEvent,
        swipe_update: SwipeUpdateEvent,
        swipe_end: GestureEndEvent,
        swipe_cancel: GestureEndEvent,
        pinch_begin: PinchBeginEvent,
        pinch_update: PinchUpdateEvent,
        pinch_end: GestureEndEvent,
        pinch_cancel: GestureEndEvent,
        hold_begin: HoldBeginEvent,
        hold_end: GestureEndEvent,
        tablet_tool_proximity: TabletToolProximityEvent,
        tablet_tool_tip: TabletToolTipEvent,
        tablet_tool_axis: TabletToolAxisEvent,
        tablet_tool_button: TabletToolButtonEvent,
    }
}

/// Unordered observer. Spies see every event exactly once, before the
/// filters run and regardless of whether a filter later consumes it.
pub trait InputSpy {
    event_methods! { (), (),
        pointer_motion: MotionEvent,
        pointer_button: ButtonEvent,
        pointer_axis: AxisEvent,
        key: KeyEvent,
        key_repeat: KeyEvent,
        touch_down: TouchDownEvent,
        touch_motion: TouchMotionEvent,
        touch_up: TouchUpEvent,
        swipe_begin: SwipeBeginEvent,
        swipe_update: SwipeUpdateEvent,
        swipe_end: GestureEndEvent,
        swipe_cancel: GestureEndEvent,
        pinch_begin: PinchBeginEvent,
        pinch_update: PinchUpdateEvent,
        pinch_end: GestureEndEvent,
        pinch_cancel: GestureEndEvent,
        hold_begin: HoldBeginEvent,
        hold_end: GestureEndEvent,
        tablet_tool_proximity: TabletToolProximityEvent,
        tablet_tool_tip: TabletToolTipEvent,
        tablet_tool_axis: TabletToolAxisEvent,
        tablet_tool_button: TabletToolButtonEvent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Normal,
    /// Reserved insertion point: runtime-appended filters land here, so the
    /// security- and mode-critical filters before it always run first.
    ForwardMarker,
    /// Reserved, replaceable slot for the interactive window-selector
    /// filter.
    SelectorSlot,
}

struct Entry {
    id: FilterHandle,
    role: Role,
    filter: Option<Box<dyn InputFilter>>,
    removed: bool,
}

#[derive(Default)]
pub struct Pipeline {
    entries: Vec<Entry>,
    spies: Vec<(SpyHandle, Box<dyn InputSpy>)>,
    next_id: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> FilterHandle {
        self.next_id += 1;
        FilterHandle(self.next_id)
    }

    /// Appends to the very end of the chain. Used while building the
    /// default chain; runtime additions go through [`append_filter`].
    ///
    /// [`append_filter`]: Pipeline::append_filter
    pub fn push(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        let id = self.next_handle();
        self.entries.push(Entry {
            id,
            role: Role::Normal,
            filter: Some(filter),
            removed: false,
        });
        id
    }

    pub fn push_forward_marker(&mut self) {
        let id = self.next_handle();
        self.entries.push(Entry {
            id,
            role: Role::ForwardMarker,
            filter: None,
            removed: false,
        });
    }

    pub fn push_selector_slot(&mut self) {
        let id = self.next_handle();
        self.entries.push(Entry {
            id,
            role: Role::SelectorSlot,
            filter: None,
            removed: false,
        });
    }

    /// Inserts at the reserved "before forward" marker, guaranteeing the
    /// security-critical filters installed ahead of the marker keep
    /// precedence over runtime additions. Falls back to the list end if no
    /// marker was built.
    pub fn append_filter(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        let id = self.next_handle();
        let entry = Entry {
            id,
            role: Role::Normal,
            filter: Some(filter),
            removed: false,
        };
        match self
            .entries
            .iter()
            .position(|e| e.role == Role::ForwardMarker)
        {
            Some(index) => self.entries.insert(index, entry),
            None => self.entries.push(entry),
        }
        debug!("pipeline: appended filter {:?} at forward marker", id);
        id
    }

    /// Inserts at the head of the chain, ahead of everything.
    pub fn prepend_filter(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        let id = self.next_handle();
        self.entries.insert(
            0,
            Entry {
                id,
                role: Role::Normal,
                filter: Some(filter),
                removed: false,
            },
        );
        debug!("pipeline: prepended filter {:?}", id);
        id
    }

    /// Fills the reserved window-selector slot, replacing whatever occupied
    /// it. Returns the handle of the installed filter.
    pub fn install_selector(&mut self, filter: Box<dyn InputFilter>) -> FilterHandle {
        let id = self.next_handle();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.role == Role::SelectorSlot) {
            entry.id = id;
            entry.filter = Some(filter);
            debug!("pipeline: selector slot filled, handle {:?}", id);
        } else {
            debug!("pipeline: no selector slot, pushing selector at head");
            return self.prepend_filter(filter);
        }
        id
    }

    /// Removes a filter. A selector-slot occupant is emptied out but the
    /// slot itself stays for the next installation.
    pub fn uninstall_filter(&mut self, handle: FilterHandle) {
        for entry in &mut self.entries {
            if entry.id != handle {
                continue;
            }
            match entry.role {
                Role::SelectorSlot => entry.filter = None,
                Role::Normal => entry.removed = true,
                Role::ForwardMarker => {}
            }
            debug!("pipeline: uninstalled filter {:?}", handle);
            break;
        }
        self.sweep();
    }

    pub fn add_spy(&mut self, spy: Box<dyn InputSpy>) -> SpyHandle {
        self.next_id += 1;
        let handle = SpyHandle(self.next_id);
        self.spies.push((handle, spy));
        handle
    }

    pub fn remove_spy(&mut self, handle: SpyHandle) {
        self.spies.retain(|(h, _)| *h != handle);
    }

    fn sweep(&mut self) {
        self.entries.retain(|e| !e.removed);
    }

    /// Core dispatch: all spies in registration order, then filters in list
    /// order until the first consumer. Returns whether any filter consumed.
    fn dispatch(
        &mut self,
        ctx: &mut DispatchCtx<'_>,
        mut spy_fn: impl FnMut(&mut dyn InputSpy, &mut DispatchCtx<'_>),
        mut filter_fn: impl FnMut(&mut dyn InputFilter, &mut DispatchCtx<'_>) -> bool,
    ) -> bool {
        for i in 0..self.spies.len() {
            spy_fn(&mut *self.spies[i].1, ctx);
        }
        let mut consumed = false;
        for i in 0..self.entries.len() {
            let entry = &mut self.entries[i];
            if entry.removed || ctx.is_pending_uninstall(entry.id) {
                continue;
            }
            let Some(filter) = entry.filter.as_mut() else {
                continue;
            };
            if filter_fn(&mut **filter, ctx) {
                trace!("pipeline: event consumed by filter {:?}", entry.id);
                consumed = true;
                break;
            }
        }
        for handle in ctx.take_uninstalls() {
            self.uninstall_filter(handle);
        }
        consumed
    }
}

macro_rules! dispatch_methods {
    ($($name:ident: $ev:ty,)+) => {
        impl Pipeline {
            $(
                pub fn $name(&mut self, event: &$ev, ctx: &mut DispatchCtx<'_>) -> bool {
                    self.dispatch(
                        ctx,
                        |spy, c| spy.$name(event, c),
                        |filter, c| filter.$name(event, c),
                    )
                }
            )+
        }
    };
}

dispatch_methods! {
    pointer_motion: MotionEvent,
    pointer_button: ButtonEvent,
    pointer_axis: AxisEvent,
    key: KeyEvent,
    key_repeat: KeyEvent,
    touch_down: TouchDownEvent,
    touch_motion: TouchMotionEvent,
    touch_up: TouchUpEvent,
    swipe_begin: SwipeBeginEvent,
    swipe_update: SwipeUpdateEvent,
    swipe_end: GestureEndEvent,
    swipe_cancel: GestureEndEvent,
    pinch_begin: PinchBeginEvent,
    pinch_update: PinchUpdateEvent,
    pinch_end: GestureEndEvent,
    pinch_cancel: GestureEndEvent,
    hold_begin: HoldBeginEvent,
    hold_end: GestureEndEvent,
    tablet_tool_proximity: TabletToolProximityEvent,
    tablet_tool_tip: TabletToolTipEvent,
    tablet_tool_axis: TabletToolAxisEvent,
    tablet_tool_button: TabletToolButtonEvent,
}
