// src/touch.rs
//
// Touch redirect: maps device-reported touch ids onto stable seat slots and
// tracks the touch focus. The whole sequence is bound to the window the
// first finger landed on; later fingers never re-target.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::event::{TouchDownEvent, TouchMotionEvent, TouchUpEvent};
use crate::focus::{FocusState, FocusTarget};
use crate::geometry::Point;
use crate::pipeline::{Pipeline, RedirectCtx};
use crate::window::WindowRef;

#[derive(Default)]
pub struct TouchRedirect {
    /// Device id -> seat slot for every finger currently down.
    id_map: HashMap<i32, i32>,
    focus: FocusState,
}

impl TouchRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_active(&self) -> bool {
        !self.id_map.is_empty()
    }

    pub fn focused_window(&self) -> Option<WindowRef> {
        self.focus.focused_window()
    }

    // Lowest free slot, so slots stay dense and released ones are reused.
    fn allocate_slot(&self) -> i32 {
        let mut slot = 0;
        while self.id_map.values().any(|s| *s == slot) {
            slot += 1;
        }
        slot
    }

    pub fn process_down(
        &mut self,
        id: i32,
        position: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        if self.id_map.contains_key(&id) {
            trace!("touch: duplicate down for id {}, dropped", id);
            return;
        }
        let slot = self.allocate_slot();
        let first = self.id_map.is_empty();
        self.id_map.insert(id, slot);
        if first {
            let target = rctx
                .cx
                .space
                .window_at(position)
                .map(FocusTarget::Window)
                .unwrap_or_default();
            self.focus.set_at(target.window());
            self.apply_focus(target, position, rctx);
        }
        let event = TouchDownEvent {
            id,
            slot,
            position,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.touch_down(&event, &mut ctx);
        // The frame closes the batch whether or not a filter consumed it.
        rctx.cx.seat.touch_frame();
    }

    pub fn process_motion(
        &mut self,
        id: i32,
        position: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let Some(slot) = self.id_map.get(&id).copied() else {
            trace!("touch: motion for unknown id {}, dropped", id);
            return;
        };
        let event = TouchMotionEvent {
            id,
            slot,
            position,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.touch_motion(&event, &mut ctx);
        rctx.cx.seat.touch_frame();
    }

    pub fn process_up(
        &mut self,
        id: i32,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let Some(slot) = self.id_map.remove(&id) else {
            trace!("touch: up for unknown id {}, dropped", id);
            return;
        };
        let event = TouchUpEvent { id, slot, time };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.touch_up(&event, &mut ctx);
        rctx.cx.seat.touch_frame();
        if self.id_map.is_empty() {
            self.unset_focus(rctx);
        }
    }

    /// Aborts the whole sequence: every finger is forgotten and the seat is
    /// told to cancel, so clients drop their in-progress touch state.
    pub fn cancel(&mut self, rctx: &RedirectCtx<'_>) {
        if self.id_map.is_empty() && self.focus.focus().is_none() {
            return;
        }
        debug!("touch: sequence cancelled, {} fingers", self.id_map.len());
        self.id_map.clear();
        rctx.cx.seat.touch_cancel();
        self.unset_focus(rctx);
    }

    pub fn window_removed(&mut self, window: &WindowRef, rctx: &RedirectCtx<'_>) {
        if self.focus.focused_window() == Some(*window) {
            // The sequence target is gone; the remaining fingers cannot be
            // re-routed, so the sequence is cancelled as a whole.
            self.cancel(rctx);
        } else {
            self.focus.clear_window(window, |_| {});
        }
    }

    fn apply_focus(&mut self, new: FocusTarget, position: Point, rctx: &RedirectCtx<'_>) {
        if *self.focus.focus() == new {
            return;
        }
        let surface = new.window().and_then(|w| rctx.cx.space.surface(&w));
        rctx.cx.seat.set_focused_touch_surface(surface, position);
        self.focus.set_focus(new, |_| {}, |_| {});
    }

    pub fn unset_focus(&mut self, rctx: &RedirectCtx<'_>) {
        let cx = rctx.cx;
        self.focus
            .unset_focus(|_| cx.seat.set_focused_touch_surface(None, Point::ZERO));
    }
}
