// src/filters/internal_window.rs

use std::collections::HashMap;

use crate::event::{
    AxisEvent, ButtonEvent, KeyEvent, MotionEvent, TouchDownEvent, TouchMotionEvent, TouchUpEvent,
};
use crate::focus::FocusTarget;
use crate::pipeline::{DispatchCtx, InputFilter};
use crate::space::PlatformWindowId;
use crate::window::WindowKind;

/// Delivers input to compositor-internal UI windows (OSDs, the debug
/// console). Delivery is offered, not forced: a window that does not
/// accept the event lets it continue down the chain.
#[derive(Default)]
pub struct InternalWindowFilter {
    /// Seat slot -> internal window for touch sequences accepted at down.
    active_touches: HashMap<i32, PlatformWindowId>,
}

impl InternalWindowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn pointer_target(ctx: &DispatchCtx<'_>) -> Option<PlatformWindowId> {
        match ctx.pointer.focus {
            FocusTarget::Internal(_, handle) => Some(handle),
            _ => None,
        }
    }

    fn keyboard_target(ctx: &DispatchCtx<'_>) -> Option<PlatformWindowId> {
        let active = ctx.cx.space.active_window()?;
        if active.kind != WindowKind::Internal {
            return None;
        }
        ctx.cx.space.internal_handle(&active)
    }
}

impl InputFilter for InternalWindowFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match Self::pointer_target(ctx) {
            Some(handle) => ctx.cx.internal.pointer_motion(handle, event),
            None => false,
        }
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match Self::pointer_target(ctx) {
            Some(handle) => ctx.cx.internal.pointer_button(handle, event),
            None => false,
        }
    }

    fn pointer_axis(&mut self, event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match Self::pointer_target(ctx) {
            Some(handle) => ctx.cx.internal.pointer_axis(handle, event),
            None => false,
        }
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match Self::keyboard_target(ctx) {
            Some(handle) => ctx.cx.internal.key(handle, event),
            None => false,
        }
    }

    fn key_repeat(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match Self::keyboard_target(ctx) {
            Some(handle) => ctx.cx.internal.key(handle, event),
            None => false,
        }
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        let Some(window) = ctx.cx.space.window_at(event.position) else {
            return false;
        };
        let Some(handle) = ctx.cx.space.internal_handle(&window) else {
            return false;
        };
        if ctx.cx.internal.touch_down(handle, event) {
            self.active_touches.insert(event.slot, handle);
            true
        } else {
            false
        }
    }

    fn touch_motion(&mut self, event: &TouchMotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match self.active_touches.get(&event.slot) {
            Some(handle) => ctx.cx.internal.touch_motion(*handle, event),
            None => false,
        }
    }

    fn touch_up(&mut self, event: &TouchUpEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        match self.active_touches.remove(&event.slot) {
            Some(handle) => ctx.cx.internal.touch_up(handle, event),
            None => false,
        }
    }
}
