// src/filters/lock_screen.rs

use tracing::trace;

use crate::event::{
    AxisEvent, ButtonEvent, GestureEndEvent, HoldBeginEvent, KeyEvent, MotionEvent,
    PinchBeginEvent, PinchUpdateEvent, SwipeBeginEvent, SwipeUpdateEvent, TouchDownEvent,
    TouchMotionEvent, TouchUpEvent,
};
use crate::pipeline::{DispatchCtx, InputFilter};
use crate::window::WindowRef;

/// While the session is locked, only lock-screen windows (the greeter)
/// receive input; everything else is swallowed here. Gestures never reach
/// clients under lock.
#[derive(Default)]
pub struct LockScreenFilter {
    /// Whether the in-flight touch sequence started on a permitted window.
    touch_permitted: bool,
}

impl LockScreenFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn permitted(ctx: &DispatchCtx<'_>, window: Option<WindowRef>) -> bool {
        window.map_or(false, |w| ctx.cx.space.is_lock_screen_window(&w))
    }

    fn pointer_permitted(ctx: &DispatchCtx<'_>) -> bool {
        Self::permitted(ctx, ctx.pointer.at)
    }

    fn keyboard_permitted(ctx: &DispatchCtx<'_>) -> bool {
        Self::permitted(ctx, ctx.cx.space.active_window())
    }
}

impl InputFilter for LockScreenFilter {
    fn pointer_motion(&mut self, _event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !Self::pointer_permitted(ctx)
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.lock.is_locked() {
            return false;
        }
        if Self::pointer_permitted(ctx) {
            return false;
        }
        trace!("lock screen swallowed button {:#x}", event.button);
        true
    }

    fn pointer_axis(&mut self, _event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !Self::pointer_permitted(ctx)
    }

    fn key(&mut self, _event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !Self::keyboard_permitted(ctx)
    }

    fn key_repeat(&mut self, _event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !Self::keyboard_permitted(ctx)
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.lock.is_locked() {
            self.touch_permitted = true;
            return false;
        }
        self.touch_permitted = Self::permitted(ctx, ctx.cx.space.window_at(event.position));
        !self.touch_permitted
    }

    fn touch_motion(&mut self, _event: &TouchMotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !self.touch_permitted
    }

    fn touch_up(&mut self, _event: &TouchUpEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked() && !self.touch_permitted
    }

    fn swipe_begin(&mut self, _event: &SwipeBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    fn swipe_update(&mut self, _event: &SwipeUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    fn swipe_end(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    // Cancellations pass even while locked: locking force-cancels the
    // in-flight gestures, and that cancel must reach the client that saw
    // the begin before the lock engaged.
    fn swipe_cancel(&mut self, _event: &GestureEndEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        false
    }

    fn pinch_begin(&mut self, _event: &PinchBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    fn pinch_update(&mut self, _event: &PinchUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    fn pinch_end(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    fn pinch_cancel(&mut self, _event: &GestureEndEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        false
    }

    fn hold_begin(&mut self, _event: &HoldBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.lock.is_locked()
    }

    // Hold has no cancel; its end doubles as one.
    fn hold_end(&mut self, _event: &GestureEndEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        false
    }
}
