// src/filters/forward.rs

use crate::event::{
    AxisEvent, ButtonEvent, GestureEndEvent, HoldBeginEvent, KeyEvent, MotionEvent,
    PinchBeginEvent, PinchUpdateEvent, SwipeBeginEvent, SwipeUpdateEvent, TouchDownEvent,
    TouchMotionEvent, TouchUpEvent,
};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Terminal filter: whatever reaches it goes to the focused client through
/// the seat. It always consumes, so nothing falls off the end of the chain.
/// Frame markers are not emitted here; the owning redirect closes every
/// batch after dispatch, consumed or not.
pub struct ForwardFilter;

impl InputFilter for ForwardFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.pointer_motion(event.position, event.time);
        true
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.pointer_button(event.button, event.state, event.time);
        true
    }

    fn pointer_axis(&mut self, event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.pointer_axis(
            event.orientation,
            event.delta,
            event.v120,
            event.source,
            event.time,
        );
        true
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.keyboard_key(event.code, event.state, event.time);
        true
    }

    fn key_repeat(&mut self, _event: &KeyEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        // Wayland clients repeat locally from the advertised repeat info;
        // forwarding the synthetic repeat would double it up.
        true
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.touch_down(event.slot, event.position, event.time);
        true
    }

    fn touch_motion(&mut self, event: &TouchMotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.touch_motion(event.slot, event.position, event.time);
        true
    }

    fn touch_up(&mut self, event: &TouchUpEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.touch_up(event.slot, event.time);
        true
    }

    fn swipe_begin(&mut self, event: &SwipeBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_swipe_begin(event.fingers, event.time);
        true
    }

    fn swipe_update(&mut self, event: &SwipeUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_swipe_update(event.delta, event.time);
        true
    }

    fn swipe_end(&mut self, event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_swipe_end(event.time);
        true
    }

    fn swipe_cancel(&mut self, event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_swipe_cancel(event.time);
        true
    }

    fn pinch_begin(&mut self, event: &PinchBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_pinch_begin(event.fingers, event.time);
        true
    }

    fn pinch_update(&mut self, event: &PinchUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx
            .seat
            .gesture_pinch_update(event.delta, event.scale, event.rotation, event.time);
        true
    }

    fn pinch_end(&mut self, event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_pinch_end(event.time);
        true
    }

    fn pinch_cancel(&mut self, event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_pinch_cancel(event.time);
        true
    }

    fn hold_begin(&mut self, event: &HoldBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_hold_begin(event.fingers, event.time);
        true
    }

    fn hold_end(&mut self, event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.gesture_hold_end(event.time);
        true
    }
}
