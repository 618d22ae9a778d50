// src/filters/drag_and_drop.rs

use tracing::debug;

use crate::event::{
    AxisEvent, ButtonEvent, ButtonState, KeyEvent, KeyState, MotionEvent, KEY_ESC,
};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Routes input into an active drag-and-drop session. While the seat
/// reports a drag, pointer input drives the drag target instead of the
/// normal focus, and Escape aborts the operation.
pub struct DragAndDropFilter;

impl InputFilter for DragAndDropFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.seat.is_drag_active() {
            return false;
        }
        let surface = ctx
            .pointer
            .at
            .and_then(|w| ctx.cx.space.surface(&w));
        ctx.cx.seat.set_drag_target(surface, event.position);
        ctx.cx.seat.drag_motion(event.position, event.time);
        true
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.seat.is_drag_active() {
            return false;
        }
        // The button table was updated before dispatch: zero pressed
        // buttons on a release means the drag source let go.
        if event.state == ButtonState::Released && ctx.pointer.pressed_count == 0 {
            debug!("drag: dropped at {:?}", ctx.pointer.position);
            ctx.cx.seat.drag_drop(event.time);
        }
        true
    }

    fn pointer_axis(&mut self, _event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.is_drag_active()
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.seat.is_drag_active() {
            return false;
        }
        if event.code == KEY_ESC && event.state == KeyState::Pressed {
            debug!("drag: cancelled by escape");
            ctx.cx.seat.drag_cancel();
        }
        true
    }
}
