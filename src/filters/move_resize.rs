// src/filters/move_resize.rs

use tracing::debug;

use crate::event::{
    AxisEvent, ButtonEvent, ButtonState, KeyEvent, KeyState, MotionEvent, KEY_ESC,
};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Active while the window manager runs an interactive move or resize.
/// Pointer motion drives the operation, releasing the last button commits
/// it, Escape aborts it; nothing reaches the window being moved.
pub struct MoveResizeFilter;

impl InputFilter for MoveResizeFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if ctx.cx.space.move_resize_window().is_none() {
            return false;
        }
        ctx.cx.space.update_move_resize(event.position);
        true
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if ctx.cx.space.move_resize_window().is_none() {
            return false;
        }
        if event.state == ButtonState::Released && ctx.pointer.pressed_count == 0 {
            debug!("interactive move/resize committed");
            ctx.cx.space.end_move_resize();
        }
        true
    }

    fn pointer_axis(&mut self, _event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.space.move_resize_window().is_some()
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if ctx.cx.space.move_resize_window().is_none() {
            return false;
        }
        if event.code == KEY_ESC && event.state == KeyState::Pressed {
            debug!("interactive move/resize aborted");
            ctx.cx.space.cancel_move_resize();
        }
        true
    }
}
