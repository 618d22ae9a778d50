// src/filters/window_selector.rs

use tracing::debug;

use crate::event::{
    AxisEvent, ButtonEvent, ButtonState, KeyEvent, KeyState, MotionEvent, TouchDownEvent,
    TouchMotionEvent, TouchUpEvent, BTN_LEFT, BTN_RIGHT, KEY_ESC,
};
use crate::geometry::Point;
use crate::pipeline::{DispatchCtx, InputFilter};
use crate::selection::SelectionCallback;
use crate::window::WindowRef;

/// Occupies the reserved selector slot while an interactive window or
/// position selection runs. All pointer, key and touch input belongs to
/// the mode: left press picks, right press and Escape cancel, nothing
/// leaks to clients.
pub struct WindowSelectorFilter;

enum Outcome {
    Picked(Option<WindowRef>, Point),
    Cancelled,
}

fn finish(ctx: &mut DispatchCtx<'_>, outcome: Outcome) {
    let taken = ctx.selection.borrow_mut().take_active();
    let Some((kind, callback, handle)) = taken else {
        return;
    };
    debug!("interactive {:?} selection finished", kind);
    // The callback runs outside any borrow of the selection state, so it
    // may start a new selection right away.
    match callback {
        SelectionCallback::Window(cb) => match outcome {
            Outcome::Picked(window, _) => cb(window),
            Outcome::Cancelled => cb(None),
        },
        SelectionCallback::Position(cb) => match outcome {
            Outcome::Picked(_, position) => cb(Some(position)),
            Outcome::Cancelled => cb(None),
        },
    }
    ctx.cursor.borrow_mut().set_selection_active(false);
    ctx.uninstall_filter(handle);
}

impl InputFilter for WindowSelectorFilter {
    fn pointer_motion(&mut self, _event: &MotionEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        true
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if event.state == ButtonState::Pressed {
            match event.button {
                BTN_LEFT => {
                    let outcome = Outcome::Picked(ctx.pointer.at, ctx.pointer.position);
                    finish(ctx, outcome);
                }
                BTN_RIGHT => finish(ctx, Outcome::Cancelled),
                _ => {}
            }
        }
        true
    }

    fn pointer_axis(&mut self, _event: &AxisEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        true
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if event.code == KEY_ESC && event.state == KeyState::Pressed {
            finish(ctx, Outcome::Cancelled);
        }
        true
    }

    fn key_repeat(&mut self, _event: &KeyEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        true
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        let window = ctx.cx.space.window_at(event.position);
        finish(ctx, Outcome::Picked(window, event.position));
        true
    }

    fn touch_motion(&mut self, _event: &TouchMotionEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        true
    }

    fn touch_up(&mut self, _event: &TouchUpEvent, _ctx: &mut DispatchCtx<'_>) -> bool {
        true
    }
}
