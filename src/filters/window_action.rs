// src/filters/window_action.rs

use crate::event::{ButtonEvent, ButtonState, TouchDownEvent};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Click-to-activate. A press over an inactive window asks the window
/// manager to activate it; the press itself always continues to the
/// window, so activation never eats the click.
pub struct WindowActionFilter;

impl InputFilter for WindowActionFilter {
    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if event.state != ButtonState::Pressed {
            return false;
        }
        if let Some(at) = ctx.pointer.at {
            if !ctx.cx.space.is_active(&at) {
                ctx.cx.space.request_activation(&at);
            }
        }
        false
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if let Some(window) = ctx.cx.space.window_at(event.position) {
            if !ctx.cx.space.is_active(&window) {
                ctx.cx.space.request_activation(&window);
            }
        }
        false
    }
}
