// src/filters/decoration.rs

use crate::cursor::CursorImage;
use crate::event::{AxisEvent, ButtonEvent, MotionEvent};
use crate::focus::FocusTarget;
use crate::pipeline::{DispatchCtx, InputFilter};

/// Routes pointer input to server-side decorations when the pointer focus
/// sits on one. The decoration's cursor wish (resize arrows over edges) is
/// pushed into the resolver as it changes.
pub struct DecorationFilter;

impl InputFilter for DecorationFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        let FocusTarget::Decoration(window, decoration) = ctx.pointer.focus else {
            return false;
        };
        if let Some(icon) =
            ctx.cx
                .space
                .decoration_pointer_motion(&window, decoration, event.position)
        {
            ctx.cursor
                .borrow_mut()
                .set_decoration(Some(CursorImage::new(icon)));
        }
        true
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        let FocusTarget::Decoration(window, decoration) = ctx.pointer.focus else {
            return false;
        };
        ctx.cx
            .space
            .decoration_pointer_button(&window, decoration, event, ctx.pointer.position);
        true
    }

    fn pointer_axis(&mut self, event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        let FocusTarget::Decoration(window, decoration) = ctx.pointer.focus else {
            return false;
        };
        ctx.cx
            .space
            .decoration_pointer_axis(&window, decoration, event);
        true
    }
}
