// src/filters/fake_tablet.rs

use crate::event::{
    ButtonState, TabletToolAxisEvent, TabletToolButtonEvent, TabletToolProximityEvent,
    TabletToolTipEvent, TipState, BTN_LEFT,
};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Fallback for tablet tools when no dedicated tablet consumer claimed the
/// event: the pen acts as a pointer. Tool motion becomes pointer motion,
/// the tip becomes the left button. Sits at the very end of the chain.
pub struct FakeTabletFilter;

impl InputFilter for FakeTabletFilter {
    fn tablet_tool_proximity(
        &mut self,
        event: &TabletToolProximityEvent,
        ctx: &mut DispatchCtx<'_>,
    ) -> bool {
        if event.state == crate::event::ProximityState::In {
            ctx.cx.seat.pointer_motion(event.position, event.time);
            ctx.cx.seat.pointer_frame();
        }
        true
    }

    fn tablet_tool_tip(&mut self, event: &TabletToolTipEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.seat.pointer_motion(event.position, event.time);
        let state = match event.state {
            TipState::Down => ButtonState::Pressed,
            TipState::Up => ButtonState::Released,
        };
        ctx.cx.seat.pointer_button(BTN_LEFT, state, event.time);
        ctx.cx.seat.pointer_frame();
        true
    }

    fn tablet_tool_axis(
        &mut self,
        event: &TabletToolAxisEvent,
        ctx: &mut DispatchCtx<'_>,
    ) -> bool {
        ctx.cx.seat.pointer_motion(event.position, event.time);
        ctx.cx.seat.pointer_frame();
        true
    }

    fn tablet_tool_button(
        &mut self,
        event: &TabletToolButtonEvent,
        ctx: &mut DispatchCtx<'_>,
    ) -> bool {
        ctx.cx.seat.pointer_button(event.button, event.state, event.time);
        ctx.cx.seat.pointer_frame();
        true
    }
}
