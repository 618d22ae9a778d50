// src/filters/effects.rs

use crate::event::{
    AxisEvent, ButtonEvent, GestureEndEvent, HoldBeginEvent, KeyEvent, MotionEvent,
    PinchBeginEvent, PinchUpdateEvent, SwipeBeginEvent, SwipeUpdateEvent, TouchDownEvent,
    TouchMotionEvent, TouchUpEvent,
};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Hands input to a grabbing effect (overview, window picker animations).
/// When no effect grabs, this filter is transparent; while one does, the
/// effect sees everything and decides per event whether clients still do.
pub struct EffectsFilter;

impl InputFilter for EffectsFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.pointer_motion(event)
    }

    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.pointer_button(event)
    }

    fn pointer_axis(&mut self, event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.pointer_axis(event)
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.key(event)
    }

    fn key_repeat(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.key(event)
    }

    fn touch_down(&mut self, event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.touch_down(event)
    }

    fn touch_motion(&mut self, event: &TouchMotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.touch_motion(event)
    }

    fn touch_up(&mut self, event: &TouchUpEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input() && ctx.cx.effects.touch_up(event)
    }

    // A grabbing effect owns gestures wholesale.

    fn swipe_begin(&mut self, _event: &SwipeBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn swipe_update(&mut self, _event: &SwipeUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn swipe_end(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn swipe_cancel(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn pinch_begin(&mut self, _event: &PinchBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn pinch_update(&mut self, _event: &PinchUpdateEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn pinch_end(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn pinch_cancel(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn hold_begin(&mut self, _event: &HoldBeginEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }

    fn hold_end(&mut self, _event: &GestureEndEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.effects.is_grabbing_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cursor::CursorImageResolver;
    use crate::event::{ButtonState, ModifiersState, BTN_LEFT};
    use crate::pipeline::PointerSnapshot;
    use crate::selection::SelectionState;
    use crate::space::tests_support::TestEnv;

    #[test]
    fn grabbing_effect_receives_and_consumes_input() {
        let env = TestEnv::new();
        let cx = env.collaborators();
        let cursor = Rc::new(RefCell::new(CursorImageResolver::new()));
        let selection = Rc::new(RefCell::new(SelectionState::default()));
        let mut ctx = DispatchCtx::new(
            &cx,
            &cursor,
            &selection,
            PointerSnapshot::default(),
            ModifiersState::default(),
        );
        let mut filter = EffectsFilter;
        let press = ButtonEvent {
            button: BTN_LEFT,
            state: ButtonState::Pressed,
            time: 1,
        };

        assert!(!filter.pointer_button(&press, &mut ctx));
        assert!(env.effects.log.borrow().is_empty());

        env.effects.grabbing.set(true);
        assert!(filter.pointer_button(&press, &mut ctx));
        assert_eq!(*env.effects.log.borrow(), vec!["button 0x110"]);
    }
}
