// src/filters/spies.rs

use std::cell::Cell;
use std::rc::Rc;

use crate::event::{
    ButtonEvent, KeyEvent, MotionEvent, TouchDownEvent, TouchMotionEvent, TouchUpEvent,
};
use crate::pipeline::{DispatchCtx, InputSpy};

/// Records the timestamp of the last user input, consumed or not. The
/// session layer reads it for idle detection.
pub struct ActivitySpy {
    last_activity: Rc<Cell<Option<u32>>>,
}

impl ActivitySpy {
    pub fn new(last_activity: Rc<Cell<Option<u32>>>) -> Self {
        Self { last_activity }
    }

    fn mark(&self, time: u32) {
        self.last_activity.set(Some(time));
    }
}

impl InputSpy for ActivitySpy {
    fn pointer_motion(&mut self, event: &MotionEvent, _ctx: &mut DispatchCtx<'_>) {
        self.mark(event.time);
    }

    fn pointer_button(&mut self, event: &ButtonEvent, _ctx: &mut DispatchCtx<'_>) {
        self.mark(event.time);
    }

    fn key(&mut self, event: &KeyEvent, _ctx: &mut DispatchCtx<'_>) {
        self.mark(event.time);
    }

    fn touch_down(&mut self, event: &TouchDownEvent, _ctx: &mut DispatchCtx<'_>) {
        self.mark(event.time);
    }

    fn touch_motion(&mut self, event: &TouchMotionEvent, _ctx: &mut DispatchCtx<'_>) {
        self.mark(event.time);
    }
}

/// Hides the cursor while touch is in use and shows it again on the next
/// pointer event. Purely a visibility toggle: the resolver keeps resolving
/// underneath.
pub struct TouchHidesCursorSpy;

impl InputSpy for TouchHidesCursorSpy {
    fn touch_down(&mut self, _event: &TouchDownEvent, ctx: &mut DispatchCtx<'_>) {
        ctx.cursor.borrow_mut().set_hidden(true);
    }

    fn pointer_motion(&mut self, _event: &MotionEvent, ctx: &mut DispatchCtx<'_>) {
        ctx.cursor.borrow_mut().set_hidden(false);
    }

    fn pointer_button(&mut self, _event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) {
        ctx.cursor.borrow_mut().set_hidden(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::cursor::{CursorIcon, CursorImageResolver};
    use crate::event::{ButtonState, ModifiersState, BTN_LEFT};
    use crate::geometry::Point;
    use crate::pipeline::PointerSnapshot;
    use crate::selection::SelectionState;
    use crate::space::tests_support::noop_collaborators;

    #[test]
    fn activity_spy_tracks_the_latest_timestamp() {
        let cx = noop_collaborators();
        let cursor = Rc::new(RefCell::new(CursorImageResolver::new()));
        let selection = Rc::new(RefCell::new(SelectionState::default()));
        let mut ctx = DispatchCtx::new(
            &cx,
            &cursor,
            &selection,
            PointerSnapshot::default(),
            ModifiersState::default(),
        );

        let cell = Rc::new(Cell::new(None));
        let mut spy = ActivitySpy::new(cell.clone());
        assert_eq!(cell.get(), None);

        spy.pointer_button(
            &ButtonEvent {
                button: BTN_LEFT,
                state: ButtonState::Pressed,
                time: 42,
            },
            &mut ctx,
        );
        assert_eq!(cell.get(), Some(42));
    }

    #[test]
    fn touch_hides_the_cursor_until_pointer_use() {
        let cx = noop_collaborators();
        let cursor = Rc::new(RefCell::new(CursorImageResolver::new()));
        let selection = Rc::new(RefCell::new(SelectionState::default()));
        let mut ctx = DispatchCtx::new(
            &cx,
            &cursor,
            &selection,
            PointerSnapshot::default(),
            ModifiersState::default(),
        );

        let mut spy = TouchHidesCursorSpy;
        spy.touch_down(
            &TouchDownEvent {
                id: 1,
                slot: 0,
                position: Point::ZERO,
                time: 1,
            },
            &mut ctx,
        );
        assert_eq!(cursor.borrow().current_image().icon, CursorIcon::Blank);

        spy.pointer_motion(
            &MotionEvent {
                delta: Point::ZERO,
                unaccelerated_delta: Point::ZERO,
                position: Point::ZERO,
                time: 2,
            },
            &mut ctx,
        );
        assert_eq!(cursor.borrow().current_image().icon, CursorIcon::Default);
    }
}
