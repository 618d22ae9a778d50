// src/tablet.rs
//
// Tablet redirect: tracks the pen tool (proximity, tip, absolute position)
// and pushes tool events through the pipeline. Compositors without a
// native tablet protocol consumer rely on the fallback filter at the end
// of the chain translating tool events into pointer input.

use tracing::trace;

use crate::event::{
    ButtonState, ProximityState, TabletToolAxisEvent, TabletToolButtonEvent,
    TabletToolProximityEvent, TabletToolTipEvent, TipState,
};
use crate::geometry::Point;
use crate::pipeline::{Pipeline, RedirectCtx};
use crate::window::WindowRef;

#[derive(Default)]
pub struct TabletRedirect {
    position: Point,
    in_proximity: bool,
    tip_down: bool,
    at: Option<WindowRef>,
}

impl TabletRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn in_proximity(&self) -> bool {
        self.in_proximity
    }

    pub fn tip_down(&self) -> bool {
        self.tip_down
    }

    pub fn at(&self) -> Option<WindowRef> {
        self.at
    }

    fn update_at(&mut self, rctx: &RedirectCtx<'_>) {
        let at = rctx.cx.space.window_at(self.position);
        if at != self.at {
            trace!("tablet: at {:?} -> {:?}", self.at, at);
            self.at = at;
        }
    }

    pub fn process_proximity(
        &mut self,
        position: Point,
        state: ProximityState,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.position = position;
        match state {
            ProximityState::In => {
                self.in_proximity = true;
                self.update_at(rctx);
            }
            ProximityState::Out => {
                self.in_proximity = false;
                self.tip_down = false;
                self.at = None;
            }
        }
        let event = TabletToolProximityEvent {
            position,
            state,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.tablet_tool_proximity(&event, &mut ctx);
    }

    pub fn process_tip(
        &mut self,
        position: Point,
        state: TipState,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.position = position;
        self.tip_down = state == TipState::Down;
        self.update_at(rctx);
        let event = TabletToolTipEvent {
            position,
            state,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.tablet_tool_tip(&event, &mut ctx);
    }

    pub fn process_axis(
        &mut self,
        position: Point,
        pressure: f64,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.position = position;
        // While the tip is down the tool behaves like a pressed pointer:
        // the target stays where the stroke began.
        if !self.tip_down {
            self.update_at(rctx);
        }
        let event = TabletToolAxisEvent {
            position,
            pressure,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.tablet_tool_axis(&event, &mut ctx);
    }

    pub fn process_button(
        &mut self,
        button: u32,
        state: ButtonState,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let event = TabletToolButtonEvent {
            button,
            state,
            time,
        };
        let mut ctx = rctx.dispatch_ctx();
        pipeline.tablet_tool_button(&event, &mut ctx);
    }

    pub fn window_removed(&mut self, window: &WindowRef) {
        if self.at == Some(*window) {
            self.at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cursor::CursorImageResolver;
    use crate::event::ModifiersState;
    use crate::geometry::Rect;
    use crate::pipeline::PointerSnapshot;
    use crate::selection::SelectionState;
    use crate::space::tests_support::TestEnv;
    use crate::space::Collaborators;

    struct Fixture {
        env: TestEnv,
        cx: Collaborators,
        cursor: Rc<RefCell<CursorImageResolver>>,
        selection: Rc<RefCell<SelectionState>>,
        pipeline: Pipeline,
        tablet: TabletRedirect,
    }

    fn fixture() -> Fixture {
        let env = TestEnv::new();
        let cx = env.collaborators();
        Fixture {
            env,
            cx,
            cursor: Rc::new(RefCell::new(CursorImageResolver::new())),
            selection: Rc::new(RefCell::new(SelectionState::default())),
            pipeline: Pipeline::new(),
            tablet: TabletRedirect::new(),
        }
    }

    macro_rules! rctx {
        ($f:expr) => {
            RedirectCtx {
                cx: &$f.cx,
                cursor: &$f.cursor,
                selection: &$f.selection,
                mods: ModifiersState::default(),
                touch_active: false,
                pointer: PointerSnapshot::default(),
            }
        };
    }

    #[test]
    fn proximity_tracks_the_window_underneath() {
        let mut f = fixture();
        let w = WindowRef::surface(1);
        f.env.space.add_window(w, Rect::new(0.0, 0.0, 100.0, 100.0));

        let ctx = rctx!(f);
        f.tablet.process_proximity(
            Point::new(50.0, 50.0),
            ProximityState::In,
            1,
            &mut f.pipeline,
            &ctx,
        );
        assert!(f.tablet.in_proximity());
        assert_eq!(f.tablet.at(), Some(w));

        f.tablet.process_proximity(
            Point::new(50.0, 50.0),
            ProximityState::Out,
            2,
            &mut f.pipeline,
            &ctx,
        );
        assert!(!f.tablet.in_proximity());
        assert_eq!(f.tablet.at(), None);
    }

    #[test]
    fn stroke_keeps_its_target_while_the_tip_is_down() {
        let mut f = fixture();
        let a = WindowRef::surface(1);
        let b = WindowRef::surface(2);
        f.env.space.add_window(a, Rect::new(0.0, 0.0, 100.0, 100.0));
        f.env
            .space
            .add_window(b, Rect::new(200.0, 0.0, 100.0, 100.0));

        let ctx = rctx!(f);
        f.tablet
            .process_tip(Point::new(50.0, 50.0), TipState::Down, 1, &mut f.pipeline, &ctx);
        assert_eq!(f.tablet.at(), Some(a));

        // Dragging the stroke over window b does not re-target.
        f.tablet
            .process_axis(Point::new(250.0, 50.0), 0.7, 2, &mut f.pipeline, &ctx);
        assert_eq!(f.tablet.at(), Some(a));

        f.tablet
            .process_tip(Point::new(250.0, 50.0), TipState::Up, 3, &mut f.pipeline, &ctx);
        assert_eq!(f.tablet.at(), Some(b));
    }

    #[test]
    fn window_removal_drops_the_reference() {
        let mut f = fixture();
        let w = WindowRef::surface(1);
        f.env.space.add_window(w, Rect::new(0.0, 0.0, 100.0, 100.0));

        let ctx = rctx!(f);
        f.tablet.process_proximity(
            Point::new(50.0, 50.0),
            ProximityState::In,
            1,
            &mut f.pipeline,
            &ctx,
        );
        assert_eq!(f.tablet.at(), Some(w));

        f.tablet.window_removed(&w);
        assert_eq!(f.tablet.at(), None);
    }
}
