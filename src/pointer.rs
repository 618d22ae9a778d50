// src/pointer.rs
//
// Pointer redirect: owns the global pointer position, the pressed-button
// table, the pointer focus, and the surface-declared confinement/lock
// state. Every pointer event funnels through here before it reaches the
// filter pipeline.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::PointerConfig;
use crate::cursor::{CursorIcon, CursorImage};
use crate::event::{
    button_flag, AxisEvent, AxisOrientation, AxisSource, ButtonEvent, ButtonState,
    GestureEndEvent, HoldBeginEvent, MotionEvent, PinchBeginEvent, PinchUpdateEvent,
    PointerButtons, SwipeBeginEvent, SwipeUpdateEvent,
};
use crate::focus::{FocusState, FocusTarget};
use crate::geometry::{confine_to_outputs, Point};
use crate::motion::MotionScheduler;
use crate::pipeline::{Pipeline, PointerSnapshot, RedirectCtx};
use crate::window::WindowRef;

pub struct PointerRedirect {
    config: PointerConfig,
    position: Point,
    pressed: HashSet<u32>,
    focus: FocusState,
    scheduler: MotionScheduler,
    confined: bool,
    locked: bool,
    constraint_owner: Option<WindowRef>,
    active_swipe: Option<u32>,
    active_pinch: Option<u32>,
    active_hold: Option<u32>,
    last_time: u32,
}

impl PointerRedirect {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            position: Point::ZERO,
            pressed: HashSet::new(),
            focus: FocusState::default(),
            scheduler: MotionScheduler::default(),
            confined: false,
            locked: false,
            constraint_owner: None,
            active_swipe: None,
            active_pinch: None,
            active_hold: None,
            last_time: 0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn focus(&self) -> &FocusTarget {
        self.focus.focus()
    }

    pub fn focused_window(&self) -> Option<WindowRef> {
        self.focus.focused_window()
    }

    pub fn at(&self) -> Option<WindowRef> {
        self.focus.at()
    }

    pub fn is_confined(&self) -> bool {
        self.confined
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_pressed_buttons(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub fn pressed_buttons(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.pressed.iter().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Combined mask over the per-code button table.
    pub fn button_states(&self) -> PointerButtons {
        let mut buttons = PointerButtons::empty();
        for code in &self.pressed {
            buttons |= button_flag(*code);
        }
        buttons
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            position: self.position,
            focus: *self.focus.focus(),
            at: self.focus.at(),
            buttons: self.button_states(),
            pressed_count: self.pressed.len(),
        }
    }

    /// Relative motion from the device layer. Acceleration applies to the
    /// routed delta; the unaccelerated delta is carried alongside for
    /// consumers that want raw relative motion.
    pub fn process_motion(
        &mut self,
        delta: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let accelerated = delta * (1.0 + self.config.acceleration_factor);
        self.motion_internal(accelerated, delta, time, pipeline, rctx);
    }

    /// Absolute motion, normalized device coordinates in `[0, 1]` mapped
    /// onto the bounding box of all outputs. No acceleration.
    pub fn process_motion_absolute(
        &mut self,
        normalized: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let outputs = rctx.cx.outputs.output_geometries();
        let Some(first) = outputs.first() else {
            return;
        };
        let union = outputs.iter().skip(1).fold(*first, |acc, o| acc.united(o));
        let target = Point::new(
            union.x + normalized.x.clamp(0.0, 1.0) * union.width,
            union.y + normalized.y.clamp(0.0, 1.0) * union.height,
        );
        let delta = target - self.position;
        self.motion_internal(delta, delta, time, pipeline, rctx);
    }

    /// Programmatic warp. Goes through the same motion path, so output
    /// clamping and confinement apply and a lock rejects it.
    pub fn warp(
        &mut self,
        target: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        if self.locked {
            debug!("pointer: warp to {:?} rejected while locked", target);
            return;
        }
        let delta = target - self.position;
        self.motion_internal(delta, delta, time, pipeline, rctx);
    }

    /// Reentrancy-safe motion core. A motion arriving while one is in
    /// flight is deferred through the scheduler and replayed (coalesced,
    /// latest wins) once the current one finishes.
    fn motion_internal(
        &mut self,
        delta: Point,
        unaccelerated: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        if self.scheduler.is_locked() {
            self.scheduler.schedule(delta, unaccelerated, time);
            return;
        }
        self.scheduler.lock();
        self.last_time = time;
        self.update_position(self.position + delta, rctx);
        self.update(rctx);
        let event = MotionEvent {
            delta,
            unaccelerated_delta: unaccelerated,
            position: self.position,
            time,
        };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pointer_motion(&event, &mut ctx);
        // The frame closes the batch whether or not a filter consumed it.
        rctx.cx.seat.pointer_frame();
        if let Some(pending) = self.scheduler.unlock() {
            trace!("pointer: replaying deferred motion");
            self.motion_internal(
                pending.delta,
                pending.unaccelerated_delta,
                pending.time,
                pipeline,
                rctx,
            );
        }
    }

    pub fn process_button(
        &mut self,
        button: u32,
        state: ButtonState,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.last_time = time;
        match state {
            ButtonState::Pressed => {
                self.pressed.insert(button);
                // Focus is settled before the press is routed, so the
                // press goes to the window now under the pointer.
                self.update(rctx);
            }
            ButtonState::Released => {
                self.pressed.remove(&button);
            }
        }
        let event = ButtonEvent {
            button,
            state,
            time,
        };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pointer_button(&event, &mut ctx);
        rctx.cx.seat.pointer_frame();
        if state == ButtonState::Released {
            // Releasing the last button may unblock a pending focus change.
            self.update(rctx);
        }
    }

    pub fn process_axis(
        &mut self,
        orientation: AxisOrientation,
        delta: f64,
        v120: i32,
        source: AxisSource,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.last_time = time;
        let mut delta = delta * self.config.scroll_factor;
        let mut v120 = (v120 as f64 * self.config.scroll_factor) as i32;
        if self.config.natural_scrolling {
            delta = -delta;
            v120 = -v120;
        }
        self.update(rctx);
        let event = AxisEvent {
            orientation,
            delta,
            v120,
            source,
            time,
        };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pointer_axis(&event, &mut ctx);
        rctx.cx.seat.pointer_frame();
    }

    // Gestures route through the pipeline without refreshing focus: the
    // target was settled when the gesture began.

    pub fn process_swipe_begin(
        &mut self,
        fingers: u32,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_swipe = Some(fingers);
        let event = SwipeBeginEvent { fingers, time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.swipe_begin(&event, &mut ctx);
    }

    pub fn process_swipe_update(
        &mut self,
        delta: Point,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let event = SwipeUpdateEvent { delta, time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.swipe_update(&event, &mut ctx);
    }

    pub fn process_swipe_end(
        &mut self,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_swipe = None;
        let event = GestureEndEvent { time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.swipe_end(&event, &mut ctx);
    }

    pub fn process_swipe_cancel(
        &mut self,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_swipe = None;
        let event = GestureEndEvent { time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.swipe_cancel(&event, &mut ctx);
    }

    pub fn process_pinch_begin(
        &mut self,
        fingers: u32,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_pinch = Some(fingers);
        let event = PinchBeginEvent { fingers, time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pinch_begin(&event, &mut ctx);
    }

    pub fn process_pinch_update(
        &mut self,
        delta: Point,
        scale: f64,
        rotation: f64,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        let event = PinchUpdateEvent {
            delta,
            scale,
            rotation,
            time,
        };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pinch_update(&event, &mut ctx);
    }

    pub fn process_pinch_end(
        &mut self,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_pinch = None;
        let event = GestureEndEvent { time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pinch_end(&event, &mut ctx);
    }

    pub fn process_pinch_cancel(
        &mut self,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_pinch = None;
        let event = GestureEndEvent { time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.pinch_cancel(&event, &mut ctx);
    }

    pub fn process_hold_begin(
        &mut self,
        fingers: u32,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_hold = Some(fingers);
        let event = HoldBeginEvent { fingers, time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.hold_begin(&event, &mut ctx);
    }

    pub fn process_hold_end(
        &mut self,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        self.active_hold = None;
        let event = GestureEndEvent { time };
        let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
        pipeline.hold_end(&event, &mut ctx);
    }

    /// Force-ends every in-flight gesture by synthesizing the matching
    /// cancel (hold has no cancel, it ends). Used on screen lock and on
    /// pointer capability loss, so no consumer is left holding a gesture
    /// that will never finish.
    pub fn cancel_gestures(&mut self, time: u32, pipeline: &mut Pipeline, rctx: &RedirectCtx<'_>) {
        if self.active_swipe.take().is_some() {
            let event = GestureEndEvent { time };
            let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
            pipeline.swipe_cancel(&event, &mut ctx);
        }
        if self.active_pinch.take().is_some() {
            let event = GestureEndEvent { time };
            let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
            pipeline.pinch_cancel(&event, &mut ctx);
        }
        if self.active_hold.take().is_some() {
            let event = GestureEndEvent { time };
            let mut ctx = rctx.dispatch_ctx_with(self.snapshot());
            pipeline.hold_end(&event, &mut ctx);
        }
    }

    /// Re-clamps the position against the current output layout and
    /// refreshes focus, without synthesizing a motion event. Used when the
    /// output topology changes under a stationary pointer.
    pub fn revalidate(&mut self, rctx: &RedirectCtx<'_>) {
        if !self.locked {
            self.update_position(self.position, rctx);
        }
        self.update(rctx);
    }

    /// Moves the pointer to `proposed`, applying output clamping and, when
    /// confinement is active, the confinement region. Returns whether the
    /// position changed. A locked pointer never moves.
    fn update_position(&mut self, proposed: Point, rctx: &RedirectCtx<'_>) -> bool {
        if self.locked {
            trace!("pointer: position update rejected while locked");
            return false;
        }
        let outputs = rctx.cx.outputs.output_geometries();
        let mut target = confine_to_outputs(proposed, &outputs);
        if self.confined {
            if let Some(owner) = self.constraint_owner {
                if let Some(region) = rctx.cx.space.confine_region(&owner) {
                    if !region.contains(target) {
                        // Diagonal escape: hold one axis at the previous
                        // position and accept the other if that stays in.
                        let hold_x = Point::new(self.position.x, target.y);
                        let hold_y = Point::new(target.x, self.position.y);
                        if region.contains(hold_x) {
                            target = hold_x;
                        } else if region.contains(hold_y) {
                            target = hold_y;
                        } else {
                            return false;
                        }
                    }
                }
            }
        }
        if target == self.position {
            return false;
        }
        self.position = target;
        true
    }

    fn focus_blocked(&self, rctx: &RedirectCtx<'_>) -> bool {
        !self.pressed.is_empty()
            || rctx.cx.seat.is_drag_active()
            || rctx.selection.borrow().is_active()
            || rctx.touch_active
    }

    /// Re-derives "at" and (unless blocked) the pointer focus from the
    /// current position, then revalidates constraints. Call after anything
    /// that may have changed what is under the pointer.
    pub fn update(&mut self, rctx: &RedirectCtx<'_>) {
        let at = rctx.cx.space.window_at(self.position);
        self.focus.set_at(at);
        if self.focus_blocked(rctx) {
            return;
        }
        let new_target = match at {
            None => FocusTarget::None,
            Some(window) => {
                if let Some(decoration) = rctx.cx.space.decoration_at(&window, self.position) {
                    FocusTarget::Decoration(window, decoration)
                } else if let Some(handle) = rctx.cx.space.internal_handle(&window) {
                    FocusTarget::Internal(window, handle)
                } else {
                    FocusTarget::Window(window)
                }
            }
        };
        self.apply_focus(new_target, rctx);
        self.update_constraints(rctx);
    }

    fn apply_focus(&mut self, new: FocusTarget, rctx: &RedirectCtx<'_>) {
        let old = *self.focus.focus();
        if old == new {
            return;
        }
        let cx = rctx.cx;
        let position = self.position;
        if let (FocusTarget::Window(_), FocusTarget::Window(w)) = (&old, &new) {
            // Surface-to-surface handover is one focus reassignment on the
            // seat, not a leave followed by an enter.
            cx.seat
                .set_focused_pointer_surface(cx.space.surface(w), position);
            self.focus.set_focus(new, |_| {}, |_| {});
        } else {
            self.focus.set_focus(
                new,
                |left| match left {
                    FocusTarget::Window(_) => {
                        cx.seat.set_focused_pointer_surface(None, position)
                    }
                    FocusTarget::Decoration(w, d) => cx.space.decoration_hover_leave(w, *d),
                    FocusTarget::Internal(_, h) => cx.internal.pointer_leave(*h),
                    FocusTarget::None => {}
                },
                |entered| match entered {
                    FocusTarget::Window(w) => cx
                        .seat
                        .set_focused_pointer_surface(cx.space.surface(w), position),
                    FocusTarget::Decoration(w, d) => {
                        cx.space.decoration_hover_enter(w, *d, position)
                    }
                    FocusTarget::Internal(_, h) => cx.internal.pointer_enter(*h, position),
                    FocusTarget::None => {}
                },
            );
        }
        let mut cursor = rctx.cursor.borrow_mut();
        cursor.set_focus_cursor(None);
        if matches!(self.focus.focus(), FocusTarget::Decoration(..)) {
            cursor.set_decoration(Some(CursorImage::new(CursorIcon::Default)));
        } else {
            cursor.set_decoration(None);
        }
    }

    /// Revalidates confinement/lock against the current focus: a
    /// constraint survives only while its owner is the focused, active
    /// window and its region is still declared. A new constraint is
    /// established only when the pointer is already inside the region.
    fn update_constraints(&mut self, rctx: &RedirectCtx<'_>) {
        let focused = match self.focus.focus() {
            FocusTarget::Window(w) => Some(*w),
            _ => None,
        };
        if self.locked || self.confined {
            let owner_ok = match (self.constraint_owner, focused) {
                (Some(owner), Some(f)) => owner == f && rctx.cx.space.is_active(&owner),
                _ => false,
            };
            let region_ok = match (owner_ok, self.constraint_owner) {
                (true, Some(owner)) => {
                    let region = if self.locked {
                        rctx.cx.space.lock_region(&owner)
                    } else {
                        rctx.cx.space.confine_region(&owner)
                    };
                    region.map_or(false, |r| !r.is_empty())
                }
                _ => false,
            };
            if !owner_ok || !region_ok {
                self.release_constraints(rctx);
            }
        }
        if self.locked || self.confined {
            return;
        }
        let Some(window) = focused else {
            return;
        };
        if !rctx.cx.space.is_active(&window) {
            return;
        }
        if let Some(region) = rctx.cx.space.lock_region(&window) {
            if !region.is_empty() && region.contains(self.position) {
                debug!("pointer: locked by {:?}", window);
                self.locked = true;
                self.constraint_owner = Some(window);
                return;
            }
        }
        if let Some(region) = rctx.cx.space.confine_region(&window) {
            if !region.is_empty() && region.contains(self.position) {
                debug!("pointer: confined by {:?}", window);
                self.confined = true;
                self.constraint_owner = Some(window);
            }
        }
    }

    fn release_constraints(&mut self, rctx: &RedirectCtx<'_>) {
        let was_locked = self.locked;
        let owner = self.constraint_owner.take();
        self.locked = false;
        self.confined = false;
        if let Some(owner) = owner {
            debug!("pointer: constraint of {:?} released", owner);
            if was_locked {
                if let Some(hint) = rctx.cx.space.lock_position_hint(&owner) {
                    let outputs = rctx.cx.outputs.output_geometries();
                    self.position = confine_to_outputs(hint, &outputs);
                }
            }
        }
    }

    /// Synchronous cleanup when a window is removed: constraints owned by
    /// it are dropped (without applying a hint), and focus/"at" references
    /// are cleared with a leave.
    pub fn window_removed(&mut self, window: &WindowRef, rctx: &RedirectCtx<'_>) {
        if self.constraint_owner == Some(*window) {
            self.constraint_owner = None;
            self.locked = false;
            self.confined = false;
        }
        let cx = rctx.cx;
        let position = self.position;
        let cleared = self.focus.clear_window(window, |left| match left {
            FocusTarget::Window(_) => cx.seat.set_focused_pointer_surface(None, position),
            FocusTarget::Decoration(w, d) => cx.space.decoration_hover_leave(w, *d),
            FocusTarget::Internal(_, h) => cx.internal.pointer_leave(*h),
            FocusTarget::None => {}
        });
        if cleared {
            let mut cursor = rctx.cursor.borrow_mut();
            cursor.set_focus_cursor(None);
            cursor.set_decoration(None);
        }
    }

    /// Drops focus entirely, used when the last pointer device goes away.
    pub fn unset_focus(&mut self, rctx: &RedirectCtx<'_>) {
        let cx = rctx.cx;
        let position = self.position;
        let cleared = self.focus.unset_focus(|left| match left {
            FocusTarget::Window(_) => cx.seat.set_focused_pointer_surface(None, position),
            FocusTarget::Decoration(w, d) => cx.space.decoration_hover_leave(w, *d),
            FocusTarget::Internal(_, h) => cx.internal.pointer_leave(*h),
            FocusTarget::None => {}
        });
        if cleared {
            let mut cursor = rctx.cursor.borrow_mut();
            cursor.set_focus_cursor(None);
            cursor.set_decoration(None);
        }
    }
}
