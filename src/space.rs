// src/space.rs
//
// Collaborator interfaces the routing core consumes. Implementations live
// in the rest of the compositor (window management, protocol layer,
// effects); tests provide mocks. Everything is `&self` plus interior
// mutability: the core runs on a single dispatch loop.

use std::rc::Rc;

use crate::cursor::CursorIcon;
use crate::event::{
    AxisEvent, ButtonEvent, KeyEvent, ModifiersState, MotionEvent, TouchDownEvent,
    TouchMotionEvent, TouchUpEvent,
};
use crate::geometry::{Point, Rect, Region};
use crate::seat::SeatSink;
use crate::window::WindowRef;

pub type SurfaceId = u32;
pub type DecorationId = u32;
pub type PlatformWindowId = u64;

/// Stacking order, hit-testing and window introspection.
pub trait Space {
    /// Topmost input-eligible window under the point.
    fn window_at(&self, position: Point) -> Option<WindowRef>;

    /// The active (topmost, input-eligible) window.
    fn active_window(&self) -> Option<WindowRef>;

    fn is_active(&self, window: &WindowRef) -> bool {
        self.active_window().as_ref() == Some(window)
    }

    fn surface(&self, window: &WindowRef) -> Option<SurfaceId>;
    fn internal_handle(&self, window: &WindowRef) -> Option<PlatformWindowId>;

    /// Decoration of `window` under the point, if the point lies on server-
    /// side decoration rather than client content.
    fn decoration_at(&self, window: &WindowRef, position: Point) -> Option<DecorationId>;
    fn decoration_hover_enter(&self, window: &WindowRef, decoration: DecorationId, position: Point);
    fn decoration_hover_leave(&self, window: &WindowRef, decoration: DecorationId);
    /// Hover motion over a decoration; returns the cursor the decoration
    /// wants shown, if it changed.
    fn decoration_pointer_motion(
        &self,
        window: &WindowRef,
        decoration: DecorationId,
        position: Point,
    ) -> Option<CursorIcon>;
    fn decoration_pointer_button(
        &self,
        window: &WindowRef,
        decoration: DecorationId,
        event: &ButtonEvent,
        position: Point,
    );
    fn decoration_pointer_axis(
        &self,
        window: &WindowRef,
        decoration: DecorationId,
        event: &AxisEvent,
    );

    // Surface-declared pointer constraints.
    fn confine_region(&self, window: &WindowRef) -> Option<Region>;
    fn lock_region(&self, window: &WindowRef) -> Option<Region>;
    /// Position the surface asked the pointer to take once its lock is
    /// released.
    fn lock_position_hint(&self, window: &WindowRef) -> Option<Point>;

    /// Whether the window is allowed to receive input while the screen is
    /// locked (greeter, lock-screen surfaces).
    fn is_lock_screen_window(&self, window: &WindowRef) -> bool;

    /// Ask the window manager to activate the window (used by the
    /// window-action filter on click).
    fn request_activation(&self, window: &WindowRef);

    // Interactive move/resize driven by the window manager.
    fn move_resize_window(&self) -> Option<WindowRef>;
    fn update_move_resize(&self, position: Point);
    fn end_move_resize(&self);
    fn cancel_move_resize(&self);
}

/// Output topology.
pub trait Outputs {
    fn output_geometries(&self) -> Vec<Rect>;
}

/// Screen-lock query.
pub trait LockScreen {
    fn is_locked(&self) -> bool;
}

/// Global shortcuts, screen edges and VT switching.
pub trait ShortcutHandler {
    fn global_key(&self, modifiers: ModifiersState, event: &KeyEvent) -> bool;
    fn global_axis(&self, modifiers: ModifiersState, event: &AxisEvent) -> bool;
    /// Pointer approached a screen edge; true if the edge swallowed the
    /// motion.
    fn edge_approach(&self, position: Point, time: u32) -> bool;
    fn switch_vt(&self, vt: u32) -> bool;
}

/// Compositor-internal UI windows (OSDs, debug console). Delivery returns
/// whether the window accepted the event.
pub trait InternalWindows {
    fn pointer_enter(&self, window: PlatformWindowId, position: Point);
    fn pointer_leave(&self, window: PlatformWindowId);
    fn pointer_motion(&self, window: PlatformWindowId, event: &MotionEvent) -> bool;
    fn pointer_button(&self, window: PlatformWindowId, event: &ButtonEvent) -> bool;
    fn pointer_axis(&self, window: PlatformWindowId, event: &AxisEvent) -> bool;
    fn key(&self, window: PlatformWindowId, event: &KeyEvent) -> bool;
    fn touch_down(&self, window: PlatformWindowId, event: &TouchDownEvent) -> bool;
    fn touch_motion(&self, window: PlatformWindowId, event: &TouchMotionEvent) -> bool;
    fn touch_up(&self, window: PlatformWindowId, event: &TouchUpEvent) -> bool;
}

/// Visual effects that may grab input ahead of normal routing.
pub trait EffectsHandler {
    fn is_grabbing_input(&self) -> bool;
    fn pointer_motion(&self, event: &MotionEvent) -> bool;
    fn pointer_button(&self, event: &ButtonEvent) -> bool;
    fn pointer_axis(&self, event: &AxisEvent) -> bool;
    fn key(&self, event: &KeyEvent) -> bool;
    fn touch_down(&self, event: &TouchDownEvent) -> bool;
    fn touch_motion(&self, event: &TouchMotionEvent) -> bool;
    fn touch_up(&self, event: &TouchUpEvent) -> bool;
}

/// Bundle of collaborator handles, passed explicitly at construction.
/// There is no ambient global lookup anywhere in the crate.
#[derive(Clone)]
pub struct Collaborators {
    pub space: Rc<dyn Space>,
    pub seat: Rc<dyn SeatSink>,
    pub outputs: Rc<dyn Outputs>,
    pub lock: Rc<dyn LockScreen>,
    pub shortcuts: Rc<dyn ShortcutHandler>,
    pub internal: Rc<dyn InternalWindows>,
    pub effects: Rc<dyn EffectsHandler>,
}
