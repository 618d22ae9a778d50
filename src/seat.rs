// src/seat.rs

use crate::event::{AxisOrientation, AxisSource, ButtonState, KeyState};
use crate::geometry::Point;
use crate::space::SurfaceId;

/// Protocol-facing endpoint representing the user's input devices.
///
/// The routing core calls this to realize its decisions; the implementation
/// (the Wayland server module) encodes the wire messages. All methods take
/// `&self`: the core is single-threaded and implementations use interior
/// mutability.
pub trait SeatSink {
    // Focus assignment per device class. Positions are compositor-global;
    // the seat applies the surface transform.
    fn set_focused_pointer_surface(&self, surface: Option<SurfaceId>, position: Point);
    fn set_focused_keyboard_surface(&self, surface: Option<SurfaceId>);
    fn set_focused_touch_surface(&self, surface: Option<SurfaceId>, position: Point);

    // Pointer event forwarding.
    fn pointer_motion(&self, position: Point, time: u32);
    fn pointer_button(&self, button: u32, state: ButtonState, time: u32);
    fn pointer_axis(
        &self,
        orientation: AxisOrientation,
        delta: f64,
        v120: i32,
        source: AxisSource,
        time: u32,
    );
    /// End-of-batch marker emitted after every pointer event group.
    fn pointer_frame(&self);

    fn keyboard_key(&self, code: u32, state: KeyState, time: u32);

    fn touch_down(&self, slot: i32, position: Point, time: u32);
    fn touch_motion(&self, slot: i32, position: Point, time: u32);
    fn touch_up(&self, slot: i32, time: u32);
    fn touch_cancel(&self);
    fn touch_frame(&self);

    fn gesture_swipe_begin(&self, fingers: u32, time: u32);
    fn gesture_swipe_update(&self, delta: Point, time: u32);
    fn gesture_swipe_end(&self, time: u32);
    fn gesture_swipe_cancel(&self, time: u32);
    fn gesture_pinch_begin(&self, fingers: u32, time: u32);
    fn gesture_pinch_update(&self, delta: Point, scale: f64, rotation: f64, time: u32);
    fn gesture_pinch_end(&self, time: u32);
    fn gesture_pinch_cancel(&self, time: u32);
    fn gesture_hold_begin(&self, fingers: u32, time: u32);
    fn gesture_hold_end(&self, time: u32);

    // Capability flags, toggled by the router on first-add / last-remove.
    fn set_pointer_capability(&self, available: bool);
    fn set_keyboard_capability(&self, available: bool);
    fn set_touch_capability(&self, available: bool);

    // Drag-and-drop state owned by the seat.
    fn is_drag_active(&self) -> bool;
    fn drag_motion(&self, position: Point, time: u32);
    fn set_drag_target(&self, surface: Option<SurfaceId>, position: Point);
    fn drag_drop(&self, time: u32);
    fn drag_cancel(&self);

    // Popup grabs.
    fn has_popup_grab(&self) -> bool;
    fn popup_grab_owner(&self) -> Option<SurfaceId>;
    fn dismiss_popups(&self);
}
