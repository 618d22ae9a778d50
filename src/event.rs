// src/event.rs
//
// Abstract input event objects. The device layer translates whatever the
// backend produces into these before handing them to the router; the
// protocol layer consumes the routed results through the seat. No wire
// encoding happens here.

use bitflags::bitflags;

use crate::geometry::Point;

pub type DeviceId = u32;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DeviceCapabilities: u8 {
        const POINTER  = 1 << 0;
        const KEYBOARD = 1 << 1;
        const TOUCH    = 1 << 2;
        const TABLET   = 1 << 3;
        const SWITCH   = 1 << 4;
    }
}

/// Opaque handle to an input source. Events carry a monotonic timestamp in
/// milliseconds; the device itself only contributes its capability set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub capabilities: DeviceCapabilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifiersState {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub caps_lock: bool,
    pub logo: bool,
}

bitflags! {
    /// Combined pointer button mask derived from the per-code button table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointerButtons: u8 {
        const LEFT    = 1 << 0;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const SIDE    = 1 << 3;
        const EXTRA   = 1 << 4;
        const FORWARD = 1 << 5;
        const BACK    = 1 << 6;
        const TASK    = 1 << 7;
    }
}

// Linux input-event-codes.h values for the buttons and keys the routing
// core cares about.
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;
pub const BTN_SIDE: u32 = 0x113;
pub const BTN_EXTRA: u32 = 0x114;
pub const BTN_FORWARD: u32 = 0x115;
pub const BTN_BACK: u32 = 0x116;
pub const BTN_TASK: u32 = 0x117;

pub const KEY_ESC: u32 = 1;
pub const KEY_LEFTCTRL: u32 = 29;
pub const KEY_LEFTSHIFT: u32 = 42;
pub const KEY_RIGHTSHIFT: u32 = 54;
pub const KEY_LEFTALT: u32 = 56;
pub const KEY_CAPSLOCK: u32 = 58;
pub const KEY_F1: u32 = 59;
pub const KEY_F10: u32 = 68;
pub const KEY_F11: u32 = 87;
pub const KEY_F12: u32 = 88;
pub const KEY_RIGHTCTRL: u32 = 97;
pub const KEY_RIGHTALT: u32 = 100;
pub const KEY_LEFTMETA: u32 = 125;
pub const KEY_RIGHTMETA: u32 = 126;

pub fn button_flag(code: u32) -> PointerButtons {
    match code {
        BTN_LEFT => PointerButtons::LEFT,
        BTN_RIGHT => PointerButtons::RIGHT,
        BTN_MIDDLE => PointerButtons::MIDDLE,
        BTN_SIDE => PointerButtons::SIDE,
        BTN_EXTRA => PointerButtons::EXTRA,
        BTN_FORWARD => PointerButtons::FORWARD,
        BTN_BACK => PointerButtons::BACK,
        BTN_TASK => PointerButtons::TASK,
        _ => PointerButtons::empty(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
    Wheel,
    Finger,
    Continuous,
    WheelTilt,
}

/// Relative pointer motion after acceleration, with the resulting absolute
/// position already computed by the pointer redirect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    pub delta: Point,
    pub unaccelerated_delta: Point,
    pub position: Point,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: u32,
    pub state: ButtonState,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEvent {
    pub orientation: AxisOrientation,
    pub delta: f64,
    /// Discrete scroll steps in 1/120 notches, zero for continuous sources.
    pub v120: i32,
    pub source: AxisSource,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u32,
    pub state: KeyState,
    pub modifiers: ModifiersState,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDownEvent {
    /// Id as reported by the device.
    pub id: i32,
    /// Seat slot assigned by the touch redirect.
    pub slot: i32,
    pub position: Point,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchMotionEvent {
    pub id: i32,
    pub slot: i32,
    pub position: Point,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchUpEvent {
    pub id: i32,
    pub slot: i32,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeBeginEvent {
    pub fingers: u32,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeUpdateEvent {
    pub delta: Point,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchBeginEvent {
    pub fingers: u32,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdateEvent {
    pub delta: Point,
    pub scale: f64,
    pub rotation: f64,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldBeginEvent {
    pub fingers: u32,
    pub time: u32,
}

/// Shared by swipe/pinch end and cancel and by hold end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEndEvent {
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityState {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipState {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolProximityEvent {
    pub position: Point,
    pub state: ProximityState,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolTipEvent {
    pub position: Point,
    pub state: TipState,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletToolAxisEvent {
    pub position: Point,
    pub pressure: f64,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletToolButtonEvent {
    pub button: u32,
    pub state: ButtonState,
    pub time: u32,
}
