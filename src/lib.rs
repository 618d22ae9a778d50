// NovaDE input routing core.
//
// This crate is the input half of the NovaDE compositor: it receives raw
// input events (pointer, keyboard, touch, tablet) from the device layer and
// decides, event by event, which consumer receives them: a client surface,
// a window decoration, an internal UI window, a global shortcut, the lock
// screen, or a transient interactive mode. It produces and consumes abstract
// event objects only; the wire protocol, rendering and window placement live
// in the rest of the compositor and are reached through the narrow
// collaborator traits in `seat` and `space`.

pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod filters;
pub mod focus;
pub mod geometry;
pub mod keyboard;
pub mod motion;
pub mod pipeline;
pub mod pointer;
pub mod router;
pub mod seat;
pub mod selection;
pub mod space;
pub mod tablet;
pub mod touch;
pub mod window;

pub use config::{InputConfig, KeyboardConfig, PointerConfig, ShortcutsConfig};
pub use cursor::{CursorIcon, CursorImage, CursorImageResolver, CursorObserverToken, CursorSource};
pub use error::InputError;
pub use focus::{FocusState, FocusTarget};
pub use event::{
    AxisEvent, AxisOrientation, AxisSource, ButtonEvent, ButtonState, Device, DeviceCapabilities,
    DeviceId, GestureEndEvent, HoldBeginEvent, KeyEvent, KeyState, ModifiersState, MotionEvent,
    PinchBeginEvent, PinchUpdateEvent, PointerButtons, ProximityState, SwipeBeginEvent,
    SwipeUpdateEvent, TabletToolAxisEvent, TabletToolButtonEvent, TabletToolProximityEvent,
    TabletToolTipEvent, TipState, TouchDownEvent, TouchMotionEvent, TouchUpEvent,
};
pub use geometry::{Point, Rect, Region};
pub use keyboard::KeyboardRedirect;
pub use pipeline::{
    DispatchCtx, FilterHandle, InputFilter, InputSpy, Pipeline, PointerSnapshot, RedirectCtx,
    SpyHandle,
};
pub use pointer::PointerRedirect;
pub use router::InputRouter;
pub use seat::SeatSink;
pub use selection::SelectionKind;
pub use space::{
    Collaborators, DecorationId, EffectsHandler, InternalWindows, LockScreen, Outputs,
    PlatformWindowId, ShortcutHandler, Space, SurfaceId,
};
pub use tablet::TabletRedirect;
pub use touch::TouchRedirect;
pub use window::{WindowId, WindowKind, WindowRef};
