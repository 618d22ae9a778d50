// src/filters/mod.rs
//
// The filters and spies that make up the default dispatch chain. Order is
// decided by the router when it builds the chain; each filter only decides
// whether a given event is its business.

pub mod decoration;
pub mod drag_and_drop;
pub mod effects;
pub mod fake_tablet;
pub mod forward;
pub mod global_shortcut;
pub mod internal_window;
pub mod lock_screen;
pub mod move_resize;
pub mod popup;
pub mod screen_edge;
pub mod spies;
pub mod vt;
pub mod window_action;
pub mod window_selector;

pub use decoration::DecorationFilter;
pub use drag_and_drop::DragAndDropFilter;
pub use effects::EffectsFilter;
pub use fake_tablet::FakeTabletFilter;
pub use forward::ForwardFilter;
pub use global_shortcut::GlobalShortcutFilter;
pub use internal_window::InternalWindowFilter;
pub use lock_screen::LockScreenFilter;
pub use move_resize::MoveResizeFilter;
pub use popup::PopupFilter;
pub use screen_edge::ScreenEdgeFilter;
pub use spies::{ActivitySpy, TouchHidesCursorSpy};
pub use vt::VirtualTerminalFilter;
pub use window_action::WindowActionFilter;
pub use window_selector::WindowSelectorFilter;
