// src/window.rs

pub type WindowId = u64;

/// The fixed set of window kinds the compositor routes input to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// A Wayland client surface window.
    Surface,
    /// A legacy X11 window bridged through Xwayland.
    X11,
    /// A compositor-internal UI window.
    Internal,
}

/// Cheap, non-owning reference to a window.
///
/// The routing core never owns windows; it holds these values and clears
/// them synchronously when the `window_removed` notification arrives. All
/// introspection (surface handle, decoration, constraint regions) goes
/// through the [`Space`](crate::space::Space) collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRef {
    pub id: WindowId,
    pub kind: WindowKind,
}

impl WindowRef {
    pub fn new(id: WindowId, kind: WindowKind) -> Self {
        Self { id, kind }
    }

    pub fn surface(id: WindowId) -> Self {
        Self::new(id, WindowKind::Surface)
    }

    pub fn internal(id: WindowId) -> Self {
        Self::new(id, WindowKind::Internal)
    }

    pub fn x11(id: WindowId) -> Self {
        Self::new(id, WindowKind::X11)
    }
}
