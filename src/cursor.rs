// src/cursor.rs
//
// Resolves the currently-displayed cursor image from a strictly prioritized
// set of sources. Exactly one source wins at any time; sources are never
// blended. Each source owns its cached image and only a change of the
// winning (source, image) pair emits a notification.

use tracing::{debug, trace};

use crate::geometry::Point;
use crate::space::SurfaceId;

/// Cursor appearance. `Surface` points at a client-provided cursor surface;
/// the named variants map to the compositor's cursor theme.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorIcon {
    Default,
    Crosshair,
    Grabbing,
    Move,
    SizeVertical,
    SizeHorizontal,
    SizeFDiag,
    SizeBDiag,
    Blank,
    Surface(SurfaceId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorImage {
    pub icon: CursorIcon,
    pub hotspot: Point,
}

impl CursorImage {
    pub fn new(icon: CursorIcon) -> Self {
        Self {
            icon,
            hotspot: Point::ZERO,
        }
    }

    pub fn with_hotspot(icon: CursorIcon, hotspot: Point) -> Self {
        Self { icon, hotspot }
    }
}

/// Cursor sources in fixed priority order, highest first. The resolver
/// always reports the highest-priority active source, never a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorSource {
    Drag,
    LockScreen,
    WindowSelection,
    EffectOverride,
    MoveResize,
    Decoration,
    Focus,
    Fallback,
}

pub type CursorObserverToken = u64;

type CursorObserver = Box<dyn FnMut(CursorSource, &CursorImage)>;

pub struct CursorImageResolver {
    drag: Option<CursorImage>,
    lock_active: bool,
    selection_active: bool,
    effect_override: Option<CursorImage>,
    move_resize: Option<CursorImage>,
    decoration: Option<CursorImage>,
    focus_surface: Option<CursorImage>,
    pointer_available: bool,
    hidden: bool,
    current: (CursorSource, CursorImage),
    observers: Vec<(CursorObserverToken, CursorObserver)>,
    next_token: CursorObserverToken,
}

impl Default for CursorImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorImageResolver {
    pub fn new() -> Self {
        Self {
            drag: None,
            lock_active: false,
            selection_active: false,
            effect_override: None,
            move_resize: None,
            decoration: None,
            focus_surface: None,
            pointer_available: false,
            hidden: false,
            current: (CursorSource::Fallback, CursorImage::new(CursorIcon::Default)),
            observers: Vec::new(),
            next_token: 0,
        }
    }

    pub fn current_source(&self) -> CursorSource {
        self.current.0
    }

    /// The image to display right now. An orthogonal "hidden" state (touch
    /// in progress) blanks the image without disturbing the priority
    /// resolution underneath.
    pub fn current_image(&self) -> CursorImage {
        if self.hidden {
            CursorImage::new(CursorIcon::Blank)
        } else {
            self.current.1.clone()
        }
    }

    pub fn set_drag(&mut self, image: Option<CursorImage>) {
        self.drag = image;
        self.reevaluate();
    }

    pub fn set_lock_active(&mut self, active: bool) {
        self.lock_active = active;
        self.reevaluate();
    }

    pub fn set_selection_active(&mut self, active: bool) {
        self.selection_active = active;
        self.reevaluate();
    }

    pub fn set_effect_override(&mut self, image: Option<CursorImage>) {
        self.effect_override = image;
        self.reevaluate();
    }

    pub fn set_move_resize(&mut self, image: Option<CursorImage>) {
        self.move_resize = image;
        self.reevaluate();
    }

    pub fn set_decoration(&mut self, image: Option<CursorImage>) {
        self.decoration = image;
        self.reevaluate();
    }

    pub fn set_focus_cursor(&mut self, image: Option<CursorImage>) {
        self.focus_surface = image;
        self.reevaluate();
    }

    pub fn set_pointer_available(&mut self, available: bool) {
        self.pointer_available = available;
        self.reevaluate();
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        let image = self.current_image();
        let source = self.current.0;
        self.notify(source, &image);
    }

    pub fn on_changed(
        &mut self,
        observer: impl FnMut(CursorSource, &CursorImage) + 'static,
    ) -> CursorObserverToken {
        let token = self.next_token;
        self.next_token += 1;
        self.observers.push((token, Box::new(observer)));
        token
    }

    pub fn remove_observer(&mut self, token: CursorObserverToken) {
        self.observers.retain(|(t, _)| *t != token);
    }

    /// Recomputes the winner deterministically. Never cached across a
    /// transition: every setter funnels through here.
    fn reevaluate(&mut self) {
        let winner = self.resolve();
        if winner == self.current {
            trace!("cursor: source {:?} unchanged", winner.0);
            return;
        }
        debug!("cursor: source {:?} -> {:?}", self.current.0, winner.0);
        self.current = winner;
        let (source, image) = (self.current.0, self.current_image());
        self.notify(source, &image);
    }

    fn resolve(&self) -> (CursorSource, CursorImage) {
        if let Some(image) = &self.drag {
            return (CursorSource::Drag, image.clone());
        }
        if self.lock_active {
            return (CursorSource::LockScreen, CursorImage::new(CursorIcon::Default));
        }
        if self.selection_active {
            return (
                CursorSource::WindowSelection,
                CursorImage::new(CursorIcon::Crosshair),
            );
        }
        if let Some(image) = &self.effect_override {
            return (CursorSource::EffectOverride, image.clone());
        }
        if let Some(image) = &self.move_resize {
            return (CursorSource::MoveResize, image.clone());
        }
        if let Some(image) = &self.decoration {
            return (CursorSource::Decoration, image.clone());
        }
        if self.pointer_available {
            if let Some(image) = &self.focus_surface {
                return (CursorSource::Focus, image.clone());
            }
        }
        (CursorSource::Fallback, CursorImage::new(CursorIcon::Default))
    }

    fn notify(&mut self, source: CursorSource, image: &CursorImage) {
        for (_, observer) in &mut self.observers {
            observer(source, image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fallback_wins_when_nothing_is_active() {
        let resolver = CursorImageResolver::new();
        assert_eq!(resolver.current_source(), CursorSource::Fallback);
        assert_eq!(resolver.current_image().icon, CursorIcon::Default);
    }

    #[test]
    fn priority_order_is_strict() {
        let mut resolver = CursorImageResolver::new();
        resolver.set_pointer_available(true);
        resolver.set_focus_cursor(Some(CursorImage::new(CursorIcon::Surface(4))));
        assert_eq!(resolver.current_source(), CursorSource::Focus);

        resolver.set_decoration(Some(CursorImage::new(CursorIcon::SizeVertical)));
        assert_eq!(resolver.current_source(), CursorSource::Decoration);

        resolver.set_move_resize(Some(CursorImage::new(CursorIcon::Move)));
        assert_eq!(resolver.current_source(), CursorSource::MoveResize);

        resolver.set_effect_override(Some(CursorImage::new(CursorIcon::Grabbing)));
        assert_eq!(resolver.current_source(), CursorSource::EffectOverride);

        resolver.set_selection_active(true);
        assert_eq!(resolver.current_source(), CursorSource::WindowSelection);
        assert_eq!(resolver.current_image().icon, CursorIcon::Crosshair);

        resolver.set_lock_active(true);
        assert_eq!(resolver.current_source(), CursorSource::LockScreen);

        resolver.set_drag(Some(CursorImage::new(CursorIcon::Grabbing)));
        assert_eq!(resolver.current_source(), CursorSource::Drag);

        // Peeling the winners off again walks back down the order.
        resolver.set_drag(None);
        assert_eq!(resolver.current_source(), CursorSource::LockScreen);
        resolver.set_lock_active(false);
        assert_eq!(resolver.current_source(), CursorSource::WindowSelection);
    }

    #[test]
    fn focus_cursor_needs_a_pointer_device() {
        let mut resolver = CursorImageResolver::new();
        resolver.set_focus_cursor(Some(CursorImage::new(CursorIcon::Surface(1))));
        assert_eq!(resolver.current_source(), CursorSource::Fallback);
        resolver.set_pointer_available(true);
        assert_eq!(resolver.current_source(), CursorSource::Focus);
    }

    #[test]
    fn losing_source_change_does_not_notify() {
        let mut resolver = CursorImageResolver::new();
        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();
        resolver.on_changed(move |_, _| *counter.borrow_mut() += 1);

        resolver.set_lock_active(true);
        assert_eq!(*changes.borrow(), 1);

        // Decoration is below the lock screen; updating its cached image
        // must not emit a change.
        resolver.set_decoration(Some(CursorImage::new(CursorIcon::Move)));
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn observer_token_unregisters() {
        let mut resolver = CursorImageResolver::new();
        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();
        let token = resolver.on_changed(move |_, _| *counter.borrow_mut() += 1);
        resolver.set_lock_active(true);
        resolver.remove_observer(token);
        resolver.set_lock_active(false);
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn hidden_blanks_without_losing_resolution() {
        let mut resolver = CursorImageResolver::new();
        resolver.set_lock_active(true);
        resolver.set_hidden(true);
        assert_eq!(resolver.current_image().icon, CursorIcon::Blank);
        assert_eq!(resolver.current_source(), CursorSource::LockScreen);
        resolver.set_hidden(false);
        assert_eq!(resolver.current_image().icon, CursorIcon::Default);
    }
}
