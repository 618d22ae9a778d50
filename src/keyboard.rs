// src/keyboard.rs
//
// Keyboard redirect: tracks pressed keys and the modifier state derived
// from them, and binds keyboard focus to the active window. Keyboard focus
// never follows the pointer; it follows window activation, filtered by the
// screen lock.

use std::collections::HashSet;

use tracing::debug;

use crate::config::KeyboardConfig;
use crate::event::{
    KeyEvent, KeyState, ModifiersState, KEY_CAPSLOCK, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA,
    KEY_LEFTSHIFT, KEY_RIGHTALT, KEY_RIGHTCTRL, KEY_RIGHTMETA, KEY_RIGHTSHIFT,
};
use crate::focus::{FocusState, FocusTarget};
use crate::pipeline::{DispatchCtx, Pipeline, RedirectCtx};
use crate::window::WindowRef;

pub struct KeyboardRedirect {
    config: KeyboardConfig,
    pressed: HashSet<u32>,
    modifiers: ModifiersState,
    focus: FocusState,
}

impl KeyboardRedirect {
    pub fn new(config: KeyboardConfig) -> Self {
        Self {
            config,
            pressed: HashSet::new(),
            modifiers: ModifiersState::default(),
            focus: FocusState::default(),
        }
    }

    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }

    pub fn focused_window(&self) -> Option<WindowRef> {
        self.focus.focused_window()
    }

    pub fn is_pressed(&self, code: u32) -> bool {
        self.pressed.contains(&code)
    }

    /// Repeat characteristics the seat advertises to clients:
    /// (repeats per second, delay in ms before the first repeat).
    pub fn repeat_info(&self) -> (u32, u32) {
        (self.config.repeat_rate, self.config.repeat_delay)
    }

    pub fn process_key(
        &mut self,
        code: u32,
        state: KeyState,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        match state {
            KeyState::Pressed => {
                self.pressed.insert(code);
            }
            KeyState::Released => {
                self.pressed.remove(&code);
            }
        }
        self.update_modifiers(code, state);
        self.update(rctx);
        let event = KeyEvent {
            code,
            state,
            modifiers: self.modifiers,
            time,
        };
        let mut ctx = DispatchCtx::new(
            rctx.cx,
            rctx.cursor,
            rctx.selection,
            rctx.pointer.clone(),
            self.modifiers,
        );
        pipeline.key(&event, &mut ctx);
    }

    /// Repeat injection point. The caller owns the repeat timer (armed from
    /// [`repeat_info`]); a repeat for a key that was released in the
    /// meantime is silently dropped.
    ///
    /// [`repeat_info`]: KeyboardRedirect::repeat_info
    pub fn process_key_repeat(
        &mut self,
        code: u32,
        time: u32,
        pipeline: &mut Pipeline,
        rctx: &RedirectCtx<'_>,
    ) {
        if self.config.repeat_rate == 0 || !self.pressed.contains(&code) {
            return;
        }
        let event = KeyEvent {
            code,
            state: KeyState::Pressed,
            modifiers: self.modifiers,
            time,
        };
        let mut ctx = DispatchCtx::new(
            rctx.cx,
            rctx.cursor,
            rctx.selection,
            rctx.pointer.clone(),
            self.modifiers,
        );
        pipeline.key_repeat(&event, &mut ctx);
    }

    /// Binds focus to the active window. While the screen is locked only
    /// lock-screen windows are eligible; everything else sees no keyboard.
    pub fn update(&mut self, rctx: &RedirectCtx<'_>) {
        let active = rctx.cx.space.active_window();
        let eligible = match active {
            Some(w) => !rctx.cx.lock.is_locked() || rctx.cx.space.is_lock_screen_window(&w),
            None => false,
        };
        let new = match (active, eligible) {
            (Some(w), true) => FocusTarget::Window(w),
            _ => FocusTarget::None,
        };
        self.apply_focus(new, rctx);
    }

    // One seat call per transition, also for window-to-window handover.
    fn apply_focus(&mut self, new: FocusTarget, rctx: &RedirectCtx<'_>) {
        if *self.focus.focus() == new {
            return;
        }
        let surface = new.window().and_then(|w| rctx.cx.space.surface(&w));
        debug!("keyboard: focus -> {:?}", new);
        rctx.cx.seat.set_focused_keyboard_surface(surface);
        self.focus.set_focus(new, |_| {}, |_| {});
    }

    pub fn window_removed(&mut self, window: &WindowRef, rctx: &RedirectCtx<'_>) {
        let cx = rctx.cx;
        self.focus
            .clear_window(window, |_| cx.seat.set_focused_keyboard_surface(None));
    }

    pub fn unset_focus(&mut self, rctx: &RedirectCtx<'_>) {
        let cx = rctx.cx;
        self.focus
            .unset_focus(|_| cx.seat.set_focused_keyboard_surface(None));
    }

    fn update_modifiers(&mut self, code: u32, state: KeyState) {
        match code {
            KEY_LEFTCTRL | KEY_RIGHTCTRL => {
                self.modifiers.ctrl = self.any_pressed(&[KEY_LEFTCTRL, KEY_RIGHTCTRL]);
            }
            KEY_LEFTSHIFT | KEY_RIGHTSHIFT => {
                self.modifiers.shift = self.any_pressed(&[KEY_LEFTSHIFT, KEY_RIGHTSHIFT]);
            }
            KEY_LEFTALT | KEY_RIGHTALT => {
                self.modifiers.alt = self.any_pressed(&[KEY_LEFTALT, KEY_RIGHTALT]);
            }
            KEY_LEFTMETA | KEY_RIGHTMETA => {
                self.modifiers.logo = self.any_pressed(&[KEY_LEFTMETA, KEY_RIGHTMETA]);
            }
            KEY_CAPSLOCK if state == KeyState::Pressed => {
                self.modifiers.caps_lock = !self.modifiers.caps_lock;
            }
            _ => {}
        }
    }

    fn any_pressed(&self, codes: &[u32]) -> bool {
        codes.iter().any(|c| self.pressed.contains(c))
    }
}
