// src/filters/global_shortcut.rs

use crate::event::{AxisEvent, KeyEvent, KeyState};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Offers key presses and modifier-scrolls to the global shortcut handler
/// before any client sees them. The handler's verdict decides consumption,
/// so unbound combinations fall through to the focused window.
pub struct GlobalShortcutFilter;

impl InputFilter for GlobalShortcutFilter {
    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if event.state != KeyState::Pressed {
            return false;
        }
        ctx.cx.shortcuts.global_key(ctx.mods, event)
    }

    fn pointer_axis(&mut self, event: &AxisEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        // Plain scrolling is client business; only modified scrolls can be
        // bound globally.
        let mods = ctx.mods;
        if !(mods.ctrl || mods.alt || mods.logo) {
            return false;
        }
        ctx.cx.shortcuts.global_axis(mods, event)
    }
}
