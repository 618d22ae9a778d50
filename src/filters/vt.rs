// src/filters/vt.rs

use tracing::info;

use crate::event::{KeyEvent, KeyState, KEY_F1, KEY_F10, KEY_F11, KEY_F12};
use crate::pipeline::{DispatchCtx, InputFilter};

/// Ctrl+Alt+Fn virtual terminal switching. Sits at the very head of the
/// chain: VT switching must work even when the session is locked or an
/// interactive mode has grabbed everything else.
pub struct VirtualTerminalFilter;

fn vt_number(code: u32) -> Option<u32> {
    match code {
        KEY_F1..=KEY_F10 => Some(code - KEY_F1 + 1),
        KEY_F11 => Some(11),
        KEY_F12 => Some(12),
        _ => None,
    }
}

impl InputFilter for VirtualTerminalFilter {
    fn key(&mut self, event: &KeyEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if event.state != KeyState::Pressed || !event.modifiers.ctrl || !event.modifiers.alt {
            return false;
        }
        let Some(vt) = vt_number(event.code) else {
            return false;
        };
        info!("switching to virtual terminal {}", vt);
        ctx.cx.shortcuts.switch_vt(vt);
        true
    }
}
