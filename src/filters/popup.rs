// src/filters/popup.rs

use tracing::debug;

use crate::event::{ButtonEvent, ButtonState};
use crate::pipeline::{DispatchCtx, InputFilter};

/// While a popup holds an explicit grab, a click outside the grab owner
/// dismisses the popup chain and the triggering press never reaches a
/// client.
pub struct PopupFilter;

impl InputFilter for PopupFilter {
    fn pointer_button(&mut self, event: &ButtonEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        if !ctx.cx.seat.has_popup_grab() || event.state != ButtonState::Pressed {
            return false;
        }
        let owner = ctx.cx.seat.popup_grab_owner();
        let under_pointer = ctx
            .pointer
            .at
            .and_then(|w| ctx.cx.space.surface(&w));
        if owner.is_some() && under_pointer == owner {
            return false;
        }
        debug!("popup grab broken by outside press");
        ctx.cx.seat.dismiss_popups();
        true
    }
}
