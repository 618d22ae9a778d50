// src/filters/screen_edge.rs

use crate::event::MotionEvent;
use crate::pipeline::{DispatchCtx, InputFilter};

/// Offers pointer motion to the screen-edge handler (hot corners, edge
/// activation). The handler decides whether the approach triggers; only
/// then is the motion withheld from clients.
pub struct ScreenEdgeFilter;

impl InputFilter for ScreenEdgeFilter {
    fn pointer_motion(&mut self, event: &MotionEvent, ctx: &mut DispatchCtx<'_>) -> bool {
        ctx.cx.shortcuts.edge_approach(event.position, event.time)
    }
}
