// src/motion.rs
//
// Backpressure buffer for relative pointer motion. Motion handlers can
// synchronously trigger further motion (constraint callbacks, focus-change
// side effects); the scheduler turns that recursion into a deferred replay
// instead of reentrant processing, and coalesces high-frequency bursts
// while a motion call is in flight.

use tracing::trace;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMotion {
    pub delta: Point,
    pub unaccelerated_delta: Point,
    pub time: u32,
}

/// Reentrancy guard plus a single-slot, latest-wins pending sample.
///
/// The lock is not a thread primitive: it is scoped to one in-flight motion
/// call. While held, `schedule` overwrites any earlier pending entry, so at
/// most one motion is buffered and intermediate samples are dropped in
/// favor of the latest. `unlock` hands the pending sample back exactly once
/// for replay.
#[derive(Debug, Default)]
pub struct MotionScheduler {
    locked: bool,
    pending: Option<PendingMotion>,
}

impl MotionScheduler {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        debug_assert!(!self.locked, "motion scheduler locked reentrantly");
        self.locked = true;
    }

    /// Buffers a motion sample while locked. Latest wins.
    pub fn schedule(&mut self, delta: Point, unaccelerated_delta: Point, time: u32) {
        debug_assert!(self.locked, "scheduling motion while unlocked");
        if self.pending.is_some() {
            trace!("motion: coalescing pending sample, latest wins");
        }
        self.pending = Some(PendingMotion {
            delta,
            unaccelerated_delta,
            time,
        });
    }

    /// Releases the lock and returns the pending sample, if any, clearing
    /// it so the replay happens exactly once.
    #[must_use]
    pub fn unlock(&mut self) -> Option<PendingMotion> {
        self.locked = false;
        self.pending.take()
    }
}
