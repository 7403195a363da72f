//=========================================================================
// Position Tween
//=========================================================================
//
// Linear position animation embedded in an Entity.
//
// Lifecycle:
//   animate() → Tween { velocity: None }
//        ↓ first advance()
//   velocity = (target - position) / duration      (computed once)
//        ↓ each advance(step)
//   position += velocity * step, elapsed += step
//        ↓ elapsed reaches duration
//   position = target, tween dropped
//
// Elapsed time accumulates in f64 against the duration, and arrival
// tolerates the rounding a sum of frame steps carries.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;

//=== Constants ===========================================================

/// Remaining time below this fraction of the duration counts as arrived.
const ARRIVAL_TOLERANCE: f64 = 1e-9;

//=== Tween ===============================================================

/// In-flight linear movement toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    target: Vec2,
    duration: f64,
    elapsed: f64,
    velocity: Option<Vec2>,
}

/// Result of advancing a tween by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TweenStep {
    /// Still moving; the new position is attached.
    Moving(Vec2),

    /// Arrived exactly on target; the tween must be dropped.
    Arrived(Vec2),
}

impl Tween {
    pub fn new(target: Vec2, duration: f32) -> Self {
        Self {
            target,
            duration: f64::from(duration),
            elapsed: 0.0,
            velocity: None,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed) as f32
    }

    fn has_arrived(&self) -> bool {
        self.duration - self.elapsed <= self.duration.abs() * ARRIVAL_TOLERANCE
    }

    pub fn velocity(&self) -> Option<Vec2> {
        self.velocity
    }

    /// Advances by `step` starting from `position`.
    ///
    /// The last step always lands exactly on `target`, whatever jitter the
    /// frame times had.
    pub(crate) fn advance(&mut self, position: Vec2, step: f64) -> TweenStep {
        if self.has_arrived() {
            return TweenStep::Arrived(self.target);
        }

        let remaining = (self.duration - self.elapsed) as f32;
        let velocity = *self
            .velocity
            .get_or_insert_with(|| (self.target - position) / remaining);

        self.elapsed += step;
        if self.has_arrived() {
            return TweenStep::Arrived(self.target);
        }

        let next = position + velocity * step as f32;
        if next.is_finite() {
            TweenStep::Moving(next)
        } else {
            TweenStep::Arrived(self.target)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
