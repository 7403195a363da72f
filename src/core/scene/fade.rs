//=========================================================================
// Fade Transition
//=========================================================================
//
// Full-surface color overlay whose opacity ramps linearly over time.
//
//   opacity += step / total       (every rendered frame)
//   alpha    = opacity            (Out: obscures the scene)
//            = 1 - opacity        (In:  reveals the scene)
//   opacity >= 1 → fade torn down, completion runs once
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::geometry::{Color, Rgba};

//=== Types ===============================================================

/// Whether the overlay reveals (`In`) or obscures (`Out`) the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Callback run on the scene when its fade finishes.
pub type FadeCompletion = Box<dyn FnOnce(&mut Scene)>;

//=== Fade ================================================================

pub struct Fade {
    color: Color,
    elapsed: f32,
    total: f32,
    opacity: f32,
    direction: FadeDirection,
    on_complete: Option<FadeCompletion>,
}

impl Fade {
    pub fn new(
        color: Color,
        duration: f32,
        direction: FadeDirection,
        on_complete: Option<FadeCompletion>,
    ) -> Self {
        Self {
            color,
            elapsed: 0.0,
            total: duration,
            opacity: 0.0,
            direction,
            on_complete,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Accumulated progress in `[0, ∞)`; the fade ends once it reaches 1.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// Overlay fill for the current progress.
    pub fn overlay(&self) -> Rgba {
        let alpha = match self.direction {
            FadeDirection::In => 1.0 - self.opacity,
            FadeDirection::Out => self.opacity,
        };
        self.color.with_alpha(alpha)
    }

    /// Advances by `step` and returns `true` once the fade is finished.
    pub(crate) fn advance(&mut self, step: f32) -> bool {
        self.elapsed += step;
        if self.total > 0.0 {
            self.opacity += step / self.total;
        } else {
            self.opacity = 1.0;
        }
        self.opacity >= 1.0
    }

    pub(crate) fn take_completion(&mut self) -> Option<FadeCompletion> {
        self.on_complete.take()
    }
}

impl fmt::Debug for Fade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fade")
            .field("color", &self.color)
            .field("direction", &self.direction)
            .field("elapsed", &self.elapsed)
            .field("total", &self.total)
            .field("opacity", &self.opacity)
            .field("has_completion", &self.on_complete.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_is_monotonic_and_finishes_on_first_full_frame() {
        let mut fade = Fade::new(Color::WHITE, 300.0, FadeDirection::Out, None);
        let mut last = fade.opacity();

        let steps = [50.0, 0.0, 100.0, 100.0];
        for step in steps {
            assert!(!fade.advance(step));
            assert!(fade.opacity() >= last);
            last = fade.opacity();
        }

        assert!(fade.advance(50.0));
        assert!(fade.opacity() >= 1.0);
    }

    #[test]
    fn overlay_alpha_follows_direction() {
        let mut fade_in = Fade::new(Color::WHITE, 100.0, FadeDirection::In, None);
        let mut fade_out = Fade::new(Color::WHITE, 100.0, FadeDirection::Out, None);

        fade_in.advance(25.0);
        fade_out.advance(25.0);

        assert_eq!(fade_in.overlay().alpha, 0.75);
        assert_eq!(fade_out.overlay().alpha, 0.25);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut fade = Fade::new(Color::BLACK, 0.0, FadeDirection::In, None);
        assert!(fade.advance(0.0));
    }

    #[test]
    fn completion_can_be_taken_once() {
        let mut fade = Fade::new(
            Color::BLACK,
            10.0,
            FadeDirection::Out,
            Some(Box::new(|scene: &mut Scene| scene.mark_for_deletion())),
        );

        assert!(fade.take_completion().is_some());
        assert!(fade.take_completion().is_none());
    }
}
