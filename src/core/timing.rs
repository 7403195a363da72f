//=========================================================================
// Frame Timing
//=========================================================================
//
// Frame-clock bookkeeping. Only `Controller::step` advances it; every
// other consumer receives it by reference.
//
//=========================================================================

/// Frame-clock state, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Timestamp the clock was started at.
    pub start: f64,

    /// Timestamp of the most recent frame.
    pub last_tick: f64,

    /// Time elapsed between the two most recent frames.
    pub step: f64,
}

impl Timing {
    pub fn new(start: f64) -> Self {
        Self {
            start,
            last_tick: start,
            step: 0.0,
        }
    }

    /// Records a new frame at `now` and returns the step duration.
    ///
    /// A clock that runs backwards yields a zero step rather than a
    /// negative one.
    pub fn tick(&mut self, now: f64) -> f64 {
        self.step = (now - self.last_tick).max(0.0);
        self.last_tick = now;
        self.step
    }

    /// Step duration as `f32`, the precision entities animate with.
    pub fn step_f32(&self) -> f32 {
        self.step as f32
    }

    /// Time since the clock started.
    pub fn elapsed(&self) -> f64 {
        self.last_tick - self.start
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(0.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
