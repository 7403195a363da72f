//=========================================================================
// Engine Tuning
//=========================================================================
//
// Every timing and layout constant of the engine, in one `Copy` value.
//
// The Controller owns a `Tuning` and hands a copy to each Scene it
// creates, so a scene never reaches for a global.
//
// All durations are in milliseconds of frame-clock time.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Color, Vec2};

//=== Tuning ==============================================================

/// Engine-wide timing and layout constants.
///
/// # Default Values
///
/// - **transition_ms**: 300, **transition_color**: white
/// - **unit_spawn_interval_ms**: 800, **unit_travel_ms**: 2000
/// - **menu_target**: (200, 200), **menu_tween_ms**: 500
/// - **max_loads_per_frame**: 32
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Length of each half of a button-triggered scene transition.
    pub transition_ms: f32,

    /// Overlay color of transition fades.
    pub transition_color: Color,

    /// Delay between two units spawned by one send order.
    pub unit_spawn_interval_ms: f64,

    /// Travel time of a spawned unit toward its target.
    pub unit_travel_ms: f32,

    /// Where menu buttons slide to when a scene loads.
    pub menu_target: Vec2,

    /// How long the menu slide-in takes.
    pub menu_tween_ms: f32,

    /// Upper bound on scene-load completions applied in one frame.
    pub max_loads_per_frame: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            transition_ms: 300.0,
            transition_color: Color::WHITE,
            unit_spawn_interval_ms: 800.0,
            unit_travel_ms: 2000.0,
            menu_target: Vec2::new(200.0, 200.0),
            menu_tween_ms: 500.0,
            max_loads_per_frame: 32,
        }
    }
}

impl Tuning {
    /// Sets the transition half-length.
    ///
    /// # Panics
    ///
    /// Panics if `ms <= 0.0`.
    pub fn with_transition_ms(mut self, ms: f32) -> Self {
        assert!(ms > 0.0, "Transition duration must be positive, got {}", ms);
        self.transition_ms = ms;
        self
    }

    /// Sets the spacing and travel time of spawned units.
    ///
    /// # Panics
    ///
    /// Panics if either value is not positive.
    pub fn with_unit_timing(mut self, spawn_interval_ms: f64, travel_ms: f32) -> Self {
        assert!(spawn_interval_ms > 0.0, "Spawn interval must be positive");
        assert!(travel_ms > 0.0, "Unit travel time must be positive");
        self.unit_spawn_interval_ms = spawn_interval_ms;
        self.unit_travel_ms = travel_ms;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
