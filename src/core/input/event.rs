//=========================================================================
// Pointer Event Types
//
// Defines the internal representation of pointer input.
//
// This module abstracts away platform-specific input (e.g. Winit, SDL)
// into a unified, engine-friendly format consumed by the Controller.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    Controller::handle_input()
//         ├─ PointerMoved   → pointer state (hits deferred to step())
//         └─ PointerClicked → hit-test → Selection / Entity::on_click
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crate::core::geometry::Vec2;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations (e.g., Winit's
/// `MouseButton`, SDL's button codes) into a stable, portable enum.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

impl MouseButton {
    /// The secondary discriminator used by engaged selection: only the
    /// right button clears a selection, every other button acts as primary.
    pub fn is_secondary(self) -> bool {
        matches!(self, MouseButton::Right)
    }
}

//=== InputEvent ==========================================================

/// Pointer event in surface coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a new absolute position.
    PointerMoved { x: f32, y: f32 },

    /// A button was pressed at the given position.
    PointerClicked { button: MouseButton, x: f32, y: f32 },

    /// Unrecognized or unsupported event, ignored by the Controller.
    Unidentified,
}

impl InputEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            Self::PointerMoved { x, y } | Self::PointerClicked { x, y, .. } => {
                Some(Vec2::new(x, y))
            }
            Self::Unidentified => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
