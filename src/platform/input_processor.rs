//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit pointer events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → Controller
//
// Stateful cursor tracking: Winit reports button presses without a
// position, so the last CursorMoved position is cached and attached to
// every click. Positions are converted to logical pixels using the
// window's scale factor.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton as WinitMouseButton},
};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;
use crate::core::input::{InputEvent, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: Vec2,
    scale_factor: f64,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            cursor: Vec2::ZERO,
            scale_factor: 1.0,
        }
    }

    //--- State Management -------------------------------------------------

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Records the cursor and emits a move event in logical pixels.
    pub(crate) fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        let logical = position.to_logical::<f32>(self.scale_factor);
        self.cursor = Vec2::new(logical.x, logical.y);
        InputEvent::PointerMoved {
            x: self.cursor.x,
            y: self.cursor.y,
        }
    }

    /// Converts a button press into a click at the cached cursor position.
    ///
    /// Releases carry no meaning for the engine and yield `None`.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        match state {
            ElementState::Pressed => Some(InputEvent::PointerClicked {
                button: MouseButton::from(button),
                x: self.cursor.x,
                y: self.cursor.y,
            }),
            ElementState::Released => None,
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Vec2 {
        self.cursor
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
