//=========================================================================
// Button
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Color;
use crate::core::scene::{CommandQueue, SceneCommand, SceneSource};

//=== Button ==============================================================

/// A titled button that transitions to another scene when clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    title: String,
    state: Option<SceneSource>,
    text_color: Color,
}

impl Button {
    pub fn new(title: impl Into<String>, state: Option<SceneSource>) -> Self {
        Self {
            title: title.into(),
            state,
            text_color: Color::WHITE,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The scene this button leads to, if any.
    pub fn state(&self) -> Option<&SceneSource> {
        self.state.as_ref()
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub(super) fn on_click(&self, commands: &mut CommandQueue) {
        match &self.state {
            Some(source) => commands.push(SceneCommand::Transition(source.clone())),
            None => debug!(target: "scene", "Button {:?} has no target scene", self.title),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
