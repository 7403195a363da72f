//=========================================================================
// Draw List
//=========================================================================
//
// Recording `Surface`: every call is stored as a `DrawCommand` for a
// presenter (or a test) to inspect after the frame.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{RenderError, Sprite, Surface, TextStyle};
use crate::core::geometry::{Rect, Rgba, Vec2};

//=== DrawCommand =========================================================

/// One recorded primitive call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    FillRect { rect: Rect, fill: Rgba },
    FillText { text: String, at: Vec2, style: TextStyle },
    Sprite { key: String, at: Vec2 },
}

//=== DrawList ============================================================

/// A surface that records instead of drawing.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::with_capacity(64),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Takes ownership of the recorded commands, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text of every `FillText` command, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Clear(rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: Rgba) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::FillRect { rect, fill });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::FillText {
            text: text.to_owned(),
            at,
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: &Sprite, at: Vec2) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Sprite {
            key: sprite.key.clone(),
            at,
        });
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Color;

    #[test]
    fn records_calls_in_order() {
        let mut list = DrawList::new(800.0, 600.0);
        let bounds = list.bounds();

        list.clear_rect(bounds).unwrap();
        list.fill_rect(bounds, Color::WHITE.into()).unwrap();
        list.fill_text("hi", Vec2::new(1.0, 2.0), &TextStyle::label(Color::WHITE))
            .unwrap();

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Clear(bounds));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hi"]);
    }

    #[test]
    fn take_leaves_list_empty() {
        let mut list = DrawList::new(10.0, 10.0);
        let bounds = list.bounds();
        list.clear_rect(bounds).unwrap();

        let taken = list.take();

        assert_eq!(taken.len(), 1);
        assert!(list.commands().is_empty());
    }
}
