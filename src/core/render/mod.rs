//=========================================================================
// Render Seam
//=========================================================================
//
// The core never talks to a device. Scenes and entities issue primitive
// calls against a `Surface`; the platform layer decides what to do with
// them.
//
// Architecture:
//   Scene::render() → Entity::render() → Surface (trait)
//                                           ├─ DrawList (records commands)
//                                           └─ any backend implementing it
//
//=========================================================================

//=== Module Declarations =================================================

mod draw_list;

//=== Public API ==========================================================

pub use draw_list::{DrawCommand, DrawList};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Color, Rect, Rgba, Vec2};

//=== RenderError =========================================================

/// A surface refused a drawing call.
///
/// Scenes log these per entity and keep rendering the remaining entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("surface rejected draw call: {0}")]
    Rejected(String),

    #[error("sprite {0:?} is not available on this surface")]
    MissingSprite(String),
}

//=== Text ================================================================

/// Horizontal anchoring of text relative to its draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

/// Font and paint parameters for a `fill_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS-like font descriptor, e.g. `400 16px sans-serif`.
    pub font: &'static str,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub const LABEL_FONT: &'static str = "400 16px sans-serif";
    pub const STATUS_FONT: &'static str = "italic 400 12px sans-serif";

    /// Centered label text, as used by buttons and buildings.
    pub fn label(color: Color) -> Self {
        Self {
            font: Self::LABEL_FONT,
            align: TextAlign::Center,
            color,
        }
    }

    /// Small status text (loading indicator).
    pub fn status(color: Color) -> Self {
        Self {
            font: Self::STATUS_FONT,
            align: TextAlign::Start,
            color,
        }
    }
}

//=== Sprite ==============================================================

/// A resolved image reference with its natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub key: String,
    pub size: Vec2,
}

/// Resolves payload sprite references into drawable sprites.
///
/// This is the image-loading collaborator. Returning `None` leaves the
/// entity with its flat fill.
pub trait SpriteResolver {
    fn resolve(&mut self, reference: &str) -> Option<Sprite>;
}

/// Resolver that knows no sprites at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSprites;

impl SpriteResolver for NoSprites {
    fn resolve(&mut self, _reference: &str) -> Option<Sprite> {
        None
    }
}

//=== Surface Trait =======================================================

/// A 2-D drawing context.
///
/// Supports exactly the primitives the engine needs: clearing, filled
/// rectangles, aligned text and sprite blits.
pub trait Surface {
    /// Drawable area in surface units.
    fn size(&self) -> Vec2;

    fn clear_rect(&mut self, rect: Rect) -> Result<(), RenderError>;

    fn fill_rect(&mut self, rect: Rect, fill: Rgba) -> Result<(), RenderError>;

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) -> Result<(), RenderError>;

    fn draw_sprite(&mut self, sprite: &Sprite, at: Vec2) -> Result<(), RenderError>;

    /// Convenience: the rectangle covering the whole surface.
    fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size())
    }
}
