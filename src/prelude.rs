//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use strata_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::config::Tuning;
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::platform::{LogPresenter, PlatformError, Presenter};

// Controller & scenes
pub use crate::core::controller::{Controller, StackError};
pub use crate::core::scene::{
    FadeDirection, LoadState, Scene, SceneCommand, SceneId, ScenePayload, SceneSource,
};

// Entities
pub use crate::core::entity::{Entity, EntityId, EntityKind};
pub use crate::core::geometry::{Color, Rect, Vec2};

// Rendering
pub use crate::core::render::{DrawCommand, DrawList, Sprite, SpriteResolver, Surface};

// Input & loading
pub use crate::core::input::{InputEvent, MouseButton};
pub use crate::core::loader::{FetchError, FileFetcher, LoadCompletion, SceneFetcher};
