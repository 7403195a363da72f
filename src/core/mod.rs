//=========================================================================
// Core
//=========================================================================
//
// Platform-independent engine systems.
//
// Architecture:
//   Controller ──owns──► SceneStack ──owns──► Scene ──owns──► Entity
//       │                                       │
//       ├─ loader (SceneFetcher, completions)   ├─ Selection, Fade
//       └─ pointer / hover                      └─ CommandQueue
//
//   render: the Surface seam every frame is painted through
//   input:  engine-level pointer events fed to the Controller
//
// Everything here runs on one thread. The only asynchronous boundary is
// the loader channel, drained by the Controller between frames.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod controller;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod render;
pub mod scene;
pub mod timing;

//=== Public API ==========================================================

pub use controller::{Controller, StackError};
pub use entity::{Entity, EntityId, EntityKind};
pub use scene::{Scene, SceneId, SceneSource};
