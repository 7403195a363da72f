//=========================================================================
// Strata Engine
//
// A small 2-D scene engine: stacked scenes of interactive entities with
// tweened motion, hit-testing, hover and selection tracking, and fade
// transitions between scenes.
//
// Typical usage:
// ```no_run
// use strata_engine::{EngineBuilder, FileFetcher, SceneSource};
//
// EngineBuilder::new()
//     .with_fetcher(FileFetcher::new("assets/scenes"))
//     .with_entry(SceneSource::location("menu"))
//     .build()
//     .run()
//     .ok();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene/entity state machine and the frame loop. It is
// platform independent and can be driven headless with a `DrawList`.
//
pub mod config;
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit window and event loop and is not part of the
// public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use config::Tuning;
pub use core::loader::FileFetcher;
pub use core::scene::SceneSource;
pub use engine::{Engine, EngineBuilder};
pub use platform::{LogPresenter, PlatformError, Presenter};
