//=========================================================================
// Strata Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Event Loop]
//         │                          │
//         ├─ with_tuning()           ├─ builds the Controller
//         ├─ with_fetcher()          ├─ loads and pushes the entry scene
//         ├─ with_entry()            └─ runs the platform (blocks)
//         └─ with_window_size()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::config::Tuning;
use crate::core::controller::Controller;
use crate::core::loader::{FileFetcher, SceneFetcher};
use crate::core::render::{NoSprites, SpriteResolver};
use crate::core::scene::SceneSource;
use crate::platform::{LogPresenter, Platform, PlatformError, Presenter, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Strata"
/// - **Window size**: 800x600
/// - **Tuning**: [`Tuning::default`]
/// - **Fetcher**: [`FileFetcher`] rooted at `assets/scenes`
/// - **Sprites**: none resolved
/// - **Presenter**: [`LogPresenter`]
/// - **Entry scene**: none (an empty window)
///
/// # Examples
///
/// ```no_run
/// use strata_engine::{EngineBuilder, SceneSource, Tuning};
///
/// EngineBuilder::new()
///     .with_title("Map")
///     .with_window_size(1024, 768)
///     .with_tuning(Tuning::default().with_transition_ms(500.0))
///     .with_entry(SceneSource::location("map1"))
///     .build()
///     .run()
///     .ok();
/// ```
pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    tuning: Tuning,
    fetcher: Option<Box<dyn SceneFetcher>>,
    sprites: Box<dyn SpriteResolver>,
    presenter: Box<dyn Presenter>,
    entry: Option<SceneSource>,
}

impl EngineBuilder {
    pub const DEFAULT_SCENE_ROOT: &'static str = "assets/scenes";

    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Strata".into(),
            width: 800,
            height: 600,
            tuning: Tuning::default(),
            fetcher: None,
            sprites: Box::new(NoSprites),
            presenter: Box::new(LogPresenter::new()),
            entry: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the logical window size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Sets where scene locations are fetched from.
    pub fn with_fetcher(mut self, fetcher: impl SceneFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn with_sprites(mut self, sprites: impl SpriteResolver + 'static) -> Self {
        self.sprites = Box::new(sprites);
        self
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// Sets the scene pushed before the first frame.
    pub fn with_entry(mut self, entry: SceneSource) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine ({} {}x{}, transition {}ms)",
            self.title, self.width, self.height, self.tuning.transition_ms
        );

        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Box::new(FileFetcher::new(Self::DEFAULT_SCENE_ROOT)));

        Engine {
            window: WindowConfig {
                title: self.title,
                width: self.width,
                height: self.height,
            },
            controller: Controller::new(self.tuning, fetcher, self.sprites),
            presenter: self.presenter,
            entry: self.entry,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Strata Engine runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Event Loop)
///         ├─► Window, pointer input → Controller
///         └─► RedrawRequested → Controller::step → Presenter
///
/// Loader thread: FileFetcher → LoadCompletion → collected on next step
/// ```
pub struct Engine {
    window: WindowConfig,
    controller: Controller,
    presenter: Box<dyn Presenter>,
    entry: Option<SceneSource>,
}

impl Engine {
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Requests the entry scene and places it on the stack.
    ///
    /// Called by [`Engine::run`]; a no-op once the entry has been pushed.
    pub fn enter(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };

        let scene = self.controller.load_scene(entry);
        match self.controller.push_scene(scene) {
            Ok(id) => info!("Entry scene {:?} pushed", id),
            Err(e) => warn!("Entry scene rejected: {}", e),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        info!("Starting engine runtime");
        self.enter();

        let platform = Platform::new(self.window, self.controller, self.presenter);
        info!("Platform initialized, entering event loop");

        platform.run()?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
