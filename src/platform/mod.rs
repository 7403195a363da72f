//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's Controller.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌─────────────────────────────────────────────┐
//  │  Winit Event Loop                           │
//  │   ├─ CursorMoved / MouseInput               │
//  │   │    ↓ InputProcessor                     │
//  │   │    ↓ Controller::handle_input (at once) │
//  │   │                                         │
//  │   └─ RedrawRequested  (frame boundary)      │
//  │        ↓ Controller::step(now, DrawList)    │
//  │        ↓ Presenter::present(commands)       │
//  │        ↓ request_redraw                     │
//  └─────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Single thread**: input callbacks and frame steps all run on the
//   event-loop thread and never interleave
// - **RedrawRequested = frame boundary**: one `step` per redraw, driven by
//   a monotonic clock started when the platform is created
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;
mod presenter;

//=== Public API ==========================================================

pub use presenter::{LogPresenter, Presenter};

//=== External Crates =====================================================

use std::time::Instant;

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::controller::Controller;
use crate::core::render::{DrawList, Surface};
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal - if the event loop can't be created, the engine
/// cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(config, controller, presenter)`
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: User closes window → loop exits → `run` returns
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    config: WindowConfig,

    controller: Controller,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    /// Surface every frame is recorded into.
    draw_list: DrawList,

    presenter: Box<dyn Presenter>,

    clock: Instant,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet - that happens lazily in `resumed()`.
    pub fn new(config: WindowConfig, controller: Controller, presenter: Box<dyn Presenter>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        let draw_list = DrawList::new(config.width as f32, config.height as f32);
        Self {
            window: None,
            config,
            controller,
            input_processor: InputProcessor::new(),
            draw_list,
            presenter,
            clock: Instant::now(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// terminates abnormally.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    /// Runs one frame and hands the recorded commands to the presenter.
    fn render_frame(&mut self) {
        let now = self.now_ms();
        self.controller.step(now, &mut self.draw_list);

        let commands = self.draw_list.take();
        trace!(target: "platform", "Presenting {} draw commands", commands.len());
        self.presenter.present(self.draw_list.size(), &commands);
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let logical: LogicalSize<f32> = size.to_logical(scale_factor);
        debug!(
            target: "platform",
            "Surface resized to {}x{} (scale {})",
            logical.width,
            logical.height,
            scale_factor
        );
        self.draw_list.resize(logical.width, logical.height);
        self.input_processor.set_scale_factor(scale_factor);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.resize(window.inner_size(), window.scale_factor());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let scale = self.window.as_ref().map_or(1.0, Window::scale_factor);
                self.resize(size, scale);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.window.as_ref().map(Window::inner_size) {
                    self.resize(size, scale_factor);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor_moved(position);
                self.controller.handle_input(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(event) = self.input_processor.process_mouse_button(button, state) {
                    trace!(target: "platform::input", "{:?}", event);
                    self.controller.handle_input(event);
                }
            }

            WindowEvent::RedrawRequested => {
                self.render_frame();

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Focused, keyboard, etc. (not used by the engine)
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::Tuning;
    use crate::core::geometry::Vec2;
    use crate::core::loader::{LoadCompletion, SceneFetcher};
    use crate::core::render::{DrawCommand, NoSprites};
    use crate::core::input::InputEvent;
    use crate::core::scene::{ScenePayload, SceneSource};

    struct NoFetch;

    impl SceneFetcher for NoFetch {
        fn fetch(&mut self, _location: &str, _completion: LoadCompletion) {}
    }

    /// Presenter that keeps every frame it is given.
    #[derive(Clone, Default)]
    struct Recorder {
        frames: Rc<RefCell<Vec<Vec<DrawCommand>>>>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, _size: Vec2, commands: &[DrawCommand]) {
            self.frames.borrow_mut().push(commands.to_vec());
        }
    }

    fn config() -> WindowConfig {
        WindowConfig {
            title: "test".into(),
            width: 320,
            height: 240,
        }
    }

    fn platform_with(recorder: &Recorder) -> Platform {
        let mut controller =
            Controller::new(Tuning::default(), Box::new(NoFetch), Box::new(NoSprites));
        let payload = ScenePayload::from_json(r#"{ "units": [ { "coords": [0, 0] } ] }"#).unwrap();
        let scene = controller.load_scene(SceneSource::inline(payload));
        controller.push_scene(scene).unwrap();
        Platform::new(config(), controller, Box::new(recorder.clone()))
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation() {
        let platform = platform_with(&Recorder::default());
        assert!(platform.window().is_none(), "Window should be created lazily");
        assert_eq!(platform.draw_list.size(), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn frame_is_presented_and_list_emptied() {
        let recorder = Recorder::default();
        let mut platform = platform_with(&recorder);

        platform.render_frame();

        let frames = recorder.frames.borrow();
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0][0], DrawCommand::Clear(_)));
        assert!(platform.draw_list.commands().is_empty());
    }

    #[test]
    fn input_reaches_controller() {
        let mut platform = platform_with(&Recorder::default());

        platform.controller.handle_input(InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        platform.render_frame();

        assert_eq!(platform.controller.hovered().len(), 1);
    }

    #[test]
    fn resize_tracks_logical_size() {
        let mut platform = platform_with(&Recorder::default());

        platform.resize(PhysicalSize::new(1600, 1200), 2.0);

        assert_eq!(platform.draw_list.size(), Vec2::new(800.0, 600.0));
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
