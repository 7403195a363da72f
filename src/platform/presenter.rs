//=========================================================================
// Presenter
//=========================================================================
//
// Final stage of a frame: receives the commands a scene recorded into the
// platform's DrawList and puts them on screen.
//
// The engine is backend agnostic; a pixel rasterizer or GPU renderer
// plugs in here. The default presenter only logs.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;
use crate::core::render::DrawCommand;

//=== Presenter Trait =====================================================

pub trait Presenter {
    /// Presents one frame of `commands` on a surface of `size`.
    fn present(&mut self, size: Vec2, commands: &[DrawCommand]);
}

//=== LogPresenter ========================================================

/// Presenter that traces a summary of each frame.
#[derive(Debug, Default)]
pub struct LogPresenter {
    frames: u64,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, size: Vec2, commands: &[DrawCommand]) {
        self.frames += 1;
        trace!(
            target: "platform",
            "Frame {}: {} commands on {}x{}",
            self.frames,
            commands.len(),
            size.x,
            size.y
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
