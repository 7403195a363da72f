//=========================================================================
// Completion Collector
//=========================================================================
//
// Controller-side end of the load channel, drained once per frame.
//
// Architecture:
//   LoadCompletion (any thread) → Sender<LoadOutcome> → drain() → Vec
//
// Draining is bounded so a burst of finished loads cannot stall a frame;
// anything left over is picked up on the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::{LoadCompletion, LoadOutcome};
use crate::core::scene::SceneId;

//=== CompletionCollector =================================================

pub struct CompletionCollector {
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
    max_per_frame: usize,
}

impl CompletionCollector {
    /// # Panics
    ///
    /// Panics if `max_per_frame == 0`.
    pub fn new(max_per_frame: usize) -> Self {
        assert!(max_per_frame > 0, "Loads per frame must be positive");
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            max_per_frame,
        }
    }

    /// Creates the completion handle for one load request.
    pub fn completion(&self, scene: SceneId, location: impl Into<String>) -> LoadCompletion {
        LoadCompletion::new(scene, location, self.sender.clone())
    }

    /// Takes at most `max_per_frame` finished loads, oldest first.
    pub fn drain(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();

        while outcomes.len() < self.max_per_frame {
            match self.receiver.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if outcomes.len() >= self.max_per_frame && !self.receiver.is_empty() {
            warn!(
                target: "loader",
                "Load backlog: applied {} completions, {} deferred",
                outcomes.len(),
                self.receiver.len()
            );
        }

        outcomes
    }

    /// Number of finished loads waiting to be drained.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl std::fmt::Debug for CompletionCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCollector")
            .field("pending", &self.receiver.len())
            .field("max_per_frame", &self.max_per_frame)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
