//=========================================================================
// Command Queue
//=========================================================================
//
// Queue for commands issued by entity handlers.
//
// Entities cannot reach their scene or the controller while they are
// being dispatched to, so they queue what they want here. The scene
// applies entity-local commands itself and hands the rest up to the
// controller.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneSource;
use crate::core::entity::EntityId;

//=== SceneCommand ========================================================

/// A request raised by an entity during click dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Fade the current scene out and bring `source` in (controller-level).
    Transition(SceneSource),

    /// Order building `from` to send `count` units to `to` (scene-level).
    SendUnits {
        from: EntityId,
        to: EntityId,
        count: u32,
    },
}

//=== CommandQueue ========================================================

/// Queue for entity-issued commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandQueue {
    queue: Vec<SceneCommand>,
}

impl CommandQueue {
    /// Creates a new empty command queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a command.
    pub fn push(&mut self, command: SceneCommand) {
        self.queue.push(command);
    }

    /// Returns an iterator over the queued commands.
    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.queue.iter()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all commands from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.queue)
    }
}

impl IntoIterator for CommandQueue {
    type Item = SceneCommand;
    type IntoIter = std::vec::IntoIter<SceneCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.into_iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
