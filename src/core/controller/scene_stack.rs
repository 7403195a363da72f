//=========================================================================
// Scene Stack
//=========================================================================
//
// Ordered stack of owned scenes, bottom → top.
//
// The top scene is always the current one: it alone receives input and
// hover queries. `queue` additionally records the previous top as
// *outgoing*, and the oldest outgoing scene still on the stack is the one
// displayed until its deletion is swept:
//
//   [A]  ──queue(C)──►  [A, C]   current: C   displayed: A (outgoing)
//        ──A marked for deletion, sweep──►  [C]   current = displayed = C
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::{Scene, SceneId};

//=== StackError ==========================================================

/// Rejected push or queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("Scene {0:?} is already on the stack")]
    DuplicateScene(SceneId),

    #[error("Scene {0:?} is marked for deletion and cannot be stacked")]
    RetiredScene(SceneId),
}

//=== SceneStack ==========================================================

#[derive(Debug, Default)]
pub struct SceneStack {
    scenes: Vec<Scene>,
    outgoing: Vec<SceneId>,
}

impl SceneStack {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.iter().any(|scene| scene.id() == id)
    }

    /// Scene ids, bottom first.
    pub fn ids(&self) -> Vec<SceneId> {
        self.scenes.iter().map(Scene::id).collect()
    }

    /// Index of the current scene, `None` when empty.
    pub fn active_index(&self) -> Option<usize> {
        self.scenes.len().checked_sub(1)
    }

    pub fn current(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.last_mut()
    }

    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id() == id)
    }

    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.id() == id)
    }

    pub fn is_outgoing(&self, id: SceneId) -> bool {
        self.outgoing.contains(&id)
    }

    /// The scene to render: the oldest outgoing scene, else the current.
    pub fn displayed(&self) -> Option<&Scene> {
        self.displayed_index().map(|index| &self.scenes[index])
    }

    pub fn displayed_mut(&mut self) -> Option<&mut Scene> {
        match self.displayed_index() {
            Some(index) => Some(&mut self.scenes[index]),
            None => None,
        }
    }

    fn displayed_index(&self) -> Option<usize> {
        self.scenes
            .iter()
            .position(|scene| self.outgoing.contains(&scene.id()))
            .or_else(|| self.active_index())
    }

    //--- Mutation ---------------------------------------------------------

    fn validate(&self, scene: &Scene) -> Result<(), StackError> {
        if self.contains(scene.id()) {
            return Err(StackError::DuplicateScene(scene.id()));
        }
        if scene.is_pending_delete() {
            return Err(StackError::RetiredScene(scene.id()));
        }
        Ok(())
    }

    /// Places `scene` on top; it becomes current immediately.
    pub fn push(&mut self, scene: Scene) -> Result<SceneId, StackError> {
        self.validate(&scene)?;

        let id = scene.id();
        self.scenes.push(scene);
        debug!(target: "scene", "Pushed {:?} (depth {})", id, self.scenes.len());
        Ok(id)
    }

    /// Places `scene` on top and keeps the previous top displayed until it
    /// is deleted. On an empty stack this is a plain push.
    pub fn queue(&mut self, scene: Scene) -> Result<SceneId, StackError> {
        self.validate(&scene)?;

        let id = scene.id();
        if let Some(previous) = self.current().map(Scene::id) {
            if !self.outgoing.contains(&previous) {
                self.outgoing.push(previous);
            }
        }
        self.scenes.push(scene);
        debug!(target: "scene", "Queued {:?} (depth {})", id, self.scenes.len());
        Ok(id)
    }

    /// Removes and returns the top scene.
    pub fn pop(&mut self) -> Option<Scene> {
        let scene = self.scenes.pop()?;
        self.outgoing.retain(|&id| id != scene.id());
        debug!(target: "scene", "Popped {:?} (depth {})", scene.id(), self.scenes.len());
        Some(scene)
    }

    /// Drops every scene marked for deletion, wherever it sits, and
    /// returns their ids.
    pub fn sweep(&mut self) -> Vec<SceneId> {
        let mut removed = Vec::new();
        self.scenes.retain(|scene| {
            if scene.is_pending_delete() {
                removed.push(scene.id());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            self.outgoing.retain(|id| !removed.contains(id));
            debug!(target: "scene", "Swept {:?} (depth {})", removed, self.scenes.len());
        }
        removed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;

    fn scene(id: u64) -> Scene {
        Scene::new(SceneId(id), Tuning::default())
    }

    //=== Push / Pop ======================================================

    #[test]
    fn push_push_pop_returns_top() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();
        stack.push(scene(2)).unwrap();

        let popped = stack.pop().unwrap();

        assert_eq!(popped.id(), SceneId(2));
        assert_eq!(stack.current().unwrap().id(), SceneId(1));
        assert_eq!(stack.active_index(), Some(0));
    }

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut stack = SceneStack::new();
        assert!(stack.pop().is_none());
        assert_eq!(stack.active_index(), None);
        assert!(stack.displayed().is_none());
    }

    #[test]
    fn push_rejects_duplicates() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();

        assert_eq!(stack.push(scene(1)), Err(StackError::DuplicateScene(SceneId(1))));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn push_rejects_retired_scene() {
        let mut stack = SceneStack::new();
        let mut retired = scene(3);
        retired.mark_for_deletion();

        assert_eq!(stack.push(retired), Err(StackError::RetiredScene(SceneId(3))));
        assert!(stack.is_empty());
    }

    //=== Queue ===========================================================

    #[test]
    fn queue_on_empty_behaves_like_push() {
        let mut stack = SceneStack::new();
        stack.queue(scene(1)).unwrap();

        assert_eq!(stack.ids(), vec![SceneId(1)]);
        assert!(!stack.is_outgoing(SceneId(1)));
        assert_eq!(stack.displayed().unwrap().id(), SceneId(1));
    }

    #[test]
    fn queue_makes_new_scene_current_and_keeps_old_displayed() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();

        stack.queue(scene(3)).unwrap();

        assert_eq!(stack.ids(), vec![SceneId(1), SceneId(3)]);
        assert_eq!(stack.current().unwrap().id(), SceneId(3));
        assert_eq!(stack.displayed().unwrap().id(), SceneId(1));
    }

    #[test]
    fn sweep_of_outgoing_reveals_queued_scene() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();
        stack.queue(scene(3)).unwrap();

        stack.get_mut(SceneId(1)).unwrap().mark_for_deletion();
        let removed = stack.sweep();

        assert_eq!(removed, vec![SceneId(1)]);
        assert_eq!(stack.ids(), vec![SceneId(3)]);
        assert_eq!(stack.displayed().unwrap().id(), SceneId(3));
    }

    #[test]
    fn chained_queues_display_oldest_outgoing() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();
        stack.queue(scene(2)).unwrap();
        stack.queue(scene(3)).unwrap();

        assert_eq!(stack.current().unwrap().id(), SceneId(3));
        assert_eq!(stack.displayed().unwrap().id(), SceneId(1));

        stack.get_mut(SceneId(1)).unwrap().mark_for_deletion();
        stack.sweep();
        assert_eq!(stack.displayed().unwrap().id(), SceneId(2));
    }

    #[test]
    fn sweep_without_deletions_changes_nothing() {
        let mut stack = SceneStack::new();
        stack.push(scene(1)).unwrap();

        assert!(stack.sweep().is_empty());
        assert_eq!(stack.len(), 1);
    }
}
