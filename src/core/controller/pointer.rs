//=========================================================================
// Pointer Tracking
//=========================================================================
//
// Pointer coordinates recorded by input callbacks, and the hover set the
// controller diffs against once per frame.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;
use crate::core::geometry::Vec2;
use crate::core::scene::SceneId;

//=== Pointer =============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    current: Vec2,
    previous: Vec2,
    moved: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.previous = self.current;
        self.current = position;
        self.moved = true;
    }

    /// Returns whether the pointer moved since the last call.
    pub fn take_moved(&mut self) -> bool {
        std::mem::replace(&mut self.moved, false)
    }
}

//=== HoverSet ============================================================

/// Entities that received enter and exit notifications in one update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverDiff {
    pub entered: Vec<EntityId>,
    pub exited: Vec<EntityId>,
}

impl HoverDiff {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

/// Entities under the pointer as of the last hover update, tagged with the
/// scene they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverSet {
    scene: Option<SceneId>,
    hovered: Vec<EntityId>,
}

impl HoverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.hovered
    }

    pub fn clear(&mut self) {
        self.scene = None;
        self.hovered.clear();
    }

    /// Replaces the set with `hits` and returns the difference both ways.
    ///
    /// A set recorded for another scene is discarded without exit events;
    /// its entities are not addressable in `scene`.
    pub fn update(&mut self, scene: SceneId, hits: Vec<EntityId>) -> HoverDiff {
        if self.scene != Some(scene) {
            self.hovered.clear();
            self.scene = Some(scene);
        }

        let exited = self
            .hovered
            .iter()
            .filter(|id| !hits.contains(id))
            .copied()
            .collect();
        let entered = hits
            .iter()
            .filter(|id| !self.hovered.contains(id))
            .copied()
            .collect();

        self.hovered = hits;
        HoverDiff { entered, exited }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
