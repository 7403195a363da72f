//=========================================================================
// Selection Manager
//=========================================================================
//
// Decides what a click means for a scene with a selection attached.
//
// State machine (per click):
//
//   engaged? ──no──► PassThrough (every hit gets on_click)
//      │yes
//   secondary? ──yes──► Clear (deselect everything)
//      │no
//   selection empty? ──yes──► Select(hits)
//      │no
//   hits: 0 → Ignore · 1 → Act { target } · >1 → Ambiguous (dropped)
//
// The selection set is only mutated through the owning Scene, which
// updates each entity's `selected` flag in the same operation.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;
use crate::core::input::MouseButton;

//=== ClickPlan ===========================================================

/// What the scene must do with one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickPlan {
    /// Forward the click to every hit entity, no actors.
    PassThrough,

    /// Deselect every selected entity.
    Clear,

    /// Make the hit entities the new selection.
    Select,

    /// Forward the click to `target` with the selection as actors.
    Act { target: EntityId },

    /// More than one target hit while holding a selection; dropped.
    Ambiguous { hits: usize },

    /// Nothing to do.
    Ignore,
}

//=== Selection ===========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    engaged: bool,
    selected: Vec<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns selection mode on or off. Disengaging keeps the current
    /// selection; clearing it is a separate gesture.
    pub fn engage(&mut self, engaged: bool) {
        self.engaged = engaged;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Selected entities, in the order they were selected.
    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    //--- Click Planning ---------------------------------------------------

    pub fn plan(&self, button: MouseButton, hits: &[EntityId]) -> ClickPlan {
        if !self.engaged {
            return ClickPlan::PassThrough;
        }

        if button.is_secondary() {
            return ClickPlan::Clear;
        }

        if self.selected.is_empty() {
            return if hits.is_empty() {
                ClickPlan::Ignore
            } else {
                ClickPlan::Select
            };
        }

        match hits {
            [] => ClickPlan::Ignore,
            [target] => ClickPlan::Act { target: *target },
            _ => ClickPlan::Ambiguous { hits: hits.len() },
        }
    }

    //--- Set Mutation (scene-only) ----------------------------------------

    /// Adds `id` unless already present. Returns `true` if it was added.
    pub(super) fn insert(&mut self, id: EntityId) -> bool {
        if self.selected.contains(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    pub(super) fn take_all(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.selected)
    }

    pub(super) fn remove(&mut self, id: EntityId) {
        self.selected.retain(|&selected| selected != id);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
