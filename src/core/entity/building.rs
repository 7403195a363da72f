//=========================================================================
// Building
//=========================================================================
//
// Stationary entity that can dispatch units toward another entity.
//
// Send order lifecycle:
//   send_units(target, n, now) → SendOrder { next_spawn_at: now }
//        ↓ dispatch(origin, last_tick) while last_tick >= next_spawn_at
//   UnitSpawn emitted, remaining -= 1, next_spawn_at += interval
//        ↓ remaining == 0
//   order cleared (building may accept a new one)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::EntityId;
use crate::core::geometry::{Color, Vec2};
use crate::core::scene::{CommandQueue, SceneCommand};

//=== Constants ===========================================================

pub const BUILDING_TITLE: &str = "building";

//=== SendOrder ===========================================================

/// An in-progress dispatch of units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendOrder {
    pub target: EntityId,
    pub remaining: u32,
    pub next_spawn_at: f64,
    pub interval_ms: f64,
    pub travel_ms: f32,
}

/// A unit the owning scene must create this frame.
///
/// The target's position is resolved by the scene at spawn time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpawn {
    pub origin: Vec2,
    pub target: EntityId,
    pub travel_ms: f32,
}

//=== Building ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    title: String,
    hovered: bool,
    sending: Option<SendOrder>,
}

impl Building {
    pub fn new() -> Self {
        Self {
            title: BUILDING_TITLE.to_owned(),
            hovered: false,
            sending: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sending(&self) -> Option<&SendOrder> {
        self.sending.as_ref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_some()
    }

    /// Label color: green while selected, red while hovered, else white.
    pub fn label_color(&self, selected: bool) -> Color {
        if selected {
            Color::GREEN
        } else if self.hovered {
            Color::RED
        } else {
            Color::WHITE
        }
    }

    pub(super) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    //--- Orders -----------------------------------------------------------

    /// Schedules `count` units toward `target`, the first one at `now`.
    ///
    /// `now` is the owning scene's last frame timestamp. Returns `false`
    /// and leaves the building untouched if an order is already running.
    pub fn send_units(
        &mut self,
        target: EntityId,
        count: u32,
        now: f64,
        interval_ms: f64,
        travel_ms: f32,
    ) -> bool {
        if let Some(order) = &self.sending {
            warn!(
                target: "scene",
                "Already sending {} unit(s) to {:?}, skipping",
                order.remaining,
                order.target
            );
            return false;
        }

        if count == 0 {
            debug!(target: "scene", "Ignoring empty send order to {:?}", target);
            return false;
        }

        self.sending = Some(SendOrder {
            target,
            remaining: count,
            next_spawn_at: now,
            interval_ms,
            travel_ms,
        });
        true
    }

    /// Emits at most one unit per frame once its spawn time has come.
    pub(super) fn dispatch(&mut self, origin: Vec2, last_tick: f64) -> Option<UnitSpawn> {
        let order = self.sending.as_mut()?;
        if last_tick < order.next_spawn_at {
            return None;
        }

        let spawn = UnitSpawn {
            origin,
            target: order.target,
            travel_ms: order.travel_ms,
        };

        order.remaining -= 1;
        // An order that fell more than an interval behind restarts its
        // cadence from this frame instead of spawning every frame.
        let next = order.next_spawn_at + order.interval_ms;
        order.next_spawn_at = if last_tick >= next {
            last_tick + order.interval_ms
        } else {
            next
        };
        if order.remaining == 0 {
            self.sending = None;
        }

        Some(spawn)
    }

    //--- Interaction ------------------------------------------------------

    /// With a selection in hand, clicking a building orders one unit from
    /// the first selected entity toward it.
    pub(super) fn on_click(&self, own_id: EntityId, actors: &[EntityId], commands: &mut CommandQueue) {
        match actors.first() {
            Some(&from) => {
                debug!(target: "scene", "{:?} ordered to send units to {:?}", from, own_id);
                commands.push(SceneCommand::SendUnits {
                    from,
                    to: own_id,
                    count: 1,
                });
            }
            None => debug!(target: "scene", "Building {:?} clicked without a selection", own_id),
        }
    }
}

impl Default for Building {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
