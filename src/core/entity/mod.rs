//=========================================================================
// Entity
//=========================================================================
//
// The drawable, interactive unit owned by a Scene.
//
// Architecture:
//   Entity (shared base record)
//     ├─ position / size / color / selected / sprite
//     ├─ tween: Option<Tween>
//     └─ kind: EntityKind
//          ├─ Plain
//          ├─ Button(Button)     → queues scene transitions on click
//          └─ Building(Building) → hover label, send-units orders
//
// Frame flow (driven by Scene::render):
//   advance(timing) → tween step + building dispatch → Option<UnitSpawn>
//   paint(surface)  → fill/sprite + variant label
//
//=========================================================================

//=== Module Declarations =================================================

mod building;
mod button;
mod tween;

//=== Public API ==========================================================

pub use building::{Building, SendOrder, UnitSpawn};
pub use button::Button;
pub use tween::Tween;

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Color, Rect, Vec2};
use crate::core::render::{RenderError, Sprite, Surface, TextStyle};
use crate::core::scene::{CommandQueue, SceneSource};
use crate::core::timing::Timing;
use tween::TweenStep;

//=== Constants ===========================================================

/// Tween duration used when `animate` is called without one.
pub const DEFAULT_TWEEN_MS: f32 = 1000.0;

/// Default size of a plain entity.
pub const PLAIN_SIZE: Vec2 = Vec2::new(50.0, 50.0);

/// Default size of buttons and buildings.
pub const LABELED_SIZE: Vec2 = Vec2::new(100.0, 30.0);

//=== EntityId ============================================================

/// Identity of an entity within its scene.
///
/// Assigned by `Scene::add`; ids are never reused inside one scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

//=== EntityKind ==========================================================

/// Per-variant state and behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Plain,
    Button(Button),
    Building(Building),
}

//=== Entity ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
    selected: bool,
    sprite: Option<Sprite>,
    tween: Option<Tween>,
    /// Frame timestamp of the last advance; a repeat of that frame is a no-op.
    advanced_at: Option<f64>,
    kind: EntityKind,
}

impl Entity {
    //--- Construction -----------------------------------------------------

    fn with_kind(kind: EntityKind, size: Vec2) -> Self {
        Self {
            id: EntityId::default(),
            position: Vec2::ZERO,
            size,
            color: Color::BLACK,
            selected: false,
            sprite: None,
            tween: None,
            advanced_at: None,
            kind,
        }
    }

    /// A 50×50 black square with no behavior of its own.
    pub fn plain() -> Self {
        Self::with_kind(EntityKind::Plain, PLAIN_SIZE)
    }

    /// A clickable button that loads `state` when clicked.
    pub fn button(title: impl Into<String>, state: Option<SceneSource>) -> Self {
        Self::with_kind(EntityKind::Button(Button::new(title, state)), LABELED_SIZE)
    }

    pub fn building() -> Self {
        Self::with_kind(EntityKind::Building(Building::new()), LABELED_SIZE)
    }

    /// Builder-style position setter.
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.kind, EntityKind::Plain)
    }

    pub fn as_building(&self) -> Option<&Building> {
        match &self.kind {
            EntityKind::Building(building) => Some(building),
            _ => None,
        }
    }

    pub(crate) fn as_building_mut(&mut self) -> Option<&mut Building> {
        match &mut self.kind {
            EntityKind::Building(building) => Some(building),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            EntityKind::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// Attaches a sprite; the hit-box takes the sprite's natural size.
    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.size = sprite.size;
        self.sprite = Some(sprite);
    }

    pub fn tween(&self) -> Option<&Tween> {
        self.tween.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    //--- Animation --------------------------------------------------------

    /// Starts a tween toward `target`, replacing any tween in flight.
    ///
    /// `duration` defaults to [`DEFAULT_TWEEN_MS`].
    pub fn animate(&mut self, target: Vec2, duration: Option<f32>) -> &mut Self {
        self.tween = Some(Tween::new(target, duration.unwrap_or(DEFAULT_TWEEN_MS)));
        self
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the tween and any variant timers by one frame.
    ///
    /// A frame is consumed once: calling this again with a `last_tick` no
    /// later than the previous call's leaves the entity untouched.
    pub fn advance(&mut self, timing: &Timing) -> Option<UnitSpawn> {
        if self.advanced_at.is_some_and(|tick| timing.last_tick <= tick) {
            return None;
        }
        self.advanced_at = Some(timing.last_tick);

        if let Some(tween) = self.tween.as_mut() {
            match tween.advance(self.position, timing.step) {
                TweenStep::Moving(next) => self.position = next,
                TweenStep::Arrived(target) => {
                    trace!(target: "scene", "Entity {:?} arrived at {:?}", self.id, target);
                    self.position = target;
                    self.tween = None;
                }
            }
        }

        let origin = self.position;
        self.as_building_mut()
            .and_then(|building| building.dispatch(origin, timing.last_tick))
    }

    /// Paints the entity at its current position.
    pub fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        match &self.sprite {
            Some(sprite) => surface.draw_sprite(sprite, self.position)?,
            None => surface.fill_rect(self.bounds(), self.color.into())?,
        }

        let label = match &self.kind {
            EntityKind::Plain => None,
            EntityKind::Button(button) => Some((button.title(), button.text_color())),
            EntityKind::Building(building) => Some((
                building.title(),
                building.label_color(self.selected),
            )),
        };

        if let Some((text, color)) = label {
            let at = Vec2::new(
                self.position.x + self.size.x / 2.0,
                self.position.y + 0.7 * self.size.y,
            );
            surface.fill_text(text, at, &TextStyle::label(color))?;
        }

        Ok(())
    }

    //--- Interaction Hooks ------------------------------------------------

    /// Click handler. `actors` is the current selection when the click is
    /// routed through an engaged Selection, empty otherwise.
    pub fn on_click(&mut self, actors: &[EntityId], commands: &mut CommandQueue) {
        let id = self.id;
        match &mut self.kind {
            EntityKind::Plain => {}
            EntityKind::Button(button) => button.on_click(commands),
            EntityKind::Building(building) => building.on_click(id, actors, commands),
        }
    }

    pub fn on_hover_enter(&mut self) {
        if self.selected {
            return;
        }
        if let Some(building) = self.as_building_mut() {
            building.set_hovered(true);
        }
    }

    pub fn on_hover_exit(&mut self) {
        if self.selected {
            return;
        }
        if let Some(building) = self.as_building_mut() {
            building.set_hovered(false);
        }
    }

    /// Only the owning scene's selection may call these, so the selection
    /// set and the flag never disagree.
    pub(crate) fn on_select(&mut self) {
        self.selected = true;
    }

    pub(crate) fn on_deselect(&mut self) {
        self.selected = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Rgba;
    use crate::core::render::{DrawCommand, DrawList};
    use crate::core::scene::SceneCommand;

    fn frame(last_tick: f64, step: f64) -> Timing {
        Timing {
            start: 0.0,
            last_tick,
            step,
        }
    }

    //--- Animation --------------------------------------------------------

    #[test]
    fn animate_defaults_duration() {
        let mut entity = Entity::plain();
        entity.animate(Vec2::new(10.0, 10.0), None);

        assert_eq!(entity.tween().unwrap().remaining(), DEFAULT_TWEEN_MS);
    }

    #[test]
    fn animate_discards_tween_in_flight() {
        let mut entity = Entity::plain();
        entity.animate(Vec2::new(100.0, 0.0), Some(100.0));
        entity.advance(&frame(10.0, 10.0));

        entity.animate(Vec2::new(0.0, 100.0), Some(400.0));

        let tween = entity.tween().unwrap();
        assert_eq!(tween.target(), Vec2::new(0.0, 100.0));
        assert_eq!(tween.remaining(), 400.0);
        assert_eq!(tween.velocity(), None);
    }

    #[test]
    fn advance_lands_on_target_and_clears_tween() {
        let mut entity = Entity::plain().at(Vec2::new(3.0, 4.0));
        entity.animate(Vec2::new(103.0, 54.0), Some(100.0));

        for tick in 1..=4 {
            entity.advance(&frame(tick as f64 * 25.0, 25.0));
        }

        assert_eq!(entity.position, Vec2::new(103.0, 54.0));
        assert!(!entity.is_animating());
    }

    #[test]
    fn same_frame_is_advanced_once() {
        let mut entity = Entity::plain();
        entity.animate(Vec2::new(100.0, 0.0), Some(100.0));

        entity.advance(&frame(10.0, 10.0));
        entity.advance(&frame(10.0, 10.0));
        assert_eq!(entity.position, Vec2::new(10.0, 0.0));

        entity.advance(&frame(20.0, 10.0));
        assert_eq!(entity.position, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn converges_after_rounded_steps() {
        let mut entity = Entity::plain();
        entity.animate(Vec2::new(10.0, 10.0), Some(1.0));

        for tick in 1..=5 {
            entity.advance(&frame(tick as f64, 0.2));
        }

        assert_eq!(entity.position, Vec2::new(10.0, 10.0));
        assert!(!entity.is_animating());
    }

    //--- Painting ---------------------------------------------------------

    #[test]
    fn plain_paints_flat_fill() {
        let entity = Entity::plain().at(Vec2::new(5.0, 6.0));
        let mut list = DrawList::new(800.0, 600.0);

        entity.paint(&mut list).unwrap();

        assert_eq!(
            list.commands(),
            &[DrawCommand::FillRect {
                rect: Rect::new(Vec2::new(5.0, 6.0), PLAIN_SIZE),
                fill: Rgba::from(Color::BLACK),
            }]
        );
    }

    #[test]
    fn button_paints_centered_title() {
        let entity = Entity::button("new game", None).at(Vec2::new(200.0, 200.0));
        let mut list = DrawList::new(800.0, 600.0);

        entity.paint(&mut list).unwrap();

        match &list.commands()[1] {
            DrawCommand::FillText { text, at, style } => {
                assert_eq!(text, "new game");
                assert_eq!(*at, Vec2::new(250.0, 221.0));
                assert_eq!(style.color, Color::WHITE);
            }
            other => panic!("expected label, got {:?}", other),
        }
    }

    #[test]
    fn sprite_replaces_fill_and_size() {
        let mut entity = Entity::building();
        entity.set_sprite(Sprite {
            key: "tower.png".into(),
            size: Vec2::new(64.0, 96.0),
        });
        let mut list = DrawList::new(800.0, 600.0);

        entity.paint(&mut list).unwrap();

        assert_eq!(entity.size, Vec2::new(64.0, 96.0));
        assert!(matches!(&list.commands()[0], DrawCommand::Sprite { key, .. } if key == "tower.png"));
    }

    //--- Hover & Selection ------------------------------------------------

    fn label_color(entity: &Entity) -> Color {
        let mut list = DrawList::new(800.0, 600.0);
        entity.paint(&mut list).unwrap();
        list.commands()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCommand::FillText { style, .. } => Some(style.color),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn building_hover_toggles_label() {
        let mut entity = Entity::building();

        entity.on_hover_enter();
        assert_eq!(label_color(&entity), Color::RED);

        entity.on_hover_exit();
        assert_eq!(label_color(&entity), Color::WHITE);
    }

    #[test]
    fn selection_visual_wins_over_hover() {
        let mut entity = Entity::building();
        entity.on_select();

        entity.on_hover_enter();
        assert_eq!(label_color(&entity), Color::GREEN);

        entity.on_deselect();
        assert_eq!(label_color(&entity), Color::WHITE);
    }

    //--- Click ------------------------------------------------------------

    #[test]
    fn plain_click_is_noop() {
        let mut entity = Entity::plain();
        let mut commands = CommandQueue::new();

        entity.on_click(&[EntityId(3)], &mut commands);

        assert!(commands.is_empty());
    }

    #[test]
    fn building_click_with_actor_orders_units() {
        let mut entity = Entity::building();
        entity.assign_id(EntityId(7));
        let mut commands = CommandQueue::new();

        entity.on_click(&[EntityId(2), EntityId(5)], &mut commands);

        assert_eq!(
            commands.take(),
            vec![SceneCommand::SendUnits {
                from: EntityId(2),
                to: EntityId(7),
                count: 1,
            }]
        );
    }
}
