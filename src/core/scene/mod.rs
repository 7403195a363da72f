//=========================================================================
// Scene
//=========================================================================
//
// An ordered collection of entities with hit-testing, an optional fade
// overlay, a load state and an optional selection manager.
//
// Architecture:
//   Scene
//     ├─ entities: Vec<Entity>          (insertion order = paint order)
//     ├─ selection: Option<Selection>   (attached by load)
//     ├─ fade: Option<Fade>             (at most one at a time)
//     └─ load_state: LoadState          (Ready / Loading / Failed)
//
// Frame flow (Scene::render):
//   clear → [status text & return if not ready]
//         → per entity: advance + paint (failures logged, frame continues)
//         → spawn queued units → fade overlay → fade completion
//
// Click flow (Scene::handle_click):
//   query_hits → Selection::plan → entity on_click → CommandQueue
//     → SendUnits applied here, everything else returned to the caller
//
//=========================================================================

//=== Module Declarations =================================================

mod command_queue;
mod fade;
mod payload;
mod selection;

//=== Public API ==========================================================

pub use command_queue::{CommandQueue, SceneCommand};
pub use fade::{Fade, FadeCompletion, FadeDirection};
pub use payload::{
    BuildingEntry, MenuOption, PayloadError, SceneSettings, ScenePayload, SceneSource, UnitEntry,
};
pub use selection::{ClickPlan, Selection};

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::Tuning;
use crate::core::entity::{Entity, EntityId, UnitSpawn};
use crate::core::geometry::{Color, Rect, Vec2};
use crate::core::input::MouseButton;
use crate::core::render::{SpriteResolver, Surface, TextStyle};
use crate::core::timing::Timing;

//=== Constants ===========================================================

/// Offset of the status text from the bottom-right corner of the surface.
const STATUS_INSET: Vec2 = Vec2::new(100.0, 10.0);

pub const LOADING_TEXT: &str = "loading...";
pub const FAILED_TEXT: &str = "load failed";

//=== SceneId =============================================================

/// Identity of a scene within its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

//=== LoadState ===========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Ready,
    Loading { location: String },
    Failed { location: String, reason: String },
}

//=== Scene ===============================================================

pub struct Scene {
    id: SceneId,
    tuning: Tuning,
    entities: Vec<Entity>,
    next_entity_id: u64,
    selection: Option<Selection>,
    fade: Option<Fade>,
    load_state: LoadState,
    pending_delete: bool,
    last_tick: f64,
    rendered: bool,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    /// Creates an empty, ready scene.
    pub fn new(id: SceneId, tuning: Tuning) -> Self {
        Self {
            id,
            tuning,
            entities: Vec::new(),
            next_entity_id: 0,
            selection: None,
            fade: None,
            load_state: LoadState::Ready,
            pending_delete: false,
            last_tick: 0.0,
            rendered: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Timestamp of the last frame this scene was rendered in.
    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    //--- Entities ---------------------------------------------------------

    /// Appends `entity`, assigns it a fresh id and returns it for chaining.
    ///
    /// No deduplication: adding an equal entity twice yields two entries.
    pub fn add(&mut self, mut entity: Entity) -> &mut Entity {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        entity.assign_id(id);

        let index = self.entities.len();
        self.entities.push(entity);
        &mut self.entities[index]
    }

    /// Removes every entity and empties the selection.
    pub fn flush(&mut self) {
        self.clear_selection();
        self.entities.clear();
        debug!(target: "scene", "Scene {:?} flushed", self.id);
    }

    /// Ids of every entity whose bounds contain `point`, edges included,
    /// in insertion order. A scene that is not ready has no hits.
    pub fn query_hits(&self, point: Vec2) -> Vec<EntityId> {
        if !self.is_ready() {
            return Vec::new();
        }

        self.entities
            .iter()
            .filter(|entity| entity.bounds().contains(point))
            .map(Entity::id)
            .collect()
    }

    //--- Load State -------------------------------------------------------

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.load_state, LoadState::Failed { .. })
    }

    pub(crate) fn begin_loading(&mut self, location: impl Into<String>) {
        self.load_state = LoadState::Loading {
            location: location.into(),
        };
    }

    pub(crate) fn fail_loading(&mut self, reason: impl Into<String>) {
        let location = match &self.load_state {
            LoadState::Loading { location } | LoadState::Failed { location, .. } => {
                location.clone()
            }
            LoadState::Ready => String::new(),
        };
        self.load_state = LoadState::Failed {
            location,
            reason: reason.into(),
        };
    }

    /// Populates the scene from a payload and marks it ready.
    ///
    /// Always attaches a fresh Selection; `scene.selection` engages it.
    /// Menu options become buttons sliding to the menu target, units
    /// become plain entities and buildings get their sprite if it can be
    /// resolved.
    pub fn load(&mut self, payload: &ScenePayload, sprites: &mut dyn SpriteResolver) {
        self.clear_selection();
        let mut selection = Selection::new();
        if let Some(engaged) = payload.settings().selection {
            selection.engage(engaged);
        }
        self.selection = Some(selection);

        let tuning = self.tuning;
        for option in payload.menu_options() {
            self.add(Entity::button(option.title, option.state))
                .animate(tuning.menu_target, Some(tuning.menu_tween_ms));
        }

        for unit in payload.units() {
            self.add(Entity::plain().at(unit.coords));
        }

        for entry in payload.buildings() {
            let building = self.add(Entity::building().at(entry.coords));
            if let Some(reference) = entry.sprite {
                match sprites.resolve(&reference) {
                    Some(sprite) => building.set_sprite(sprite),
                    None => warn!(
                        target: "scene",
                        "Sprite '{}' could not be resolved; keeping flat fill",
                        reference
                    ),
                }
            }
        }

        self.load_state = LoadState::Ready;
        info!(
            target: "scene",
            "Scene {:?} loaded with {} entities",
            self.id,
            self.entities.len()
        );
    }

    //--- Fade & Deletion --------------------------------------------------

    /// Starts a fade, replacing any fade in progress.
    pub fn begin_fade(
        &mut self,
        color: Color,
        duration: f32,
        direction: FadeDirection,
        on_complete: Option<FadeCompletion>,
    ) {
        if self.fade.is_some() {
            debug!(target: "scene", "Scene {:?}: new fade replaces one in progress", self.id);
        }
        self.fade = Some(Fade::new(color, duration, direction, on_complete));
    }

    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    /// Flags the scene for removal on the controller's next frame.
    pub fn mark_for_deletion(&mut self) {
        debug!(target: "scene", "Scene {:?} marked for deletion", self.id);
        self.pending_delete = true;
    }

    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    //--- Selection --------------------------------------------------------

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    /// Returns the scene's selection, attaching a disengaged one if needed.
    pub fn attach_selection(&mut self) -> &mut Selection {
        self.selection.get_or_insert_with(Selection::new)
    }

    /// Adds `ids` to the selection and flags each entity as selected.
    pub fn select(&mut self, ids: &[EntityId]) {
        let Some(selection) = self.selection.as_mut() else {
            debug!(target: "scene", "Scene {:?} has no selection to add to", self.id);
            return;
        };

        for &id in ids {
            if let Some(entity) = self.entities.iter_mut().find(|e| e.id() == id) {
                if selection.insert(id) {
                    entity.on_select();
                }
            }
        }
    }

    /// Removes a single entity from the selection.
    pub fn deselect(&mut self, id: EntityId) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        if !selection.contains(id) {
            return;
        }

        selection.remove(id);
        if let Some(entity) = self.entities.iter_mut().find(|e| e.id() == id) {
            entity.on_deselect();
        }
    }

    pub fn clear_selection(&mut self) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        for id in selection.take_all() {
            if let Some(entity) = self.entities.iter_mut().find(|e| e.id() == id) {
                entity.on_deselect();
            }
        }
    }

    //--- Input ------------------------------------------------------------

    /// Routes one click at `point` and returns the commands that need the
    /// controller. Scene-local commands are applied before returning.
    pub fn handle_click(&mut self, button: MouseButton, point: Vec2) -> Vec<SceneCommand> {
        let hits = self.query_hits(point);
        let plan = match &self.selection {
            Some(selection) => selection.plan(button, &hits),
            None => ClickPlan::PassThrough,
        };
        trace!(target: "scene", "Click at {:?}: {} hit(s), {:?}", point, hits.len(), plan);

        let mut commands = CommandQueue::new();
        match plan {
            ClickPlan::PassThrough => self.dispatch_click(&hits, &[], &mut commands),
            ClickPlan::Clear => self.clear_selection(),
            ClickPlan::Select => self.select(&hits),
            ClickPlan::Act { target } => {
                let actors = self
                    .selection
                    .as_ref()
                    .map(|selection| selection.selected().to_vec())
                    .unwrap_or_default();
                self.dispatch_click(&[target], &actors, &mut commands);
            }
            ClickPlan::Ambiguous { hits } => warn!(
                target: "scene",
                "Click hit {} entities while holding a selection; ignoring",
                hits
            ),
            ClickPlan::Ignore => {}
        }

        self.apply_commands(commands)
    }

    fn dispatch_click(&mut self, targets: &[EntityId], actors: &[EntityId], commands: &mut CommandQueue) {
        for &id in targets {
            if let Some(entity) = self.entity_mut(id) {
                entity.on_click(actors, commands);
            }
        }
    }

    fn apply_commands(&mut self, commands: CommandQueue) -> Vec<SceneCommand> {
        let mut escalated = Vec::new();
        for command in commands {
            match command {
                SceneCommand::SendUnits { from, to, count } => {
                    self.send_units(from, to, count);
                }
                other => escalated.push(other),
            }
        }
        escalated
    }

    //--- Units ------------------------------------------------------------

    /// Orders building `from` to send `count` units to entity `to`.
    ///
    /// The first unit leaves on the next rendered frame. Returns `false`
    /// if either entity is missing, `from` is not a building, or the
    /// building is already sending.
    pub fn send_units(&mut self, from: EntityId, to: EntityId, count: u32) -> bool {
        if self.entity(to).is_none() {
            warn!(target: "scene", "Send order target {:?} is not in scene {:?}", to, self.id);
            return false;
        }

        let now = self.last_tick;
        let interval = self.tuning.unit_spawn_interval_ms;
        let travel = self.tuning.unit_travel_ms;

        match self.entity_mut(from).and_then(|entity| entity.as_building_mut()) {
            Some(building) => building.send_units(to, count, now, interval, travel),
            None => {
                debug!(target: "scene", "{:?} cannot send units: not a building", from);
                false
            }
        }
    }

    fn spawn_unit(&mut self, spawn: UnitSpawn) {
        let Some(target) = self.entity(spawn.target).map(|entity| entity.position) else {
            warn!(
                target: "scene",
                "Unit target {:?} left scene {:?}; unit not spawned",
                spawn.target,
                self.id
            );
            return;
        };

        let unit = self.add(Entity::plain().at(spawn.origin));
        unit.animate(target, Some(spawn.travel_ms));
        trace!(target: "scene", "Spawned unit {:?} toward {:?}", unit.id(), spawn.target);
    }

    //--- Rendering --------------------------------------------------------

    /// Renders one frame of the scene onto `surface`.
    ///
    /// Rendering the same frame again repaints it without advancing
    /// tweens, unit timers or the fade.
    pub fn render(&mut self, surface: &mut dyn Surface, timing: &Timing) {
        let repeat = self.rendered && timing.last_tick <= self.last_tick;
        if !repeat {
            self.last_tick = timing.last_tick;
        }
        self.rendered = true;
        let bounds = surface.bounds();

        if let Err(e) = surface.clear_rect(bounds) {
            warn!(target: "render", "Scene {:?}: clear failed: {}", self.id, e);
        }

        if let Some(status) = self.status_text() {
            let at = bounds.size - STATUS_INSET;
            if let Err(e) = surface.fill_text(status, at, &TextStyle::status(Color::RED)) {
                warn!(target: "render", "Scene {:?}: status text failed: {}", self.id, e);
            }
            return;
        }

        let mut spawns = Vec::new();
        for entity in &mut self.entities {
            if let Some(spawn) = entity.advance(timing) {
                spawns.push(spawn);
            }
            if let Err(e) = entity.paint(surface) {
                warn!(
                    target: "render",
                    "Scene {:?}: entity {:?} failed to paint: {}",
                    self.id,
                    entity.id(),
                    e
                );
            }
        }

        for spawn in spawns {
            self.spawn_unit(spawn);
        }

        let fade_step = if repeat { 0.0 } else { timing.step_f32() };
        self.render_fade(surface, bounds, fade_step);
    }

    fn status_text(&self) -> Option<&'static str> {
        match self.load_state {
            LoadState::Ready => None,
            LoadState::Loading { .. } => Some(LOADING_TEXT),
            LoadState::Failed { .. } => Some(FAILED_TEXT),
        }
    }

    fn render_fade(&mut self, surface: &mut dyn Surface, bounds: Rect, step: f32) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        let finished = fade.advance(step);
        if let Err(e) = surface.fill_rect(bounds, fade.overlay()) {
            warn!(target: "render", "Scene {:?}: fade overlay failed: {}", self.id, e);
        }

        if !finished {
            return;
        }

        if let Some(mut fade) = self.fade.take() {
            debug!(target: "scene", "Scene {:?}: fade {:?} finished", self.id, fade.direction());
            if let Some(on_complete) = fade.take_completion() {
                on_complete(self);
            }
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("entities", &self.entities.len())
            .field("load_state", &self.load_state)
            .field("fade", &self.fade)
            .field("selection", &self.selection)
            .field("pending_delete", &self.pending_delete)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::core::geometry::Rgba;
    use crate::core::render::{DrawCommand, DrawList, NoSprites, RenderError, Sprite};

    //=== Helpers =========================================================

    fn scene() -> Scene {
        Scene::new(SceneId(1), Tuning::default())
    }

    fn frame(last_tick: f64, step: f64) -> Timing {
        Timing {
            start: 0.0,
            last_tick,
            step,
        }
    }

    fn payload(json: &str) -> ScenePayload {
        ScenePayload::from_json(json).unwrap()
    }

    fn overlay_alpha(list: &DrawList) -> Option<f32> {
        list.commands().iter().rev().find_map(|command| match command {
            DrawCommand::FillRect { rect, fill } if rect.size == Vec2::new(800.0, 600.0) => {
                Some(fill.alpha)
            }
            _ => None,
        })
    }

    /// Surface that refuses to paint one specific rectangle origin.
    struct PickySurface {
        inner: DrawList,
        reject_at: Vec2,
    }

    impl Surface for PickySurface {
        fn size(&self) -> Vec2 {
            self.inner.size()
        }

        fn clear_rect(&mut self, rect: Rect) -> Result<(), RenderError> {
            self.inner.clear_rect(rect)
        }

        fn fill_rect(&mut self, rect: Rect, fill: Rgba) -> Result<(), RenderError> {
            if rect.origin == self.reject_at {
                return Err(RenderError::Rejected("bad rect".into()));
            }
            self.inner.fill_rect(rect, fill)
        }

        fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) -> Result<(), RenderError> {
            self.inner.fill_text(text, at, style)
        }

        fn draw_sprite(&mut self, sprite: &Sprite, at: Vec2) -> Result<(), RenderError> {
            self.inner.draw_sprite(sprite, at)
        }
    }

    //=== Entities & Hits =================================================

    #[test]
    fn add_assigns_increasing_ids() {
        let mut scene = scene();
        let a = scene.add(Entity::plain()).id();
        let b = scene.add(Entity::plain()).id();

        assert_eq!(scene.len(), 2);
        assert!(a < b);
    }

    #[test]
    fn hit_test_includes_edges() {
        let mut scene = scene();
        let id = scene.add(Entity::plain().at(Vec2::new(10.0, 10.0))).id();

        assert_eq!(scene.query_hits(Vec2::new(10.0, 10.0)), vec![id]);
        assert_eq!(scene.query_hits(Vec2::new(60.0, 60.0)), vec![id]);
        assert!(scene.query_hits(Vec2::new(60.5, 30.0)).is_empty());
    }

    #[test]
    fn overlapping_hits_in_insertion_order() {
        let mut scene = scene();
        let a = scene.add(Entity::plain()).id();
        let b = scene.add(Entity::button("b", None)).id();

        assert_eq!(scene.query_hits(Vec2::new(20.0, 20.0)), vec![a, b]);
    }

    #[test]
    fn loading_scene_has_no_hits() {
        let mut scene = scene();
        scene.add(Entity::plain());
        scene.begin_loading("map1");

        assert!(scene.query_hits(Vec2::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn flush_empties_entities_and_selection() {
        let mut scene = scene();
        scene.attach_selection().engage(true);
        let id = scene.add(Entity::building()).id();
        scene.select(&[id]);

        scene.flush();

        assert!(scene.is_empty());
        assert!(scene.selection().unwrap().is_empty());
    }

    //=== Loading =========================================================

    #[test]
    fn load_builds_entities_from_payload() {
        let mut scene = scene();
        scene.load(
            &payload(
                r#"{
                    "scene": { "selection": true },
                    "menu": { "options": [ { "title": "play", "state": "map1" } ] },
                    "units": [ { "coords": [1, 2] } ],
                    "buildings": [ { "coords": [300, 40] } ]
                }"#,
            ),
            &mut NoSprites,
        );

        assert!(scene.is_ready());
        assert!(scene.selection().unwrap().is_engaged());

        let entities = scene.entities();
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].as_button().unwrap().title(), "play");
        assert_eq!(
            entities[0].tween().unwrap().target(),
            Tuning::default().menu_target
        );
        assert!(entities[1].is_plain());
        assert_eq!(entities[1].position, Vec2::new(1.0, 2.0));
        assert_eq!(entities[2].position, Vec2::new(300.0, 40.0));
    }

    #[test]
    fn load_attaches_disengaged_selection_by_default() {
        let mut scene = scene();
        scene.load(&payload("{}"), &mut NoSprites);

        assert!(!scene.selection().unwrap().is_engaged());
    }

    #[test]
    fn load_applies_resolved_sprites() {
        struct Towers;
        impl SpriteResolver for Towers {
            fn resolve(&mut self, reference: &str) -> Option<Sprite> {
                (reference == "tower.png").then(|| Sprite {
                    key: reference.to_owned(),
                    size: Vec2::new(40.0, 80.0),
                })
            }
        }

        let mut scene = scene();
        scene.load(
            &payload(r#"{ "buildings": [ { "coords": [0, 0], "sprite": "tower.png" }, { "coords": [0, 0], "sprite": "missing.png" } ] }"#),
            &mut Towers,
        );

        assert_eq!(scene.entities()[0].size, Vec2::new(40.0, 80.0));
        assert!(scene.entities()[1].sprite().is_none());
    }

    //=== Rendering =======================================================

    #[test]
    fn loading_scene_paints_only_status() {
        let mut scene = scene();
        scene.add(Entity::plain());
        scene.begin_loading("map1");
        let mut list = DrawList::new(800.0, 600.0);

        scene.render(&mut list, &frame(16.0, 16.0));

        assert_eq!(list.commands().len(), 2);
        match &list.commands()[1] {
            DrawCommand::FillText { text, at, style } => {
                assert_eq!(text, LOADING_TEXT);
                assert_eq!(*at, Vec2::new(700.0, 590.0));
                assert_eq!(style.color, Color::RED);
            }
            other => panic!("expected status text, got {:?}", other),
        }
    }

    #[test]
    fn failed_scene_paints_failure_status() {
        let mut scene = scene();
        scene.begin_loading("map9");
        scene.fail_loading("not found");
        let mut list = DrawList::new(800.0, 600.0);

        scene.render(&mut list, &frame(16.0, 16.0));

        assert_eq!(list.texts().collect::<Vec<_>>(), vec![FAILED_TEXT]);
        assert_eq!(
            scene.load_state(),
            &LoadState::Failed {
                location: "map9".into(),
                reason: "not found".into()
            }
        );
    }

    #[test]
    fn failing_entity_does_not_stop_frame() {
        let mut scene = scene();
        scene.add(Entity::plain().at(Vec2::new(0.0, 0.0)));
        scene.add(Entity::plain().at(Vec2::new(100.0, 0.0)));
        scene.add(Entity::plain().at(Vec2::new(200.0, 0.0)));
        let mut surface = PickySurface {
            inner: DrawList::new(800.0, 600.0),
            reject_at: Vec2::new(100.0, 0.0),
        };

        scene.render(&mut surface, &frame(16.0, 16.0));

        let painted: Vec<_> = surface
            .inner
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { rect, .. } => Some(rect.origin.x),
                _ => None,
            })
            .collect();
        assert_eq!(painted, vec![0.0, 200.0]);
    }

    //=== Fade ============================================================

    #[test]
    fn fade_out_darkens_then_completes_once() {
        let mut scene = scene();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        scene.begin_fade(
            Color::WHITE,
            100.0,
            FadeDirection::Out,
            Some(Box::new(move |scene: &mut Scene| {
                counter.set(counter.get() + 1);
                scene.mark_for_deletion();
            })),
        );

        let mut last_alpha = 0.0;
        for tick in 1..=4 {
            let mut list = DrawList::new(800.0, 600.0);
            scene.render(&mut list, &frame(tick as f64 * 25.0, 25.0));
            let alpha = overlay_alpha(&list).unwrap();
            assert!(alpha >= last_alpha);
            last_alpha = alpha;
        }

        assert_eq!(calls.get(), 1);
        assert!(scene.is_pending_delete());
        assert!(scene.fade().is_none());

        let mut list = DrawList::new(800.0, 600.0);
        scene.render(&mut list, &frame(125.0, 25.0));
        assert_eq!(calls.get(), 1);
        assert!(overlay_alpha(&list).is_none());
    }

    #[test]
    fn repeated_frame_does_not_advance() {
        let mut scene = scene();
        let id = scene.add(Entity::plain()).id();
        scene.entity_mut(id).unwrap().animate(Vec2::new(100.0, 0.0), Some(100.0));
        scene.begin_fade(Color::WHITE, 100.0, FadeDirection::Out, None);

        let mut first = DrawList::new(800.0, 600.0);
        scene.render(&mut first, &frame(10.0, 10.0));
        let mut again = DrawList::new(800.0, 600.0);
        scene.render(&mut again, &frame(10.0, 10.0));

        assert_eq!(scene.entity(id).unwrap().position, Vec2::new(10.0, 0.0));
        assert_eq!(scene.fade().unwrap().opacity(), 0.1);
        assert_eq!(first.commands(), again.commands());

        scene.render(&mut DrawList::new(800.0, 600.0), &frame(20.0, 10.0));
        assert_eq!(scene.entity(id).unwrap().position, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn fade_in_reveals() {
        let mut scene = scene();
        scene.begin_fade(Color::BLACK, 100.0, FadeDirection::In, None);
        let mut list = DrawList::new(800.0, 600.0);

        scene.render(&mut list, &frame(25.0, 25.0));

        assert_eq!(overlay_alpha(&list), Some(0.75));
    }

    #[test]
    fn new_fade_replaces_pending_completion() {
        let mut scene = scene();
        let first = Rc::new(Cell::new(false));
        let flag = Rc::clone(&first);
        scene.begin_fade(
            Color::WHITE,
            10.0,
            FadeDirection::Out,
            Some(Box::new(move |_: &mut Scene| flag.set(true))),
        );
        scene.begin_fade(Color::WHITE, 10.0, FadeDirection::In, None);

        scene.render(&mut DrawList::new(800.0, 600.0), &frame(20.0, 20.0));

        assert!(!first.get());
        assert!(scene.fade().is_none());
    }

    #[test]
    fn fade_waits_while_loading() {
        let mut scene = scene();
        scene.begin_loading("map1");
        scene.begin_fade(Color::WHITE, 10.0, FadeDirection::In, None);

        scene.render(&mut DrawList::new(800.0, 600.0), &frame(50.0, 50.0));

        assert_eq!(scene.fade().unwrap().opacity(), 0.0);
    }

    //=== Clicks & Selection ==============================================

    fn engaged_scene() -> (Scene, EntityId, EntityId) {
        let mut scene = scene();
        scene.load(
            &payload(
                r#"{
                    "scene": { "selection": true },
                    "buildings": [ { "coords": [0, 0] }, { "coords": [300, 0] } ]
                }"#,
            ),
            &mut NoSprites,
        );
        let ids: Vec<_> = scene.entities().iter().map(Entity::id).collect();
        (scene, ids[0], ids[1])
    }

    #[test]
    fn click_without_selection_reaches_every_hit() {
        let mut scene = scene();
        scene.add(Entity::button("a", Some(SceneSource::location("a"))));
        scene.add(Entity::button("b", Some(SceneSource::location("b"))));

        let commands = scene.handle_click(MouseButton::Left, Vec2::new(10.0, 10.0));

        assert_eq!(
            commands,
            vec![
                SceneCommand::Transition(SceneSource::location("a")),
                SceneCommand::Transition(SceneSource::location("b")),
            ]
        );
    }

    #[test]
    fn engaged_click_selects_then_right_click_clears() {
        let (mut scene, a, _) = engaged_scene();

        scene.handle_click(MouseButton::Left, Vec2::new(10.0, 10.0));
        assert_eq!(scene.selection().unwrap().selected(), &[a]);
        assert!(scene.entity(a).unwrap().is_selected());

        scene.handle_click(MouseButton::Right, Vec2::new(700.0, 500.0));
        assert!(scene.selection().unwrap().is_empty());
        assert!(!scene.entity(a).unwrap().is_selected());
    }

    #[test]
    fn selected_building_sends_units_to_clicked_building() {
        let (mut scene, a, b) = engaged_scene();
        scene.handle_click(MouseButton::Left, Vec2::new(10.0, 10.0));

        let commands = scene.handle_click(MouseButton::Left, Vec2::new(310.0, 10.0));

        assert!(commands.is_empty());
        let order = scene.entity(a).unwrap().as_building().unwrap().sending().unwrap();
        assert_eq!(order.target, b);
        assert_eq!(order.remaining, 1);
    }

    #[test]
    fn empty_click_with_selection_changes_nothing() {
        let (mut scene, a, _) = engaged_scene();
        scene.handle_click(MouseButton::Left, Vec2::new(10.0, 10.0));

        scene.handle_click(MouseButton::Left, Vec2::new(700.0, 500.0));

        assert_eq!(scene.selection().unwrap().selected(), &[a]);
        assert!(!scene.entity(a).unwrap().as_building().unwrap().is_sending());
    }

    #[test]
    fn deselect_keeps_flags_in_sync() {
        let (mut scene, a, b) = engaged_scene();
        scene.select(&[a, b]);

        scene.deselect(a);

        assert_eq!(scene.selection().unwrap().selected(), &[b]);
        assert!(!scene.entity(a).unwrap().is_selected());
        assert!(scene.entity(b).unwrap().is_selected());
    }

    //=== Units ===========================================================

    #[test]
    fn send_units_spawns_count_units_over_frames() {
        let (mut scene, a, b) = engaged_scene();
        scene.render(&mut DrawList::new(800.0, 600.0), &frame(1000.0, 16.0));
        assert!(scene.send_units(a, b, 3));

        let interval = Tuning::default().unit_spawn_interval_ms;
        let mut tick = 1000.0;
        while tick <= 1000.0 + 3.0 * interval {
            scene.render(&mut DrawList::new(800.0, 600.0), &frame(tick, 100.0));
            tick += 100.0;
        }

        let units: Vec<_> = scene.entities().iter().filter(|e| e.is_plain()).collect();
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|unit| unit.tween().is_some()
            || unit.position == Vec2::new(300.0, 0.0)));
        assert!(!scene.entity(a).unwrap().as_building().unwrap().is_sending());
    }

    #[test]
    fn order_placed_before_first_frame_keeps_interval() {
        let (mut scene, a, b) = engaged_scene();
        assert!(scene.send_units(a, b, 3));

        scene.render(&mut DrawList::new(800.0, 600.0), &frame(5000.0, 16.0));
        scene.render(&mut DrawList::new(800.0, 600.0), &frame(5016.0, 16.0));
        scene.render(&mut DrawList::new(800.0, 600.0), &frame(5032.0, 16.0));

        let units = scene.entities().iter().filter(|e| e.is_plain()).count();
        assert_eq!(units, 1);
        let order = scene.entity(a).unwrap().as_building().unwrap().sending().unwrap();
        assert_eq!(order.next_spawn_at, 5800.0);
    }

    #[test]
    fn plain_entity_cannot_send_units() {
        let mut scene = scene();
        let plain = scene.add(Entity::plain()).id();
        let target = scene.add(Entity::building()).id();

        assert!(!scene.send_units(plain, target, 1));
    }

    #[test]
    fn send_to_missing_target_is_refused() {
        let (mut scene, a, _) = engaged_scene();

        assert!(!scene.send_units(a, EntityId(99), 1));
    }
}
