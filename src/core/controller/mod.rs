//=========================================================================
// Controller
//=========================================================================
//
// Owns the scene stack and drives the per-frame update.
//
// Architecture:
//   Controller
//     ├─ stack: SceneStack             (current + outgoing scenes)
//     ├─ timing: Timing                (advanced only by step)
//     ├─ pointer / hover: Pointer, HoverSet
//     ├─ fetcher: Box<dyn SceneFetcher>
//     ├─ sprites: Box<dyn SpriteResolver>
//     └─ loads: CompletionCollector
//
// Frame flow (step):
//   apply finished loads → tick timing → hover diff (if pointer moved)
//     → sweep scenes marked for deletion → render displayed scene
//
// Input callbacks (route_click / route_pointer_move) run between frames
// and never touch timing.
//
//=========================================================================

//=== Module Declarations =================================================

mod pointer;
mod scene_stack;

//=== Public API ==========================================================

pub use pointer::{HoverDiff, HoverSet, Pointer};
pub use scene_stack::{SceneStack, StackError};

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::Tuning;
use crate::core::entity::EntityId;
use crate::core::geometry::Vec2;
use crate::core::input::{InputEvent, MouseButton};
use crate::core::loader::{CompletionCollector, SceneFetcher};
use crate::core::render::{SpriteResolver, Surface};
use crate::core::scene::{FadeDirection, LoadState, Scene, SceneCommand, SceneId, SceneSource};
use crate::core::timing::Timing;

//=== Controller ==========================================================

pub struct Controller {
    tuning: Tuning,
    stack: SceneStack,
    timing: Timing,
    clock_started: bool,
    pointer: Pointer,
    hover: HoverSet,
    fetcher: Box<dyn SceneFetcher>,
    sprites: Box<dyn SpriteResolver>,
    loads: CompletionCollector,
    next_scene_id: u64,
}

impl Controller {
    //--- Construction -----------------------------------------------------

    pub fn new(
        tuning: Tuning,
        fetcher: Box<dyn SceneFetcher>,
        sprites: Box<dyn SpriteResolver>,
    ) -> Self {
        Self {
            tuning,
            stack: SceneStack::new(),
            timing: Timing::default(),
            clock_started: false,
            pointer: Pointer::new(),
            hover: HoverSet::new(),
            fetcher,
            sprites,
            loads: CompletionCollector::new(tuning.max_loads_per_frame),
            next_scene_id: 0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn hovered(&self) -> &[EntityId] {
        self.hover.ids()
    }

    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    /// The scene receiving input; always the top of the stack.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.stack.current()
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.stack.current_mut()
    }

    /// The scene rendered each frame.
    pub fn displayed_scene(&self) -> Option<&Scene> {
        self.stack.displayed()
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.stack.get(id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.stack.get_mut(id)
    }

    //--- Scene Creation ---------------------------------------------------

    /// Creates an empty scene with a fresh id and this controller's tuning.
    pub fn new_scene(&mut self) -> Scene {
        let id = SceneId(self.next_scene_id);
        self.next_scene_id += 1;
        Scene::new(id, self.tuning)
    }

    /// Builds a scene from `source`.
    ///
    /// Inline payloads are loaded before returning. Locations go to the
    /// fetcher and the scene stays `Loading` until the result is applied in
    /// a later `step`, provided the scene is on the stack by then.
    pub fn load_scene(&mut self, source: SceneSource) -> Scene {
        let mut scene = self.new_scene();
        match source {
            SceneSource::Inline(payload) => scene.load(&payload, self.sprites.as_mut()),
            SceneSource::Location(location) => self.request_load(&mut scene, location),
        }
        scene
    }

    fn request_load(&mut self, scene: &mut Scene, location: String) {
        debug!(target: "loader", "Requesting '{}' for {:?}", location, scene.id());
        scene.begin_loading(location.clone());
        let completion = self.loads.completion(scene.id(), location.clone());
        self.fetcher.fetch(&location, completion);
    }

    /// Re-requests the payload of a scene whose load failed.
    ///
    /// Returns `false` if the scene is not on the stack or not failed.
    pub fn retry_load(&mut self, id: SceneId) -> bool {
        let location = match self.stack.get(id).map(Scene::load_state) {
            Some(LoadState::Failed { location, .. }) => location.clone(),
            _ => return false,
        };

        info!(target: "loader", "Retrying '{}' for {:?}", location, id);
        let completion = self.loads.completion(id, location.clone());
        if let Some(scene) = self.stack.get_mut(id) {
            scene.begin_loading(location.clone());
        }
        self.fetcher.fetch(&location, completion);
        true
    }

    //--- Stack Operations -------------------------------------------------

    /// Places `scene` on top of the stack; it becomes current immediately.
    pub fn push_scene(&mut self, scene: Scene) -> Result<SceneId, StackError> {
        let id = self.stack.push(scene)?;
        info!(target: "scene", "Scene {:?} pushed", id);
        Ok(id)
    }

    /// Removes and returns the top scene; the one below becomes current.
    pub fn pop_scene(&mut self) -> Option<Scene> {
        let scene = self.stack.pop()?;
        info!(target: "scene", "Scene {:?} popped", scene.id());
        Some(scene)
    }

    /// Makes `scene` current while the previous top stays displayed until
    /// it is deleted.
    pub fn queue_scene(&mut self, scene: Scene) -> Result<SceneId, StackError> {
        let id = self.stack.queue(scene)?;
        info!(target: "scene", "Scene {:?} queued", id);
        Ok(id)
    }

    //--- Transitions ------------------------------------------------------

    /// Fades the current scene out, then brings the scene from `source` in.
    ///
    /// The outgoing scene deletes itself when its fade-out finishes; the
    /// incoming scene is queued so only it receives input meanwhile.
    pub fn transition_to(&mut self, source: SceneSource) -> Result<SceneId, StackError> {
        let Tuning {
            transition_color: color,
            transition_ms: duration,
            ..
        } = self.tuning;

        if let Some(current) = self.stack.current_mut() {
            current.begin_fade(
                color,
                duration,
                FadeDirection::Out,
                Some(Box::new(|scene: &mut Scene| scene.mark_for_deletion())),
            );
        }

        let mut next = self.load_scene(source);
        next.begin_fade(color, duration, FadeDirection::In, None);
        self.queue_scene(next)
    }

    //--- Input ------------------------------------------------------------

    /// Feeds one engine input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => self.route_pointer_move(Vec2::new(x, y)),
            InputEvent::PointerClicked { button, x, y } => {
                self.route_click(button, Vec2::new(x, y))
            }
            InputEvent::Unidentified => trace!(target: "scene", "Ignoring unidentified input"),
        }
    }

    /// Records the pointer position; hover is resolved on the next frame.
    pub fn route_pointer_move(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    /// Delivers a click to the current scene and runs what it asks for.
    pub fn route_click(&mut self, button: MouseButton, point: Vec2) {
        let Some(scene) = self.stack.current_mut() else {
            trace!(target: "scene", "Click at {:?} with no scene", point);
            return;
        };

        for command in scene.handle_click(button, point) {
            match command {
                SceneCommand::Transition(source) => {
                    if let Err(e) = self.transition_to(source) {
                        warn!(target: "scene", "Transition rejected: {}", e);
                    }
                }
                other => debug!(target: "scene", "No controller handler for {:?}", other),
            }
        }
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs one frame at timestamp `now_ms` onto `surface`.
    pub fn step(&mut self, now_ms: f64, surface: &mut dyn Surface) {
        self.apply_loads();
        self.tick(now_ms);
        self.update_hover();

        if !self.stack.sweep().is_empty() {
            self.refresh_hover();
        }

        let timing = self.timing;
        match self.stack.displayed_mut() {
            Some(scene) => scene.render(surface, &timing),
            None => trace!(target: "scene", "No scene to render"),
        }
    }

    fn tick(&mut self, now_ms: f64) {
        if self.clock_started {
            self.timing.tick(now_ms);
        } else {
            self.timing = Timing::new(now_ms);
            self.clock_started = true;
        }
    }

    fn apply_loads(&mut self) {
        for outcome in self.loads.drain() {
            let Some(scene) = self.stack.get_mut(outcome.scene) else {
                debug!(
                    target: "loader",
                    "Discarding '{}': {:?} is no longer on the stack",
                    outcome.location,
                    outcome.scene
                );
                continue;
            };

            let wanted = matches!(
                scene.load_state(),
                LoadState::Loading { location } if *location == outcome.location
            );
            if !wanted {
                debug!(
                    target: "loader",
                    "Discarding '{}': {:?} is not waiting for it",
                    outcome.location,
                    outcome.scene
                );
                continue;
            }

            match outcome.result {
                Ok(payload) => scene.load(&payload, self.sprites.as_mut()),
                Err(e) => {
                    warn!(target: "loader", "{:?} failed to load: {}", outcome.scene, e);
                    scene.fail_loading(e.to_string());
                }
            }
        }
    }

    fn update_hover(&mut self) {
        if self.pointer.take_moved() {
            self.refresh_hover();
        }
    }

    fn refresh_hover(&mut self) {
        let Some(scene) = self.stack.current_mut() else {
            self.hover.clear();
            return;
        };

        let hits = scene.query_hits(self.pointer.current());
        let diff = self.hover.update(scene.id(), hits);

        for id in &diff.exited {
            if let Some(entity) = scene.entity_mut(*id) {
                entity.on_hover_exit();
            }
        }
        for id in &diff.entered {
            if let Some(entity) = scene.entity_mut(*id) {
                entity.on_hover_enter();
            }
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("stack", &self.stack.ids())
            .field("timing", &self.timing)
            .field("pointer", &self.pointer)
            .field("hover", &self.hover)
            .field("loads", &self.loads)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
