//=========================================================================
// Scene Fetcher
//=========================================================================
//
// Asynchronous retrieval of scene payloads by location.
//
// Load lifecycle:
//   Controller ──fetch(location, completion)──► SceneFetcher
//                                                    │ (any thread)
//   CompletionCollector ◄──LoadOutcome── completion.resolve(result)
//
// A completion dropped without being resolved reports itself cancelled,
// so a scene never waits on a load nobody will finish.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::thread;

use crossbeam_channel::Sender;
use log::{debug, trace, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::{PayloadError, SceneId, ScenePayload};

//=== Errors ==============================================================

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read scene '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse scene '{location}': {source}")]
    Payload {
        location: String,
        #[source]
        source: PayloadError,
    },

    #[error("Scene location '{0}' is outside the scene root")]
    InvalidLocation(String),

    #[error("Load of '{0}' was cancelled")]
    Cancelled(String),
}

//=== LoadOutcome =========================================================

/// Result of one load, addressed to the scene that requested it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub scene: SceneId,
    pub location: String,
    pub result: Result<ScenePayload, FetchError>,
}

//=== LoadCompletion ======================================================

/// One-shot handle a fetcher resolves when its load finishes.
#[derive(Debug)]
pub struct LoadCompletion {
    scene: SceneId,
    location: String,
    sender: Option<Sender<LoadOutcome>>,
}

impl LoadCompletion {
    pub(crate) fn new(scene: SceneId, location: impl Into<String>, sender: Sender<LoadOutcome>) -> Self {
        Self {
            scene,
            location: location.into(),
            sender: Some(sender),
        }
    }

    /// Scene the payload is destined for.
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Delivers the result to the controller.
    pub fn resolve(mut self, result: Result<ScenePayload, FetchError>) {
        self.send(result);
    }

    fn send(&mut self, result: Result<ScenePayload, FetchError>) {
        let Some(sender) = self.sender.take() else {
            return;
        };

        let outcome = LoadOutcome {
            scene: self.scene,
            location: self.location.clone(),
            result,
        };
        if sender.send(outcome).is_err() {
            debug!(
                target: "loader",
                "Controller gone; dropping load of '{}' for {:?}",
                self.location,
                self.scene
            );
        }
    }
}

impl Drop for LoadCompletion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            let cancelled = FetchError::Cancelled(self.location.clone());
            self.send(Err(cancelled));
        }
    }
}

//=== SceneFetcher ========================================================

/// Source of scene payloads.
///
/// Implementations may resolve the completion immediately or from another
/// thread; the controller only looks at results between frames.
pub trait SceneFetcher {
    fn fetch(&mut self, location: &str, completion: LoadCompletion);
}

//=== FileFetcher =========================================================

/// Reads `<root>/<location>.json` on a worker thread per request.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub const EXTENSION: &'static str = "json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a location onto a file under the root.
    ///
    /// Locations are relative paths; the `.json` extension is optional.
    /// Absolute paths and `..` components are refused.
    pub fn resolve_path(&self, location: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(location);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if location.is_empty() || escapes {
            return Err(FetchError::InvalidLocation(location.to_owned()));
        }

        let mut path = self.root.join(relative);
        if path.extension().is_none() {
            path.set_extension(Self::EXTENSION);
        }
        Ok(path)
    }
}

impl SceneFetcher for FileFetcher {
    fn fetch(&mut self, location: &str, completion: LoadCompletion) {
        let path = match self.resolve_path(location) {
            Ok(path) => path,
            Err(e) => {
                warn!(target: "loader", "{}", e);
                completion.resolve(Err(e));
                return;
            }
        };

        trace!(target: "loader", "Fetching '{}' from {}", location, path.display());
        let location = location.to_owned();
        let spawned = thread::Builder::new()
            .name("scene-loader".into())
            .spawn(move || {
                let result = read_payload(&path, &location);
                completion.resolve(result);
            });

        // A failed spawn drops the closure, and with it the completion,
        // which then reports the load as cancelled.
        if let Err(e) = spawned {
            warn!(target: "loader", "Failed to spawn loader thread: {}", e);
        }
    }
}

fn read_payload(path: &Path, location: &str) -> Result<ScenePayload, FetchError> {
    let text = fs::read_to_string(path).map_err(|source| FetchError::Io {
        location: location.to_owned(),
        source,
    })?;

    ScenePayload::from_json(&text).map_err(|source| FetchError::Payload {
        location: location.to_owned(),
        source,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
