//=========================================================================
// Scene Payload
//=========================================================================
//
// The JSON document a scene is built from, plus the `SceneSource` that
// names where it comes from.
//
// {
//   "scene":     { "selection": true },
//   "menu":      { "options": [ { "title": "...", "state": "map1" } ] },
//   "units":     [ { "coords": [x, y] } ],
//   "buildings": [ { "coords": [x, y], "sprite": "tower.png" } ]
// }
//
// Every section is optional. Entries are decoded one at a time so a single
// malformed entry is skipped with a warning instead of failing the load.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;

//=== Errors ==============================================================

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scene document must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

//=== SceneSource =========================================================

/// Where a scene's content comes from.
///
/// Deserializes from either a string (a location for the fetcher) or an
/// inline payload object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SceneSource {
    Location(String),
    Inline(Box<ScenePayload>),
}

impl SceneSource {
    pub fn location(location: impl Into<String>) -> Self {
        Self::Location(location.into())
    }

    pub fn inline(payload: ScenePayload) -> Self {
        Self::Inline(Box::new(payload))
    }
}

impl From<ScenePayload> for SceneSource {
    fn from(payload: ScenePayload) -> Self {
        Self::inline(payload)
    }
}

//=== Entries =============================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneSettings {
    #[serde(default)]
    pub selection: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuOption {
    pub title: String,
    #[serde(default)]
    pub state: Option<SceneSource>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitEntry {
    pub coords: Vec2,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingEntry {
    pub coords: Vec2,
    #[serde(default)]
    pub sprite: Option<String>,
}

//=== ScenePayload ========================================================

/// Raw scene document. Sections stay as JSON until the scene reads them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScenePayload {
    #[serde(default)]
    pub scene: Option<Value>,
    #[serde(default)]
    pub menu: Option<Value>,
    #[serde(default)]
    pub units: Option<Value>,
    #[serde(default)]
    pub buildings: Option<Value>,
}

impl ScenePayload {
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        if !value.is_object() {
            return Err(PayloadError::NotAnObject(json_kind(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }

    //--- Section Readers --------------------------------------------------

    pub fn settings(&self) -> SceneSettings {
        self.scene
            .as_ref()
            .and_then(|value| decode_entry("scene", value.clone()))
            .unwrap_or_default()
    }

    pub fn menu_options(&self) -> Vec<MenuOption> {
        let options = self.menu.as_ref().and_then(|menu| menu.get("options"));
        decode_list("menu.options", options)
    }

    pub fn units(&self) -> Vec<UnitEntry> {
        decode_list("units", self.units.as_ref())
    }

    pub fn buildings(&self) -> Vec<BuildingEntry> {
        decode_list("buildings", self.buildings.as_ref())
    }
}

//=== Helpers =============================================================

fn decode_list<T: DeserializeOwned>(section: &str, value: Option<&Value>) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                decode_entry(&format!("{}[{}]", section, index), entry.clone())
            })
            .collect(),
        Some(other) => {
            warn!(
                target: "scene",
                "Section '{}' should be an array, got {}; ignoring",
                section,
                json_kind(other)
            );
            Vec::new()
        }
    }
}

fn decode_entry<T: DeserializeOwned>(what: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(target: "scene", "Skipping malformed entry '{}': {}", what, e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_every_section() {
        let payload = ScenePayload::from_json(
            r#"{
                "scene": { "selection": true },
                "menu": { "options": [ { "title": "start", "state": "map1" } ] },
                "units": [ { "coords": [1, 2] } ],
                "buildings": [ { "coords": [3, 4], "sprite": "tower.png" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.settings().selection, Some(true));

        let options = payload.menu_options();
        assert_eq!(options[0].title, "start");
        assert_eq!(options[0].state, Some(SceneSource::location("map1")));

        assert_eq!(payload.units()[0].coords, Vec2::new(1.0, 2.0));

        let building = &payload.buildings()[0];
        assert_eq!(building.coords, Vec2::new(3.0, 4.0));
        assert_eq!(building.sprite.as_deref(), Some("tower.png"));
    }

    #[test]
    fn empty_object_is_an_empty_scene() {
        let payload = ScenePayload::from_json("{}").unwrap();

        assert_eq!(payload.settings(), SceneSettings::default());
        assert!(payload.menu_options().is_empty());
        assert!(payload.units().is_empty());
        assert!(payload.buildings().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let payload = ScenePayload::from_json(
            r#"{ "units": [ { "coords": [1, 2] }, { "coords": "nope" }, { "coords": [5, 6] } ] }"#,
        )
        .unwrap();

        let coords: Vec<_> = payload.units().into_iter().map(|u| u.coords).collect();
        assert_eq!(coords, vec![Vec2::new(1.0, 2.0), Vec2::new(5.0, 6.0)]);
    }

    #[test]
    fn non_array_section_is_ignored() {
        let payload = ScenePayload::from_json(r#"{ "buildings": 7, "menu": {} }"#).unwrap();

        assert!(payload.buildings().is_empty());
        assert!(payload.menu_options().is_empty());
    }

    #[test]
    fn menu_state_may_be_inline() {
        let payload = ScenePayload::from_json(
            r#"{ "menu": { "options": [ { "title": "nested", "state": { "units": [] } } ] } }"#,
        )
        .unwrap();

        assert!(matches!(
            payload.menu_options()[0].state,
            Some(SceneSource::Inline(_))
        ));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            ScenePayload::from_json("[1, 2]"),
            Err(PayloadError::NotAnObject("an array"))
        ));
        assert!(matches!(
            ScenePayload::from_json("{ not json"),
            Err(PayloadError::Json(_))
        ));
    }
}
