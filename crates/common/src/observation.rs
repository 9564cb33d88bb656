//! Payloads exchanged with the data gateway.
//!
//! Optional fields default to empty rather than failing the whole batch;
//! colors deserialize leniently (see [`crate::color::lenient`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::color::{self, Rgb};
use crate::types::{CellRect, WorldPosition};

/// Small integer key into the configured terrain table.
pub type TerrainId = u16;

/// Rectangular window of terrain ids, row-major from `(min_x, min_y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportBatch {
    pub min_x: i32,
    pub min_y: i32,
    #[serde(default)]
    pub cells: Vec<Vec<TerrainId>>,
}

impl ViewportBatch {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Covered rectangle. Ragged rows are measured by the first row.
    pub fn rect(&self) -> CellRect {
        let width = self.cells.first().map_or(0, Vec::len) as i32;
        CellRect {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.min_x + width,
            max_y: self.min_y + self.cells.len() as i32,
        }
    }

    pub fn terrain_at(&self, pos: WorldPosition) -> Option<TerrainId> {
        let row = usize::try_from(pos.y - self.min_y).ok()?;
        let col = usize::try_from(pos.x - self.min_x).ok()?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Every cell with its world position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (WorldPosition, TerrainId)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, ids)| {
            ids.iter().enumerate().map(move |(col, id)| {
                (
                    WorldPosition::new(self.min_x + col as i32, self.min_y + row as i32),
                    *id,
                )
            })
        })
    }
}

/// Terrain reference embedded in an observation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainRef {
    pub id: TerrainId,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "color::lenient", default = "color::fallback")]
    pub color: Rgb,
}

/// A track, scat or other sign seen from the current cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignObservation {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "char", default = "unknown_glyph")]
    pub glyph: String,
    #[serde(deserialize_with = "color::lenient", default = "color::fallback")]
    pub color: Rgb,
    #[serde(default)]
    pub description: String,
}

impl SignObservation {
    pub fn position(&self) -> WorldPosition {
        WorldPosition::new(self.x, self.y)
    }
}

fn unknown_glyph() -> String {
    "?".to_string()
}

/// Species identifier; gateways send either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct SpeciesId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl From<IdRepr> for SpeciesId {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(s) => Self(s),
            IdRepr::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<&str> for SpeciesId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad species grouping; picks the map glyph and the panel sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesCategory {
    Tree,
    Shrub,
    Plant,
    LargeHerbivore,
    MediumHerbivore,
    Predator,
    Aquatic,
    #[default]
    #[serde(other)]
    Other,
}

impl SpeciesCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeciesCategory::Tree => "tree",
            SpeciesCategory::Shrub => "shrub",
            SpeciesCategory::Plant => "plant",
            SpeciesCategory::LargeHerbivore => "large_herbivore",
            SpeciesCategory::MediumHerbivore => "medium_herbivore",
            SpeciesCategory::Predator => "predator",
            SpeciesCategory::Aquatic => "aquatic",
            SpeciesCategory::Other => "other",
        }
    }
}

/// Free-text sensory notes. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryNotes {
    #[serde(default)]
    pub visual: Option<String>,
    #[serde(default)]
    pub tactile: Option<String>,
    #[serde(default)]
    pub smell: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub season_note: Option<String>,
    #[serde(default)]
    pub uses: Option<String>,
}

impl SensoryNotes {
    /// Labelled notes in display order, skipping absent or blank ones.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Visual", &self.visual),
            ("Touch", &self.tactile),
            ("Smell", &self.smell),
            ("Sound", &self.sound),
            ("Habitat", &self.habitat),
            ("Season", &self.season_note),
            ("Uses", &self.uses),
        ]
        .into_iter()
        .filter_map(|(label, text)| {
            text.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| (label, t))
        })
    }
}

/// A species present somewhere within the observer's radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesObservation {
    #[serde(alias = "species_id")]
    pub id: SpeciesId,
    #[serde(default)]
    pub category: SpeciesCategory,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub latin_name: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub state: u32,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub notes: SensoryNotes,
    #[serde(default)]
    pub locations: Option<Vec<WorldPosition>>,
}

impl SpeciesObservation {
    pub fn locations(&self) -> &[WorldPosition] {
        self.locations.as_deref().unwrap_or_default()
    }

    pub fn is_at(&self, pos: WorldPosition) -> bool {
        self.locations().contains(&pos)
    }
}

/// Point-in-time bundle of what the player can perceive from one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationBatch {
    pub location: WorldPosition,
    pub current_terrain: TerrainRef,
    #[serde(default)]
    pub visible_terrains: Vec<TerrainRef>,
    #[serde(default)]
    pub signs: Vec<SignObservation>,
    #[serde(default)]
    pub observations: Vec<SpeciesObservation>,
    #[serde(default)]
    pub corridors: Vec<String>,
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

impl ObservationBatch {
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty() && self.observations.is_empty()
    }

    pub fn species(&self, id: &SpeciesId) -> Option<&SpeciesObservation> {
        self.observations.iter().find(|s| &s.id == id)
    }
}

/// One named corridor from the god-mode dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    #[serde(deserialize_with = "color::lenient", default = "color::fallback")]
    pub color: Rgb,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub cells: Vec<WorldPosition>,
}

/// Corridor name to corridor, iterated in name order.
pub type CorridorMap = BTreeMap<String, Corridor>;

/// Every placement of one sign type, from the god-mode dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignCatalogEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "char", default = "unknown_glyph")]
    pub glyph: String,
    #[serde(deserialize_with = "color::lenient", default = "color::fallback")]
    pub color: Rgb,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locations: Vec<WorldPosition>,
}
