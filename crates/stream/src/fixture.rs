//! In-memory gateway serving a world described in a fixture file.
//!
//! Stands in for the remote data service in the CLI and in tests. Terrain is
//! written one row per string, one base-36 digit per cell:
//!
//! ```yaml
//! terrain:
//!   - "0001112"
//!   - "0011122"
//! ```

use async_trait::async_trait;
use fieldwalk_common::{
    CellRect, Corridor, CorridorMap, ObservationBatch, Rgb, SensoryNotes, SignCatalogEntry,
    SignObservation, SpeciesCategory, SpeciesId, SpeciesObservation, TerrainId, TerrainRef,
    TimeOfDay, ViewportBatch, WorldPosition,
};
use fieldwalk_kernel::visibility::disk;
use fieldwalk_kernel::{ConfigError, WorldConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use crate::gateway::{DataGateway, GatewayError, Result};

/// Glyph, color and description shared by all signs of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignSymbol {
    #[serde(rename = "char")]
    pub glyph: String,
    pub color: Rgb,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSign {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSpecies {
    pub id: SpeciesId,
    pub category: SpeciesCategory,
    pub common_name: String,
    #[serde(default)]
    pub latin_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub notes: SensoryNotes,
    /// Times of day the species can be seen; empty means always.
    #[serde(default)]
    pub active: Vec<TimeOfDay>,
    #[serde(default = "default_state")]
    pub state: u32,
    pub cells: Vec<WorldPosition>,
}

fn default_state() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCorridor {
    pub color: Rgb,
    pub cells: Vec<WorldPosition>,
}

/// Complete world served by a [`FixtureGateway`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldFixture {
    pub config: WorldConfig,
    pub terrain: Vec<String>,
    #[serde(default)]
    pub sign_types: BTreeMap<String, SignSymbol>,
    #[serde(default)]
    pub signs: Vec<PlacedSign>,
    #[serde(default)]
    pub species: Vec<FixtureSpecies>,
    #[serde(default)]
    pub corridors: BTreeMap<String, FixtureCorridor>,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported fixture extension {0:?} (expected .json, .yaml or .yml)")]
    UnknownFormat(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terrain has {found} rows, config says {expected}")]
    RowCount { expected: u32, found: usize },
    #[error("terrain row {row} has {found} cells, config says {expected}")]
    RowWidth {
        row: usize,
        expected: u32,
        found: usize,
    },
    #[error("terrain row {row} column {col}: {digit:?} is not a base-36 digit")]
    BadDigit { row: usize, col: usize, digit: char },
    #[error("terrain id {0} is used but not configured")]
    UnknownTerrain(TerrainId),
}

impl WorldFixture {
    pub fn from_json(text: &str) -> std::result::Result<Self, FixtureError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a fixture file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::from_json(&text),
            "yaml" | "yml" => Self::from_yaml(&text),
            _ => Err(FixtureError::UnknownFormat(ext)),
        }
    }

    /// Decode the terrain rows into ids, checking them against the config.
    fn decode_terrain(&self) -> std::result::Result<Vec<Vec<TerrainId>>, FixtureError> {
        self.config.validate()?;
        let (cols, rows) = (self.config.grid_cols, self.config.grid_rows);
        if self.terrain.len() != rows as usize {
            return Err(FixtureError::RowCount {
                expected: rows,
                found: self.terrain.len(),
            });
        }
        let mut grid = Vec::with_capacity(self.terrain.len());
        for (row, line) in self.terrain.iter().enumerate() {
            let ids = line
                .chars()
                .enumerate()
                .map(|(col, digit)| {
                    let id = digit
                        .to_digit(36)
                        .ok_or(FixtureError::BadDigit { row, col, digit })?
                        as TerrainId;
                    if self.config.terrain(id).is_none() {
                        return Err(FixtureError::UnknownTerrain(id));
                    }
                    Ok(id)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if ids.len() != cols as usize {
                return Err(FixtureError::RowWidth {
                    row,
                    expected: cols,
                    found: ids.len(),
                });
            }
            grid.push(ids);
        }
        Ok(grid)
    }
}

/// Species listed in the order the data service reports them.
fn category_rank(category: SpeciesCategory) -> usize {
    [
        SpeciesCategory::Tree,
        SpeciesCategory::Shrub,
        SpeciesCategory::Plant,
        SpeciesCategory::LargeHerbivore,
        SpeciesCategory::MediumHerbivore,
        SpeciesCategory::Predator,
        SpeciesCategory::Aquatic,
    ]
    .iter()
    .position(|c| *c == category)
    .unwrap_or(99)
}

/// Gateway answering from a decoded [`WorldFixture`].
#[derive(Debug)]
pub struct FixtureGateway {
    fixture: WorldFixture,
    grid: Vec<Vec<TerrainId>>,
    corridor_cells: BTreeMap<String, HashSet<WorldPosition>>,
    time_of_day: Mutex<TimeOfDay>,
}

impl FixtureGateway {
    pub fn new(fixture: WorldFixture) -> std::result::Result<Self, FixtureError> {
        let grid = fixture.decode_terrain()?;
        let corridor_cells = fixture
            .corridors
            .iter()
            .map(|(name, c)| (name.clone(), c.cells.iter().copied().collect()))
            .collect();
        let time_of_day = Mutex::new(fixture.config.time_of_day.unwrap_or_default());
        Ok(Self {
            fixture,
            grid,
            corridor_cells,
            time_of_day,
        })
    }

    pub fn fixture(&self) -> &WorldFixture {
        &self.fixture
    }

    fn current_time(&self) -> TimeOfDay {
        self.time_of_day.lock().map(|t| *t).unwrap_or_default()
    }

    fn terrain_id(&self, pos: WorldPosition) -> Option<TerrainId> {
        if !self.fixture.config.bounds().contains(pos) {
            return None;
        }
        Some(self.grid[pos.y as usize][pos.x as usize])
    }

    fn terrain_ref(&self, id: TerrainId) -> TerrainRef {
        let tile = self.fixture.config.terrain(id);
        TerrainRef {
            id,
            name: tile.map_or_else(|| "?".to_string(), |t| t.name.clone()),
            color: self.fixture.config.terrain_color(id),
        }
    }

    fn observe(&self, at: WorldPosition) -> Result<ObservationBatch> {
        let here = self.terrain_id(at).ok_or(GatewayError::OutOfBounds(at))?;
        let radius = self.fixture.config.visibility_radius;
        let bounds = self.fixture.config.bounds();
        let time = self.current_time();

        let mut seen = HashSet::new();
        let visible_terrains = disk(at, radius, bounds)
            .filter_map(|c| self.terrain_id(c))
            .filter(|id| seen.insert(*id))
            .map(|id| self.terrain_ref(id))
            .collect();

        let mut observations: Vec<SpeciesObservation> = self
            .fixture
            .species
            .iter()
            .filter(|sp| sp.active.is_empty() || sp.active.contains(&time))
            .filter_map(|sp| {
                let locations: Vec<WorldPosition> = sp
                    .cells
                    .iter()
                    .copied()
                    .filter(|c| at.within_radius(*c, radius))
                    .collect();
                (!locations.is_empty()).then(|| SpeciesObservation {
                    id: sp.id.clone(),
                    category: sp.category,
                    common_name: sp.common_name.clone(),
                    latin_name: sp.latin_name.clone(),
                    count: locations.len(),
                    state: sp.state,
                    photo_url: sp.photo_url.clone(),
                    notes: sp.notes.clone(),
                    locations: Some(locations),
                })
            })
            .collect();
        observations.sort_by(|a, b| {
            category_rank(a.category)
                .cmp(&category_rank(b.category))
                .then_with(|| a.common_name.cmp(&b.common_name))
        });

        let signs = self
            .fixture
            .signs
            .iter()
            .filter(|s| at.within_radius(WorldPosition::new(s.x, s.y), radius))
            .map(|s| {
                let symbol = self.fixture.sign_types.get(&s.kind);
                SignObservation {
                    kind: s.kind.clone(),
                    x: s.x,
                    y: s.y,
                    glyph: symbol.map_or_else(|| "?".to_string(), |sym| sym.glyph.clone()),
                    color: symbol.map_or(Rgb::FALLBACK, |sym| sym.color),
                    description: symbol.map(|sym| sym.description.clone()).unwrap_or_default(),
                }
            })
            .collect();

        let corridors = self
            .corridor_cells
            .iter()
            .filter(|(_, cells)| cells.contains(&at))
            .map(|(name, _)| name.clone())
            .collect();

        Ok(ObservationBatch {
            location: at,
            current_terrain: self.terrain_ref(here),
            visible_terrains,
            signs,
            observations,
            corridors,
            time_of_day: Some(time.to_string()),
            season: self.fixture.config.season.clone(),
        })
    }
}

#[async_trait]
impl DataGateway for FixtureGateway {
    async fn config(&self) -> Result<WorldConfig> {
        let mut config = self.fixture.config.clone();
        config.time_of_day = Some(self.current_time());
        Ok(config)
    }

    async fn terrain_window(&self, window: CellRect) -> Result<ViewportBatch> {
        let world = CellRect {
            min_x: 0,
            min_y: 0,
            max_x: self.fixture.config.grid_cols as i32,
            max_y: self.fixture.config.grid_rows as i32,
        };
        let clipped = window.clip(&world);
        let cells = (clipped.min_y..clipped.max_y)
            .map(|y| {
                (clipped.min_x..clipped.max_x)
                    .map(|x| self.grid[y as usize][x as usize])
                    .collect()
            })
            .collect();
        Ok(ViewportBatch {
            min_x: clipped.min_x,
            min_y: clipped.min_y,
            cells,
        })
    }

    async fn observations(&self, at: WorldPosition) -> Result<ObservationBatch> {
        self.observe(at)
    }

    async fn corridors(&self) -> Result<CorridorMap> {
        Ok(self
            .fixture
            .corridors
            .iter()
            .map(|(name, c)| {
                (
                    name.clone(),
                    Corridor {
                        color: c.color,
                        count: c.cells.len(),
                        cells: c.cells.clone(),
                    },
                )
            })
            .collect())
    }

    async fn all_signs(&self) -> Result<Vec<SignCatalogEntry>> {
        let mut by_type: Vec<SignCatalogEntry> = Vec::new();
        for sign in &self.fixture.signs {
            let at = WorldPosition::new(sign.x, sign.y);
            match by_type.iter_mut().find(|e| e.kind == sign.kind) {
                Some(entry) => entry.locations.push(at),
                None => {
                    let symbol = self.fixture.sign_types.get(&sign.kind);
                    by_type.push(SignCatalogEntry {
                        kind: sign.kind.clone(),
                        glyph: symbol.map_or_else(|| "?".to_string(), |s| s.glyph.clone()),
                        color: symbol.map_or(Rgb::FALLBACK, |s| s.color),
                        description: symbol.map(|s| s.description.clone()).unwrap_or_default(),
                        locations: vec![at],
                    });
                }
            }
        }
        Ok(by_type)
    }

    async fn set_time_of_day(&self, time: TimeOfDay) -> Result<TimeOfDay> {
        let mut slot = self
            .time_of_day
            .lock()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        *slot = time;
        tracing::debug!(%time, "fixture time of day set");
        Ok(time)
    }
}
