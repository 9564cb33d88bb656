use fieldwalk_common::{GridBounds, Rgb, TerrainId, TimeOfDay, WorldPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference data for one terrain id. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainTile {
    pub name: String,
    pub color: Rgb,
    #[serde(default)]
    pub description: Option<String>,
}

/// World description served by the gateway at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub spawn_x: i32,
    pub spawn_y: i32,
    pub visibility_radius: u32,
    pub terrain_types: BTreeMap<TerrainId, TerrainTile>,
    #[serde(default)]
    pub predator_presence: BTreeMap<String, bool>,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub season: Option<String>,
}

/// Reasons a served configuration cannot start a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("world must have at least one row and column, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("spawn {spawn} lies outside the {cols}x{rows} world")]
    SpawnOutOfBounds {
        spawn: WorldPosition,
        cols: u32,
        rows: u32,
    },
    #[error("terrain table is empty")]
    NoTerrain,
}

impl WorldConfig {
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.grid_cols, self.grid_rows)
    }

    pub fn spawn(&self) -> WorldPosition {
        WorldPosition::new(self.spawn_x, self.spawn_y)
    }

    pub fn terrain(&self, id: TerrainId) -> Option<&TerrainTile> {
        self.terrain_types.get(&id)
    }

    /// Display color for a terrain id, neutral gray if the id is unknown.
    pub fn terrain_color(&self, id: TerrainId) -> Rgb {
        self.terrain(id).map_or(Rgb::FALLBACK, |t| t.color)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cols == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }
        if !self.bounds().contains(self.spawn()) {
            return Err(ConfigError::SpawnOutOfBounds {
                spawn: self.spawn(),
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }
        if self.terrain_types.is_empty() {
            return Err(ConfigError::NoTerrain);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config(cols: u32, rows: u32, spawn: (i32, i32), radius: u32) -> WorldConfig {
    let mut terrain_types = BTreeMap::new();
    terrain_types.insert(
        0,
        TerrainTile {
            name: "grassland".into(),
            color: Rgb::new(0x86, 0xef, 0xac),
            description: None,
        },
    );
    terrain_types.insert(
        1,
        TerrainTile {
            name: "shallow_water".into(),
            color: Rgb::new(0x3b, 0x82, 0xf6),
            description: Some("Shallow lake margins".into()),
        },
    );
    WorldConfig {
        grid_cols: cols,
        grid_rows: rows,
        spawn_x: spawn.0,
        spawn_y: spawn.1,
        visibility_radius: radius,
        terrain_types,
        predator_presence: BTreeMap::new(),
        time_of_day: None,
        season: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gateway_config_with_string_keys() {
        let json = r##"{
            "grid_cols": 200, "grid_rows": 250, "spawn_x": 20, "spawn_y": 42,
            "visibility_radius": 3,
            "terrain_types": {
                "0": {"name": "deep_water", "color": "#1e3a8a"},
                "8": {"name": "platform", "color": "#92400e"}
            },
            "predator_presence": {"wolf": true, "bear": false},
            "time_of_day": "dusk"
        }"##;
        let config: WorldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bounds(), GridBounds::new(200, 250));
        assert_eq!(config.terrain(8).unwrap().name, "platform");
        assert_eq!(config.time_of_day, Some(TimeOfDay::Dusk));
        assert_eq!(config.terrain_color(42), Rgb::FALLBACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_terrain_color_fails_to_parse() {
        let json = r#"{
            "grid_cols": 2, "grid_rows": 2, "spawn_x": 0, "spawn_y": 0,
            "visibility_radius": 1,
            "terrain_types": {"0": {"name": "x", "color": "green"}}
        }"#;
        assert!(serde_json::from_str::<WorldConfig>(json).is_err());
    }

    #[test]
    fn validate_rejects_bad_spawn_and_empty_tables() {
        let config = test_config(10, 10, (10, 3), 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds { .. })
        ));

        let mut config = test_config(10, 10, (1, 1), 2);
        config.terrain_types.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoTerrain));

        let config = test_config(0, 10, (0, 0), 2);
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { .. })));
    }
}
