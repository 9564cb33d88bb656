use fieldwalk_common::{CorridorMap, Rgb, humanize};
use fieldwalk_kernel::WorldConfig;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub cells: usize,
}

/// Corridor names, colors and sizes, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorridorLegend {
    pub entries: Vec<LegendEntry>,
}

impl CorridorLegend {
    pub fn from_corridors(corridors: &CorridorMap) -> Self {
        Self {
            entries: corridors
                .iter()
                .map(|(name, c)| LegendEntry {
                    label: humanize(name),
                    color: c.color,
                    cells: if c.count > 0 { c.count } else { c.cells.len() },
                })
                .collect(),
        }
    }
}

impl fmt::Display for CorridorLegend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Corridors")?;
        for e in &self.entries {
            writeln!(f, "  {} {} ({} cells)", e.color, e.label, e.cells)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredatorNotice {
    pub species: String,
    pub present: bool,
}

/// Predator presence flags from the world config, in name order.
pub fn predator_notices(config: &WorldConfig) -> Vec<PredatorNotice> {
    config
        .predator_presence
        .iter()
        .map(|(species, present)| PredatorNotice {
            species: humanize(species),
            present: *present,
        })
        .collect()
}

impl fmt::Display for PredatorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.present { "PRESENT" } else { "absent" };
        write!(f, "{}: {status}", self.species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwalk_common::{Corridor, WorldPosition};

    #[test]
    fn legend_in_name_order() {
        let mut corridors = CorridorMap::new();
        corridors.insert(
            "south_shore".into(),
            Corridor {
                color: Rgb::new(0x10, 0xb9, 0x81),
                count: 0,
                cells: vec![WorldPosition::new(1, 1), WorldPosition::new(2, 1)],
            },
        );
        corridors.insert(
            "north_east_route".into(),
            Corridor {
                color: Rgb::new(0xf5, 0x9e, 0x0b),
                count: 40,
                cells: vec![],
            },
        );
        let legend = CorridorLegend::from_corridors(&corridors);
        assert_eq!(legend.entries[0].label, "north east route");
        assert_eq!(legend.entries[0].cells, 40);
        assert_eq!(legend.entries[1].cells, 2);
        assert!(legend.to_string().contains("#f59e0b north east route (40 cells)"));
    }

    #[test]
    fn predator_notices_follow_config() {
        let config: WorldConfig = serde_json::from_str(
            r##"{
                "grid_cols": 4, "grid_rows": 4, "spawn_x": 0, "spawn_y": 0,
                "visibility_radius": 2,
                "terrain_types": {"0": {"name": "grassland", "color": "#86efac"}},
                "predator_presence": {"wolf": true, "brown_bear": false}
            }"##,
        )
        .unwrap();
        let notices = predator_notices(&config);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].to_string(), "brown bear: absent");
        assert_eq!(notices[1].to_string(), "wolf: PRESENT");
    }
}
