//! Shared value types for the fieldwalk client: grid positions and bounds,
//! colors, the screen transform, and the payloads exchanged with the data
//! gateway.

pub mod color;
pub mod observation;
pub mod transform;
pub mod types;

pub use color::{ColorError, Rgb};
pub use observation::{
    Corridor, CorridorMap, ObservationBatch, SensoryNotes, SignCatalogEntry, SignObservation,
    SpeciesCategory, SpeciesId, SpeciesObservation, TerrainId, TerrainRef, ViewportBatch,
};
pub use transform::{ScreenTransform, screen_to_world_delta, world_to_screen};
pub use types::{CellRect, Direction, GridBounds, TimeOfDay, UnknownTimeOfDay, WorldPosition};

/// Replace underscores with spaces for display (`deep_water` → `deep water`).
pub fn humanize(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_replaces_every_underscore() {
        assert_eq!(humanize("large_herbivore"), "large herbivore");
        assert_eq!(humanize("north_east_route"), "north east route");
    }
}
