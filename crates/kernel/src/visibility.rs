//! Visibility evaluator.
//!
//! Classification is a pure function of player position, radius and memory.
//! It is recomputed on every render and never stored.

use fieldwalk_common::{GridBounds, WorldPosition};

use crate::memory::ExplorationMemory;

/// How a cell is perceived from the player's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityClass {
    /// Within the live visibility radius.
    Visible,
    /// Seen earlier this session but outside the radius now.
    Revealed,
    /// Never seen.
    Unknown,
}

/// Classify `cell`; the radius boundary counts as visible.
pub fn classify(
    cell: WorldPosition,
    player: WorldPosition,
    radius: u32,
    memory: &ExplorationMemory,
) -> VisibilityClass {
    if player.within_radius(cell, radius) {
        VisibilityClass::Visible
    } else if memory.contains(cell) {
        VisibilityClass::Revealed
    } else {
        VisibilityClass::Unknown
    }
}

/// In-bounds cells of the disk of `radius` around `center`, row by row.
pub fn disk(
    center: WorldPosition,
    radius: u32,
    bounds: GridBounds,
) -> impl Iterator<Item = WorldPosition> {
    let window = bounds.window_around(center, radius);
    (window.min_y..window.max_y)
        .flat_map(move |y| (window.min_x..window.max_x).map(move |x| WorldPosition::new(x, y)))
        .filter(move |cell| center.within_radius(*cell, radius))
}
