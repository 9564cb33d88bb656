use fieldwalk_common::{GridBounds, Rgb, SignObservation, WorldPosition};
use std::collections::{BTreeMap, HashSet};

use crate::visibility;

/// Every cell revealed this session.
///
/// Append-only: cells are inserted by [`ExplorationMemory::reveal`] and never
/// removed. Keys are packed `u64`s (see [`WorldPosition::key`]).
#[derive(Debug, Clone, Default)]
pub struct ExplorationMemory {
    cells: HashSet<u64>,
}

impl ExplorationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every in-bounds cell within `radius` of `center`.
    /// Returns how many cells were not known before.
    pub fn reveal(&mut self, center: WorldPosition, radius: u32, bounds: GridBounds) -> usize {
        let before = self.cells.len();
        self.cells
            .extend(visibility::disk(center, radius, bounds).map(WorldPosition::key));
        self.cells.len() - before
    }

    pub fn insert(&mut self, cell: WorldPosition) -> bool {
        self.cells.insert(cell.key())
    }

    pub fn contains(&self, cell: WorldPosition) -> bool {
        self.cells.contains(&cell.key())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WorldPosition> + '_ {
        self.cells.iter().copied().map(WorldPosition::from_key)
    }
}

/// What is kept of a sign once it has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberedSign {
    pub kind: String,
    pub glyph: String,
    pub color: Rgb,
}

/// Signs observed at any point this session, one per cell.
///
/// Kept apart from [`ExplorationMemory`]: signs are few and carry their own
/// glyph and color. A later sighting at the same cell replaces the entry.
#[derive(Debug, Clone, Default)]
pub struct SignMemory {
    signs: BTreeMap<WorldPosition, RememberedSign>,
}

impl SignMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch of sightings. Returns how many cells were new.
    pub fn record(&mut self, sightings: &[SignObservation]) -> usize {
        let before = self.signs.len();
        for sign in sightings {
            self.signs.insert(
                sign.position(),
                RememberedSign {
                    kind: sign.kind.clone(),
                    glyph: sign.glyph.clone(),
                    color: sign.color,
                },
            );
        }
        self.signs.len() - before
    }

    pub fn get(&self, cell: WorldPosition) -> Option<&RememberedSign> {
        self.signs.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Signs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (WorldPosition, &RememberedSign)> {
        self.signs.iter().map(|(pos, sign)| (*pos, sign))
    }
}
