use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Absolute grid coordinate of a world cell.
///
/// Ordered by `x` then `y` so that position-keyed maps iterate the same way
/// on every run. Gateways send positions either as `{"x": .., "y": ..}` or as
/// a bare `[x, y]` pair; both deserialize to the same value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "PositionRepr")]
pub struct WorldPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Object { x: i32, y: i32 },
    Pair(i32, i32),
}

impl From<PositionRepr> for WorldPosition {
    fn from(repr: PositionRepr) -> Self {
        match repr {
            PositionRepr::Object { x, y } | PositionRepr::Pair(x, y) => Self { x, y },
        }
    }
}

impl WorldPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by the given step.
    pub fn offset(self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Vector from `self` to `other`.
    pub fn delta_to(self, other: WorldPosition) -> IVec2 {
        IVec2::new(other.x - self.x, other.y - self.y)
    }

    /// Squared Euclidean distance, exact for any pair of grid cells.
    pub fn distance_squared(self, other: WorldPosition) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }

    /// True if `other` lies within `radius` cells, boundary included.
    pub fn within_radius(self, other: WorldPosition, radius: u32) -> bool {
        let r = i64::from(radius);
        self.distance_squared(other) <= r.saturating_mul(r)
    }

    /// Packed key used by set containers in place of `"x,y"` strings.
    pub fn key(self) -> u64 {
        (u64::from(self.x as u32) << 32) | u64::from(self.y as u32)
    }

    pub fn from_key(key: u64) -> Self {
        Self::new((key >> 32) as u32 as i32, key as u32 as i32)
    }

    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

impl From<IVec2> for WorldPosition {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// World extent: valid cells are `[0, cols) × [0, rows)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub cols: u32,
    pub rows: u32,
}

impl GridBounds {
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, pos: WorldPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.cols && (pos.y as u32) < self.rows
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Square window of `radius` cells around `center`, clipped to the world.
    pub fn window_around(&self, center: WorldPosition, radius: u32) -> CellRect {
        let r = i64::from(radius);
        let clamp = |v: i64, hi: u32| v.clamp(0, i64::from(hi).min(i64::from(i32::MAX))) as i32;
        CellRect {
            min_x: clamp(i64::from(center.x) - r, self.cols),
            min_y: clamp(i64::from(center.y) - r, self.rows),
            max_x: clamp(i64::from(center.x) + r + 1, self.cols),
            max_y: clamp(i64::from(center.y) + r + 1, self.rows),
        }
    }
}

/// Rectangle of cells with inclusive min and exclusive max edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl CellRect {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, pos: WorldPosition) -> bool {
        pos.x >= self.min_x && pos.x < self.max_x && pos.y >= self.min_y && pos.y < self.max_y
    }

    /// Intersection with another rectangle; empty if they do not overlap.
    pub fn clip(&self, other: &CellRect) -> CellRect {
        CellRect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }
}

/// One of the eight unit movement steps. Screen convention: `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn delta(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::NorthEast => IVec2::new(1, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::SouthEast => IVec2::new(1, 1),
            Direction::South => IVec2::new(0, 1),
            Direction::SouthWest => IVec2::new(-1, 1),
            Direction::West => IVec2::new(-1, 0),
            Direction::NorthWest => IVec2::new(-1, -1),
        }
    }

    /// Unit step toward an arbitrary cell delta, `None` for the zero vector.
    pub fn toward(delta: IVec2) -> Option<Self> {
        let step = delta.signum();
        Self::ALL.into_iter().find(|d| d.delta() == step)
    }
}

/// Session-wide time setting owned by the data service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Dawn,
    Morning,
    #[default]
    Midday,
    Afternoon,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 6] = [
        TimeOfDay::Dawn,
        TimeOfDay::Morning,
        TimeOfDay::Midday,
        TimeOfDay::Afternoon,
        TimeOfDay::Dusk,
        TimeOfDay::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Dawn => "dawn",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown time of day: {0:?}")]
pub struct UnknownTimeOfDay(pub String);

impl FromStr for TimeOfDay {
    type Err = UnknownTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTimeOfDay(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_negative_and_positive() {
        for pos in [
            WorldPosition::new(0, 0),
            WorldPosition::new(199, 249),
            WorldPosition::new(-3, 7),
        ] {
            assert_eq!(WorldPosition::from_key(pos.key()), pos);
        }
        assert_ne!(
            WorldPosition::new(1, 2).key(),
            WorldPosition::new(2, 1).key()
        );
    }

    #[test]
    fn within_radius_is_inclusive() {
        let origin = WorldPosition::new(0, 0);
        assert!(origin.within_radius(WorldPosition::new(3, 4), 5));
        assert!(!origin.within_radius(WorldPosition::new(4, 4), 5));
        assert!(origin.within_radius(WorldPosition::new(1 << 30, 1 << 30), u32::MAX));
    }

    #[test]
    fn position_accepts_object_and_pair() {
        let a: WorldPosition = serde_json::from_str(r#"{"x": 4, "y": 9}"#).unwrap();
        let b: WorldPosition = serde_json::from_str("[4, 9]").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bounds_reject_every_edge() {
        let bounds = GridBounds::new(10, 5);
        assert!(bounds.contains(WorldPosition::new(0, 0)));
        assert!(bounds.contains(WorldPosition::new(9, 4)));
        assert!(!bounds.contains(WorldPosition::new(-1, 0)));
        assert!(!bounds.contains(WorldPosition::new(0, -1)));
        assert!(!bounds.contains(WorldPosition::new(10, 0)));
        assert!(!bounds.contains(WorldPosition::new(0, 5)));
    }

    #[test]
    fn window_is_clipped_to_world() {
        let bounds = GridBounds::new(100, 100);
        let w = bounds.window_around(WorldPosition::new(3, 98), 25);
        assert_eq!(w.min_x, 0);
        assert_eq!(w.min_y, 73);
        assert_eq!(w.max_x, 29);
        assert_eq!(w.max_y, 100);
        assert_eq!(w.width(), 29);
    }

    #[test]
    fn huge_radius_window_is_the_whole_world() {
        let bounds = GridBounds::new(40, 30);
        let w = bounds.window_around(WorldPosition::new(10, 15), u32::MAX);
        assert_eq!((w.min_x, w.min_y, w.max_x, w.max_y), (0, 0, 40, 30));
    }

    #[test]
    fn direction_toward_normalizes_to_unit_step() {
        assert_eq!(Direction::toward(IVec2::new(7, 0)), Some(Direction::East));
        assert_eq!(
            Direction::toward(IVec2::new(-3, -12)),
            Some(Direction::NorthWest)
        );
        assert_eq!(Direction::toward(IVec2::ZERO), None);
    }

    #[test]
    fn time_of_day_parses_case_insensitively() {
        assert_eq!("Dusk".parse::<TimeOfDay>().unwrap(), TimeOfDay::Dusk);
        assert!("teatime".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::default(), TimeOfDay::Midday);
    }
}
