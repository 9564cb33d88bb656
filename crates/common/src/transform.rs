//! World cell ⇄ screen pixel mapping.
//!
//! The player's cell is always centred on the viewport centre; every other
//! cell is offset from it by whole multiples of the cell size.

use glam::{IVec2, Vec2};

use crate::types::WorldPosition;

/// Pixel centre of `world` when `player` sits at `viewport_center`.
pub fn world_to_screen(
    world: WorldPosition,
    player: WorldPosition,
    viewport_center: Vec2,
    cell_size: f32,
) -> Vec2 {
    viewport_center + player.delta_to(world).as_vec2() * cell_size
}

/// Cell step from the viewport centre to `point`, rounded to the nearest cell.
///
/// Halves round up, so a cell's top-left pixel belongs to that cell on
/// either side of the player.
pub fn screen_to_world_delta(point: Vec2, viewport_center: Vec2, cell_size: f32) -> IVec2 {
    ((point - viewport_center) / cell_size + Vec2::splat(0.5))
        .floor()
        .as_ivec2()
}

/// Bundled transform parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub player: WorldPosition,
    pub viewport: Vec2,
    pub cell_size: f32,
}

impl ScreenTransform {
    pub fn new(player: WorldPosition, viewport: Vec2, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            player,
            viewport,
            cell_size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Pixel centre of a cell.
    pub fn world_to_screen(&self, world: WorldPosition) -> Vec2 {
        world_to_screen(world, self.player, self.center(), self.cell_size)
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, world: WorldPosition) -> Vec2 {
        self.world_to_screen(world) - Vec2::splat(self.cell_size * 0.5)
    }

    pub fn screen_to_world_delta(&self, point: Vec2) -> IVec2 {
        screen_to_world_delta(point, self.center(), self.cell_size)
    }

    /// World cell under a screen point.
    pub fn screen_to_world(&self, point: Vec2) -> WorldPosition {
        self.player.offset(self.screen_to_world_delta(point))
    }

    /// True if `point` lies inside the viewport grown by `margin` on every side.
    pub fn is_on_screen(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x < self.viewport.x + margin
            && point.y < self.viewport.y + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> ScreenTransform {
        ScreenTransform::new(WorldPosition::new(50, 50), Vec2::new(408.0, 408.0), 8.0)
    }

    #[test]
    fn player_cell_is_viewport_center() {
        let t = transform();
        assert_eq!(t.world_to_screen(t.player), Vec2::new(204.0, 204.0));
        assert_eq!(t.cell_origin(t.player), Vec2::new(200.0, 200.0));
    }

    #[test]
    fn delta_inverts_world_to_screen() {
        let t = transform();
        for dx in -25..=25 {
            for dy in [-25, -1, 0, 3, 25] {
                let cell = WorldPosition::new(50 + dx, 50 + dy);
                let screen = t.world_to_screen(cell);
                assert_eq!(t.screen_to_world_delta(screen), IVec2::new(dx, dy));
                assert_eq!(t.screen_to_world(screen), cell);
            }
        }
    }

    #[test]
    fn any_point_inside_a_cell_maps_back_to_it() {
        let t = transform();
        let cell = WorldPosition::new(53, 48);
        let origin = t.cell_origin(cell);
        for offset in [0.0, 0.1, 2.0, 4.0, 7.4, 7.99] {
            let p = origin + Vec2::splat(offset);
            assert_eq!(t.screen_to_world(p), cell);
        }
    }

    #[test]
    fn cell_origin_maps_back_on_both_sides() {
        let t = transform();
        for dx in [-3, -1, 0, 1, 3] {
            for dy in [-3, -1, 0, 1, 3] {
                let cell = WorldPosition::new(50 + dx, 50 + dy);
                let origin = t.cell_origin(cell);
                assert_eq!(t.screen_to_world(origin), cell, "origin of {cell}");
                let last = origin + Vec2::splat(t.cell_size - 0.01);
                assert_eq!(t.screen_to_world(last), cell, "far corner of {cell}");
            }
        }
    }

    #[test]
    fn on_screen_respects_margin() {
        let t = transform();
        assert!(t.is_on_screen(Vec2::new(0.0, 0.0), 0.0));
        assert!(!t.is_on_screen(Vec2::new(-4.0, 10.0), 0.0));
        assert!(t.is_on_screen(Vec2::new(-4.0, 10.0), 8.0));
        assert!(!t.is_on_screen(Vec2::new(408.0, 10.0), 0.0));
    }
}
