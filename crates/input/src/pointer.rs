use fieldwalk_common::{Direction, ScreenTransform, WorldPosition};
use glam::Vec2;

/// Unit step toward the cell under a click. `None` when the click lands on
/// the player's own cell.
pub fn click_step(point: Vec2, view: &ScreenTransform) -> Option<Direction> {
    let step = Direction::toward(view.screen_to_world_delta(point));
    tracing::trace!(x = point.x, y = point.y, ?step, "click");
    step
}

/// World cell under the pointer.
pub fn hover_cell(point: Vec2, view: &ScreenTransform) -> WorldPosition {
    view.screen_to_world(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ScreenTransform {
        ScreenTransform::new(WorldPosition::new(50, 50), Vec2::new(408.0, 408.0), 8.0)
    }

    #[test]
    fn click_steps_toward_cell() {
        let view = view();
        assert_eq!(click_step(Vec2::new(300.0, 204.0), &view), Some(Direction::East));
        assert_eq!(click_step(Vec2::new(100.0, 100.0), &view), Some(Direction::NorthWest));
        assert_eq!(click_step(Vec2::new(204.0, 380.0), &view), Some(Direction::South));
        assert_eq!(click_step(Vec2::new(260.0, 150.0), &view), Some(Direction::NorthEast));
    }

    #[test]
    fn click_on_own_cell_is_noop() {
        let view = view();
        assert_eq!(click_step(Vec2::new(204.0, 204.0), &view), None);
        assert_eq!(click_step(Vec2::new(207.0, 201.0), &view), None);
        assert_eq!(click_step(view.cell_origin(view.player), &view), None);
    }

    #[test]
    fn edge_pixels_belong_to_the_drawn_cell() {
        let view = view();
        let west = WorldPosition::new(49, 50);
        assert_eq!(hover_cell(view.cell_origin(west), &view), west);
        assert_eq!(click_step(view.cell_origin(west), &view), Some(Direction::West));
        let north = WorldPosition::new(50, 49);
        assert_eq!(hover_cell(view.cell_origin(north), &view), north);
        assert_eq!(click_step(view.cell_origin(north), &view), Some(Direction::North));
    }

    #[test]
    fn hover_rounds_to_nearest_cell() {
        let view = view();
        assert_eq!(hover_cell(Vec2::new(212.0, 204.0), &view), WorldPosition::new(51, 50));
        assert_eq!(hover_cell(Vec2::new(203.0, 195.0), &view), WorldPosition::new(50, 49));
    }
}
