use fieldwalk_common::{Direction, TimeOfDay};
use fieldwalk_kernel::SessionFlag;
use glam::Vec2;

/// A high-level command produced from raw input.
///
/// The client controller consumes actions, never raw key or pointer events,
/// so keyboard, pointer and scripted input share the same session logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Step one cell.
    Move(Direction),
    /// Step one cell toward the clicked screen point.
    StepToward(Vec2),
    /// Pointer is over this screen point.
    Hover(Vec2),
    /// Pointer left the map.
    HoverExit,
    Toggle(SessionFlag),
    SetTimeOfDay(TimeOfDay),
    /// Input with no binding.
    Noop,
}

impl Action {
    /// True for actions that can move the player.
    pub fn is_movement(&self) -> bool {
        matches!(self, Action::Move(_) | Action::StepToward(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_actions() {
        assert!(Action::Move(Direction::North).is_movement());
        assert!(Action::StepToward(Vec2::ZERO).is_movement());
        assert!(!Action::Hover(Vec2::ZERO).is_movement());
        assert!(!Action::Toggle(SessionFlag::GodMode).is_movement());
        assert!(!Action::Noop.is_movement());
    }
}
