use fieldwalk_common::Direction;

use crate::action::Action;

/// Cardinal step bound to a key name, if any.
///
/// Accepts the arrow key names and `w`/`a`/`s`/`d` in either case.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::North),
        "ArrowDown" => Some(Direction::South),
        "ArrowLeft" => Some(Direction::West),
        "ArrowRight" => Some(Direction::East),
        _ => {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            direction_for_char(c)
        }
    }
}

pub fn action_for_key(key: &str) -> Action {
    direction_for_key(key).map_or(Action::Noop, Action::Move)
}

fn direction_for_char(c: char) -> Option<Direction> {
    match c.to_ascii_lowercase() {
        'w' => Some(Direction::North),
        's' => Some(Direction::South),
        'a' => Some(Direction::West),
        'd' => Some(Direction::East),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no movement bound to {key:?} at position {index}")]
pub struct UnboundKey {
    pub key: char,
    pub index: usize,
}

/// Parse a scripted walk such as `"ddwwA"` into steps. Whitespace is ignored.
pub fn parse_moves(script: &str) -> Result<Vec<Direction>, UnboundKey> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(index, key)| direction_for_char(key).ok_or(UnboundKey { key, index }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_in_either_case() {
        assert_eq!(direction_for_key("ArrowUp"), Some(Direction::North));
        assert_eq!(direction_for_key("ArrowLeft"), Some(Direction::West));
        assert_eq!(direction_for_key("w"), Some(Direction::North));
        assert_eq!(direction_for_key("W"), Some(Direction::North));
        assert_eq!(direction_for_key("D"), Some(Direction::East));
        assert_eq!(direction_for_key("s"), Some(Direction::South));
    }

    #[test]
    fn unbound_keys_are_noop() {
        assert_eq!(direction_for_key("q"), None);
        assert_eq!(direction_for_key("wa"), None);
        assert_eq!(direction_for_key(""), None);
        assert_eq!(action_for_key("Enter"), Action::Noop);
        assert_eq!(action_for_key("a"), Action::Move(Direction::West));
    }

    #[test]
    fn scripted_walk() {
        assert_eq!(
            parse_moves("dd W\na").unwrap(),
            vec![
                Direction::East,
                Direction::East,
                Direction::North,
                Direction::West
            ]
        );
        assert_eq!(
            parse_moves("ddx").unwrap_err(),
            UnboundKey { key: 'x', index: 2 }
        );
    }
}
