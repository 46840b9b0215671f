// Movement directions and their default key bindings

use winit::keyboard::KeyCode;

use crate::core::Vector2;

/// A movement direction on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset in screen space (y grows downward)
    pub fn offset(self) -> Vector2 {
        match self {
            Direction::Up => Vector2::new(0.0, -1.0),
            Direction::Down => Vector2::new(0.0, 1.0),
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
        }
    }
}

/// Default bindings for the first player (WASD)
pub fn default_p1_bindings() -> Vec<(KeyCode, Direction)> {
    vec![
        (KeyCode::KeyW, Direction::Up),
        (KeyCode::KeyA, Direction::Left),
        (KeyCode::KeyS, Direction::Down),
        (KeyCode::KeyD, Direction::Right),
    ]
}

/// Default bindings for the second player (arrow keys)
pub fn default_p2_bindings() -> Vec<(KeyCode, Direction)> {
    vec![
        (KeyCode::ArrowUp, Direction::Up),
        (KeyCode::ArrowLeft, Direction::Left),
        (KeyCode::ArrowDown, Direction::Down),
        (KeyCode::ArrowRight, Direction::Right),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_offsets_are_unit_and_opposed() {
        for direction in Direction::ALL {
            assert_eq!(direction.offset().magnitude(), 1.0);
        }
        assert_eq!(Direction::Up.offset().plus(Direction::Down.offset()), Vector2::ZERO);
        assert_eq!(Direction::Left.offset().plus(Direction::Right.offset()), Vector2::ZERO);
    }

    #[test]
    fn test_default_bindings_cover_every_direction() {
        for bindings in [default_p1_bindings(), default_p2_bindings()] {
            let directions: HashSet<_> = bindings.iter().map(|(_, d)| *d).collect();
            assert_eq!(directions.len(), 4);
        }
    }

    #[test]
    fn test_players_do_not_share_keys() {
        let p1: HashSet<_> = default_p1_bindings().into_iter().map(|(k, _)| k).collect();
        assert!(default_p2_bindings()
            .iter()
            .all(|(key, _)| !p1.contains(key)));
    }
}
