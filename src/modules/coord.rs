use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing of an agent. The declaration order is the turning order: one
/// step forward is a right turn on a screen whose y axis points down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub const fn index(self) -> i32 {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Unit vector for one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// Rotate by `steps` positions in declaration order, wrapping mod 4.
    pub fn turn(self, steps: i32) -> Direction {
        Direction::ALL[(self.index() + steps).rem_euclid(4) as usize]
    }

    pub fn random(rng: &mut impl Rng) -> Direction {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }

    pub const fn glyph(self) -> char {
        match self {
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Up => '^',
        }
    }
}

/// Dimensions of the toroidal board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn cells(self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn contains(self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    pub fn wrap(self, x: i32, y: i32) -> Coord {
        Coord {
            x: x.rem_euclid(self.width),
            y: y.rem_euclid(self.height),
        }
    }

    /// The cell one step ahead of `position`, wrapping at every edge.
    pub fn cell_in_front(self, position: Coord, facing: Direction) -> Coord {
        let (dx, dy) = facing.offset();
        self.wrap(position.x + dx, position.y + dy)
    }

    pub fn random_coord(self, rng: &mut impl Rng) -> Coord {
        Coord {
            x: rng.gen_range(0..self.width),
            y: rng.gen_range(0..self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_in_front_wraps_every_edge() {
        let board = Board::new(10, 10);

        assert_eq!(
            board.cell_in_front(Coord::new(9, 4), Direction::Right),
            Coord::new(0, 4)
        );
        assert_eq!(
            board.cell_in_front(Coord::new(0, 4), Direction::Left),
            Coord::new(9, 4)
        );
        assert_eq!(
            board.cell_in_front(Coord::new(3, 9), Direction::Down),
            Coord::new(3, 0)
        );
        assert_eq!(
            board.cell_in_front(Coord::new(3, 0), Direction::Up),
            Coord::new(3, 9)
        );
    }

    #[test]
    fn cell_in_front_wraps_corners_on_non_square_board() {
        let board = Board::new(7, 3);
        let corners = [
            Coord::new(0, 0),
            Coord::new(6, 0),
            Coord::new(0, 2),
            Coord::new(6, 2),
        ];

        for corner in corners {
            for dir in Direction::ALL {
                let next = board.cell_in_front(corner, dir);
                assert!(board.contains(next), "{corner} facing {dir:?} left the board");
            }
        }
        assert_eq!(
            board.cell_in_front(Coord::new(6, 2), Direction::Right),
            Coord::new(0, 2)
        );
        assert_eq!(
            board.cell_in_front(Coord::new(0, 0), Direction::Up),
            Coord::new(0, 2)
        );
    }

    #[test]
    fn cell_in_front_moves_one_step_inside_board() {
        let board = Board::new(10, 10);
        let from = Coord::new(5, 5);

        assert_eq!(board.cell_in_front(from, Direction::Right), Coord::new(6, 5));
        assert_eq!(board.cell_in_front(from, Direction::Down), Coord::new(5, 6));
        assert_eq!(board.cell_in_front(from, Direction::Left), Coord::new(4, 5));
        assert_eq!(board.cell_in_front(from, Direction::Up), Coord::new(5, 4));
    }

    #[test]
    fn four_turns_return_to_start() {
        for dir in Direction::ALL {
            let right = (0..4).fold(dir, |d, _| d.turn(1));
            let left = (0..4).fold(dir, |d, _| d.turn(-1));
            assert_eq!(right, dir);
            assert_eq!(left, dir);
        }
    }

    #[test]
    fn turning_follows_declaration_order() {
        assert_eq!(Direction::Right.turn(1), Direction::Down);
        assert_eq!(Direction::Up.turn(1), Direction::Right);
        assert_eq!(Direction::Right.turn(-1), Direction::Up);
        assert_eq!(Direction::Down.turn(-1), Direction::Right);
    }
}
