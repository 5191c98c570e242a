//! Grid geometry: points, the eight compass directions, and rectangles
//!
//! Coordinates are signed so that deltas and out-of-bounds lookups can be
//! expressed without casts. `Rect::center` uses floor division, which keeps
//! generated layouts bit-identical for a given seed.

use core::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A position (or offset) on the map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared euclidean distance, for radius checks without floats
    pub const fn distance_sq(self, other: Point) -> i32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, rhs: Direction) -> Point {
        self + rhs.delta()
    }
}

impl AddAssign<Direction> for Point {
    fn add_assign(&mut self, rhs: Direction) {
        *self = *self + rhs;
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One of the eight unit steps on the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
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
    /// All directions, clockwise from north
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

    /// Unit offset for this direction (y grows downward)
    pub const fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::NorthEast => Point::new(1, -1),
            Direction::East => Point::new(1, 0),
            Direction::SouthEast => Point::new(1, 1),
            Direction::South => Point::new(0, 1),
            Direction::SouthWest => Point::new(-1, 1),
            Direction::West => Point::new(-1, 0),
            Direction::NorthWest => Point::new(-1, -1),
        }
    }

    const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }

    /// The neighbour 45 degrees counter-clockwise
    pub const fn left(self) -> Direction {
        Self::ALL[(self.index() + 7) % 8]
    }

    /// The neighbour 45 degrees clockwise
    pub const fn right(self) -> Direction {
        Self::ALL[(self.index() + 1) % 8]
    }

    /// Direction whose delta equals `delta`, if it is a unit step
    pub fn from_delta(delta: Point) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.delta() == delta)
    }

    /// Normalize an arbitrary offset to a unit step.
    ///
    /// The offset is scaled to length one and each component rounded, so
    /// movement stays on the grid. Returns `None` for a zero offset.
    pub fn normalize(offset: Point) -> Option<Direction> {
        if offset == Point::default() {
            return None;
        }
        let distance = f64::from(offset.distance_sq(Point::default())).sqrt();
        let x = (f64::from(offset.x) / distance).round() as i32;
        let y = (f64::from(offset.y) / distance).round() as i32;
        Self::from_delta(Point::new(x, y))
    }

    /// Single step from `from` heading toward `to`
    pub fn toward(from: Point, to: Point) -> Option<Direction> {
        Self::normalize(to - from)
    }
}

/// Axis-aligned rectangle; the border cells are `x1`, `x2`, `y1`, `y2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Rectangle with top-left `(x, y)` spanning `w` by `h` cells.
    /// Negative sizes clamp to zero.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w.max(0),
            y2: y + h.max(0),
        }
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Center cell, rounding down on even spans
    pub const fn center(&self) -> Point {
        Point::new(
            (self.x1 + self.x2).div_euclid(2),
            (self.y1 + self.y2).div_euclid(2),
        )
    }

    /// True if the rectangles overlap or share an edge
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// True if `p` lies on or inside the border
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// True if `p` lies strictly inside the border
    pub const fn interior_contains(&self, p: Point) -> bool {
        p.x > self.x1 && p.x < self.x2 && p.y > self.y1 && p.y < self.y2
    }

    /// Cells strictly inside the border, row by row
    pub fn interior(&self) -> impl Iterator<Item = Point> + use<> {
        let Rect { x1, y1, x2, y2 } = *self;
        (y1 + 1..y2).flat_map(move |y| (x1 + 1..x2).map(move |x| Point::new(x, y)))
    }
}
