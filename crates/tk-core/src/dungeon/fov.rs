//! Field of view
//!
//! [`FovMap`] is a transparency snapshot of a map's terrain. It is cheap to
//! rebuild and is never persisted; `Map::initialize_fov` derives it again
//! from terrain after a load.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::geometry::Point;

/// Visibility algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum FovAlgorithm {
    /// Recursive shadowcasting over eight octants
    #[default]
    Shadowcast,
    /// Bresenham line of sight to every cell in range
    Raycast,
}

/// Cells visible from one origin, stored as a flat grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleSet {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl VisibleSet {
    /// An empty set covering a `width` x `height` grid
    pub fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width.max(0) * height.max(0)) as usize],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    fn insert(&mut self, p: Point) {
        if let Some(i) = self.index(p) {
            self.cells[i] = true;
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.cells[i])
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Visible cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| Point::new(i as i32 % width, i as i32 / width))
    }
}

/// Transparency grid the FOV algorithms read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FovMap {
    width: i32,
    height: i32,
    transparent: Vec<bool>,
}

impl FovMap {
    /// Build from a row-major transparency grid
    pub fn new(width: i32, height: i32, transparent: Vec<bool>) -> Self {
        assert_eq!(
            transparent.len(),
            (width * height) as usize,
            "transparency grid does not match {width}x{height}"
        );
        Self {
            width,
            height,
            transparent,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Out-of-bounds cells are treated as opaque
    pub fn is_transparent(&self, p: Point) -> bool {
        self.in_bounds(p) && self.transparent[(p.y * self.width + p.x) as usize]
    }

    /// Compute the cells visible from `origin`.
    ///
    /// `radius == 0` means unlimited. With `light_walls` set, opaque cells
    /// bordering the lit area are part of the result. The origin is always
    /// visible.
    pub fn compute(
        &self,
        origin: Point,
        radius: i32,
        light_walls: bool,
        algorithm: FovAlgorithm,
    ) -> VisibleSet {
        // No cell is further than width + height from any origin.
        let radius = if radius <= 0 {
            self.width + self.height
        } else {
            radius
        };
        let mut visible = VisibleSet::empty(self.width, self.height);
        visible.insert(origin);

        match algorithm {
            FovAlgorithm::Shadowcast => {
                for octant in 0..8 {
                    self.cast_light(&mut visible, origin, radius, 1, 1.0, 0.0, octant, light_walls);
                }
            }
            FovAlgorithm::Raycast => self.cast_rays(&mut visible, origin, radius, light_walls),
        }
        visible
    }

    #[allow(clippy::too_many_arguments)]
    fn cast_light(
        &self,
        visible: &mut VisibleSet,
        origin: Point,
        radius: i32,
        row: i32,
        mut start_slope: f64,
        end_slope: f64,
        octant: u8,
        light_walls: bool,
    ) {
        if start_slope < end_slope {
            return;
        }

        let mut next_start_slope = start_slope;
        for j in row..=radius {
            let mut blocked = false;
            let dy = -j;

            for dx in dy..=0 {
                let cur = origin + transform_octant(dx, dy, octant);
                let left_slope = (f64::from(dx) - 0.5) / (f64::from(dy) + 0.5);
                let right_slope = (f64::from(dx) + 0.5) / (f64::from(dy) - 0.5);

                if start_slope < right_slope {
                    continue;
                }
                if end_slope > left_slope {
                    break;
                }

                let opaque = !self.is_transparent(cur);
                if dx * dx + dy * dy <= radius * radius && (light_walls || !opaque) {
                    visible.insert(cur);
                }

                if blocked {
                    if opaque {
                        next_start_slope = right_slope;
                    } else {
                        blocked = false;
                        start_slope = next_start_slope;
                    }
                } else if opaque && j < radius {
                    blocked = true;
                    self.cast_light(
                        visible,
                        origin,
                        radius,
                        j + 1,
                        start_slope,
                        left_slope,
                        octant,
                        light_walls,
                    );
                    next_start_slope = right_slope;
                }
            }

            if blocked {
                break;
            }
        }
    }

    fn cast_rays(&self, visible: &mut VisibleSet, origin: Point, radius: i32, light_walls: bool) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let target = origin + Point::new(dx, dy);
                if !self.in_bounds(target) {
                    continue;
                }
                if !light_walls && !self.is_transparent(target) {
                    continue;
                }
                if self.has_line_of_sight(origin, target) {
                    visible.insert(target);
                }
            }
        }
    }

    /// Check if there's line of sight between two points (Bresenham's algorithm).
    ///
    /// A blocking cell is itself visible, but nothing behind it is.
    pub fn has_line_of_sight(&self, from: Point, to: Point) -> bool {
        let mut x = from.x;
        let mut y = from.y;

        let dx = (to.x - x).abs();
        let dy = -(to.y - y).abs();
        let sx = if x < to.x { 1 } else { -1 };
        let sy = if y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            let cur = Point::new(x, y);
            if cur != from && !self.is_transparent(cur) {
                return cur == to;
            }
            if cur == to {
                return true;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Map octant-local `(col, row)` to a grid offset
const fn transform_octant(col: i32, row: i32, octant: u8) -> Point {
    let (x, y) = match octant {
        1 => (row, col),
        2 => (row, -col),
        3 => (col, -row),
        4 => (-col, -row),
        5 => (-row, -col),
        6 => (-row, col),
        7 => (-col, row),
        _ => (col, row),
    };
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open `w`x`h` area surrounded by a one-cell wall
    fn open_room(w: i32, h: i32) -> FovMap {
        let mut transparent = vec![false; (w * h) as usize];
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                transparent[(y * w + x) as usize] = true;
            }
        }
        FovMap::new(w, h, transparent)
    }

    fn with_wall(mut map: FovMap, p: Point) -> FovMap {
        let w = map.width;
        map.transparent[(p.y * w + p.x) as usize] = false;
        map
    }

    #[test]
    fn test_origin_always_visible() {
        let map = open_room(10, 10);
        for algorithm in [FovAlgorithm::Shadowcast, FovAlgorithm::Raycast] {
            let v = map.compute(Point::new(5, 5), 3, true, algorithm);
            assert!(v.contains(Point::new(5, 5)));
        }
    }

    #[test]
    fn test_open_room_fully_visible() {
        let map = open_room(12, 9);
        for algorithm in [FovAlgorithm::Shadowcast, FovAlgorithm::Raycast] {
            let v = map.compute(Point::new(5, 4), 0, true, algorithm);
            for y in 1..8 {
                for x in 1..11 {
                    assert!(v.contains(Point::new(x, y)), "{algorithm}: ({x}, {y}) hidden");
                }
            }
        }
    }

    #[test]
    fn test_shadowcast_lights_room_walls() {
        let map = open_room(12, 9);
        let v = map.compute(Point::new(5, 4), 0, true, FovAlgorithm::Shadowcast);
        for x in 1..11 {
            assert!(v.contains(Point::new(x, 0)), "north wall ({x}, 0) hidden");
            assert!(v.contains(Point::new(x, 8)), "south wall ({x}, 8) hidden");
        }
        for y in 1..8 {
            assert!(v.contains(Point::new(0, y)), "west wall (0, {y}) hidden");
            assert!(v.contains(Point::new(11, y)), "east wall (11, {y}) hidden");
        }
    }

    #[test]
    fn test_unlimited_radius_reaches_far_corner() {
        let map = open_room(60, 60);
        for algorithm in [FovAlgorithm::Shadowcast, FovAlgorithm::Raycast] {
            let v = map.compute(Point::new(1, 1), 0, true, algorithm);
            assert!(v.contains(Point::new(58, 58)), "{algorithm}: far corner hidden");
            assert!(v.contains(Point::new(59, 59)), "{algorithm}: corner wall hidden");

            let v = map.compute(Point::new(58, 1), 0, false, algorithm);
            assert!(v.contains(Point::new(1, 58)), "{algorithm}: far corner hidden");
        }
    }

    #[test]
    fn test_light_walls_off_hides_walls() {
        let map = open_room(10, 10);
        let v = map.compute(Point::new(5, 5), 0, false, FovAlgorithm::Shadowcast);
        assert!(!v.contains(Point::new(0, 5)));
        assert!(v.contains(Point::new(1, 5)));
    }

    #[test]
    fn test_radius_limits_view() {
        let map = open_room(30, 30);
        for algorithm in [FovAlgorithm::Shadowcast, FovAlgorithm::Raycast] {
            let v = map.compute(Point::new(15, 15), 4, true, algorithm);
            assert!(v.contains(Point::new(19, 15)));
            assert!(!v.contains(Point::new(20, 15)));
            assert!(!v.contains(Point::new(1, 1)));
        }
    }

    #[test]
    fn test_wall_casts_shadow() {
        let map = with_wall(open_room(20, 11), Point::new(10, 5));
        for algorithm in [FovAlgorithm::Shadowcast, FovAlgorithm::Raycast] {
            let v = map.compute(Point::new(5, 5), 0, true, algorithm);
            assert!(v.contains(Point::new(9, 5)), "{algorithm}");
            assert!(v.contains(Point::new(10, 5)), "{algorithm}: wall itself is lit");
            assert!(!v.contains(Point::new(11, 5)), "{algorithm}: behind wall");
        }
    }

    #[test]
    fn test_line_of_sight() {
        let map = with_wall(open_room(16, 16), Point::new(10, 10));
        assert!(map.has_line_of_sight(Point::new(8, 10), Point::new(9, 10)));
        assert!(map.has_line_of_sight(Point::new(8, 10), Point::new(10, 10)));
        assert!(!map.has_line_of_sight(Point::new(8, 10), Point::new(11, 10)));
    }

    #[test]
    fn test_deterministic() {
        let map = with_wall(open_room(25, 25), Point::new(12, 9));
        let a = map.compute(Point::new(12, 12), 8, true, FovAlgorithm::Shadowcast);
        let b = map.compute(Point::new(12, 12), 8, true, FovAlgorithm::Shadowcast);
        assert_eq!(a, b);
    }

    #[test]
    fn test_visible_set_iter() {
        let map = open_room(6, 6);
        let v = map.compute(Point::new(2, 2), 0, true, FovAlgorithm::Shadowcast);
        assert_eq!(v.iter().count(), v.len());
        assert!(v.iter().all(|p| v.contains(p)));
        assert!(!v.is_empty());
    }
}
