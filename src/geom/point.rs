use geo::Coord;
use serde::{Deserialize, Serialize};

/// A point in scaled integer coordinates (see [`crate::scale`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn squared_distance(self, other: Point) -> i128 {
        let dx = (self.x - other.x) as i128;
        let dy = (self.y - other.y) as i128;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    /// Direction of the vector `self -> other`, in radians.
    pub fn direction_to(self, other: Point) -> f64 {
        ((other.y - self.y) as f64).atan2((other.x - self.x) as f64)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Coord<f64> {
        Coord {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

impl From<Coord<f64>> for Point {
    fn from(c: Coord<f64>) -> Point {
        Point::new(c.x.round() as i64, c.y.round() as i64)
    }
}
