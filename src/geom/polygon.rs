use geo::{Coord, LineString};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::point::Point;

/// A single closed ring: counter-clockwise winding marks an outer contour,
/// clockwise winding marks a hole. The ring is implicitly closed (no
/// duplicated first/last point) and never contains consecutive duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if deduped.last() != Some(&p) {
                deduped.push(p);
            }
        }
        if deduped.len() > 1 && deduped.first() == deduped.last() {
            deduped.pop();
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area (shoelace formula), positive for CCW, negative for CW.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let sum: i128 = self
            .points
            .iter()
            .copied()
            .circular_tuple_windows()
            .map(|(a, b)| (a.x as i128) * (b.y as i128) - (b.x as i128) * (a.y as i128))
            .sum();
        sum as f64 / 2.0
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.area() > 0.0
    }

    /// Perimeter length in scaled units.
    pub fn length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points
            .iter()
            .copied()
            .circular_tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    pub fn reversed(&self) -> Polygon {
        let mut points = self.points.clone();
        points.reverse();
        Polygon::new(points)
    }

    /// Ray-casting point-in-polygon test; boundary membership is treated as inside.
    pub fn encloses_point(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if on_segment(pi, pj, p) {
                return true;
            }
            let intersects = (pi.y > p.y) != (pj.y > p.y)
                && (p.x as f64)
                    < (pj.x - pi.x) as f64 * (p.y - pi.y) as f64 / (pj.y - pi.y) as f64
                        + pi.x as f64;
            if intersects {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn centroid(&self) -> Point {
        let n = self.points.len().max(1) as i64;
        let sum = self
            .points
            .iter()
            .fold(Point::new(0, 0), |acc, p| acc + *p);
        Point::new(sum.x / n, sum.y / n)
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self.points.iter().map(|&p| p.into()).collect();
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
        LineString::new(coords)
    }

    pub fn from_line_string(ls: &LineString<f64>) -> Polygon {
        let points: Vec<Point> = ls.0.iter().map(|&c| Point::from(c)).collect();
        Polygon::new(points)
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x - a.x) as i128 * (p.y - a.y) as i128 - (b.y - a.y) as i128 * (p.x - a.x) as i128;
    if cross != 0 {
        return false;
    }
    let dot = (p.x - a.x) as i128 * (p.x - b.x) as i128 + (p.y - a.y) as i128 * (p.y - b.y) as i128;
    dot <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn ccw_square_has_positive_area() {
        let sq = square(1000);
        assert!(sq.is_counter_clockwise());
        assert_eq!(sq.area(), 1_000_000.0);
    }

    #[test]
    fn reversed_square_is_clockwise() {
        let sq = square(1000).reversed();
        assert!(!sq.is_counter_clockwise());
    }

    #[test]
    fn encloses_point_inside_and_outside() {
        let sq = square(1000);
        assert!(sq.encloses_point(Point::new(500, 500)));
        assert!(!sq.encloses_point(Point::new(1500, 500)));
    }

    #[test]
    fn drops_consecutive_duplicates_and_closing_point() {
        let poly = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 0),
        ]);
        assert_eq!(poly.len(), 3);
    }
}
