use serde::{Deserialize, Serialize};

use super::point::Point;
use super::polygon::Polygon;

/// An open, ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Direction of the overall chord from first to last point, in radians.
    pub fn direction(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => a.direction_to(b),
            _ => 0.0,
        }
    }

    pub fn midpoint(&self) -> Point {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => a.midpoint(b),
            _ => Point::new(0, 0),
        }
    }

    /// Split a closed polygon ring into an open polyline starting/ending at its
    /// first point, as done for thin walls and loops that need a seam.
    pub fn from_closed_polygon(poly: &Polygon) -> Polyline {
        let mut points = poly.points().to_vec();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Polyline::new(points)
    }

    /// Clip this polyline to the portion(s) that lie inside `clip`, keeping
    /// each maximal inside run as a separate polyline. Used by the bridge
    /// detector to extract supporting edges within an expanded candidate.
    ///
    /// Each edge is truncated at its true intersection with `clip`'s
    /// boundary, not at whichever of its endpoints happens to land inside,
    /// so a run's first/last point lies exactly on `clip`'s perimeter.
    pub fn clip_by_polygon(&self, clip: &Polygon) -> Vec<Polyline> {
        if self.points.len() < 2 {
            return Vec::new();
        }

        let mut tagged: Vec<Point> = vec![self.points[0]];
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let mut crossings = segment_polygon_crossings(a, b, clip);
            crossings.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap());
            tagged.extend(crossings.into_iter().map(|(_, p)| p));
            tagged.push(b);
        }

        let mut runs = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for p in tagged {
            if clip.encloses_point(p) {
                current.push(p);
            } else if current.len() >= 2 {
                runs.push(Polyline::new(std::mem::take(&mut current)));
            } else {
                current.clear();
            }
        }
        if current.len() >= 2 {
            runs.push(Polyline::new(current));
        }
        runs
    }

    /// Simplify by a Douglas-Peucker-style perpendicular-distance tolerance.
    pub fn simplify(&self, tolerance: f64) -> Polyline {
        if self.points.len() < 3 {
            return self.clone();
        }
        Polyline::new(douglas_peucker(&self.points, tolerance))
    }
}

/// Parametric crossing points (strictly between `a` and `b`, `t` in `0..1`)
/// where segment `a -> b` crosses one of `clip`'s edges.
fn segment_polygon_crossings(a: Point, b: Point, clip: &Polygon) -> Vec<(f64, Point)> {
    let pts = clip.points();
    let n = pts.len();
    let mut out = Vec::new();
    if n < 2 {
        return out;
    }

    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (rx, ry) = (bx - ax, by - ay);

    for i in 0..n {
        let c = pts[i];
        let d = pts[(i + 1) % n];
        let (cx, cy) = (c.x as f64, c.y as f64);
        let (sx, sy) = (d.x as f64 - cx, d.y as f64 - cy);

        let denom = rx * sy - ry * sx;
        if denom.abs() < 1e-9 {
            continue;
        }
        let t = ((cx - ax) * sy - (cy - ay) * sx) / denom;
        let u = ((cx - ax) * ry - (cy - ay) * rx) / denom;
        if t > 1e-9 && t < 1.0 - 1e-9 && (0.0..=1.0).contains(&u) {
            let x = ax + rx * t;
            let y = ay + ry * t;
            out.push((t, Point::new(x.round() as i64, y.round() as i64)));
        }
    }
    out
}

fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let (first, last) = (points[0], *points.last().unwrap());
    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, &p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(p, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }
    if max_dist > tolerance {
        let mut left = douglas_peucker(&points[..=max_index], tolerance);
        let right = douglas_peucker(&points[max_index..], tolerance);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return p.distance(a);
    }
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    let cross = (dx * (a.y - p.y) as f64 - (a.x - p.x) as f64 * dy).abs();
    cross / len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_of_horizontal_segment_is_zero() {
        let line = Polyline::new(vec![Point::new(0, 0), Point::new(100, 0)]);
        assert_eq!(line.direction(), 0.0);
    }

    #[test]
    fn clip_truncates_at_the_true_boundary_crossing() {
        let square = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(1000, 0),
            Point::new(1000, 1000),
            Point::new(0, 1000),
        ]);
        let line = Polyline::new(vec![
            Point::new(-500, 500),
            Point::new(500, 500),
            Point::new(1500, 500),
        ]);
        let runs = line.clip_by_polygon(&square);
        assert_eq!(runs.len(), 1);
        let points = runs[0].points();
        assert_eq!(points.first(), Some(&Point::new(0, 500)));
        assert_eq!(points.last(), Some(&Point::new(1000, 500)));
    }

    #[test]
    fn clip_finds_a_through_crossing_with_both_endpoints_outside() {
        let square = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(1000, 0),
            Point::new(1000, 1000),
            Point::new(0, 1000),
        ]);
        let line = Polyline::new(vec![Point::new(500, -500), Point::new(500, 1500)]);
        let runs = line.clip_by_polygon(&square);
        assert_eq!(runs.len(), 1);
        let points = runs[0].points();
        assert_eq!(points.first(), Some(&Point::new(500, 0)));
        assert_eq!(points.last(), Some(&Point::new(500, 1000)));
    }

    #[test]
    fn simplify_collapses_nearly_straight_points() {
        let line = Polyline::new(vec![
            Point::new(0, 0),
            Point::new(50, 1),
            Point::new(100, 0),
        ]);
        let simplified = line.simplify(10.0);
        assert_eq!(simplified.points().len(), 2);
    }
}
