//! The `FillPattern` external-collaborator contract plus
//! one concrete rectilinear implementation, grounded on the donor's
//! `linear_fill_polygon` family (`plotter/infill.rs`): rotate the target
//! shape so the fill direction is axis-aligned, sweep parallel lines at the
//! given spacing, clip each to the shape, then rotate the results back.

use glam::DVec2;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::geom::{ExPolygon, Point, Polygon, Polyline};

/// Given a surface, density, and line spacing, yields the polylines a
/// downstream extrusion scheduler traces to fill it. The core only needs
/// one implementation of this trait end-to-end (to drive gap fill and to
/// exercise the contract in tests); a printer driver's full fill-pattern
/// catalog (cubic, lightning, triangular, ...) lives outside this crate.
pub trait FillPattern {
    fn fill(&self, area: &ExPolygon, density: f64, spacing: i64, angle_deg: f64) -> Vec<Polyline>;
}

/// Parallel straight lines swept across the rotated bounding extent of the
/// area, clipped to the contour and subtracted holes.
pub struct Rectilinear;

impl FillPattern for Rectilinear {
    fn fill(&self, area: &ExPolygon, density: f64, spacing: i64, angle_deg: f64) -> Vec<Polyline> {
        if density <= 0.0 || spacing <= 0 {
            return Vec::new();
        }
        let step = (spacing as f64 / density).max(1.0) as i64;
        let angle = angle_deg.to_radians();

        let rotated_contour = rotate_polygon(area.contour(), -angle);
        let rotated_holes: Vec<Polygon> = area.holes().iter().map(|h| rotate_polygon(h, -angle)).collect();

        let (min_y, max_y) = y_bounds(&rotated_contour);
        if max_y <= min_y {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let mut y = min_y;
        while y <= max_y {
            let mut xs = scanline_intersections(&rotated_contour, y);
            for hole in &rotated_holes {
                xs.extend(scanline_intersections(hole, y));
            }
            xs.sort_by_key(|&x| OrderedFloat(x));

            for pair in xs.chunks_exact(2) {
                if pair[1] - pair[0] > 0.5 {
                    lines.push(Polyline::new(vec![
                        Point::new(pair[0].round() as i64, y),
                        Point::new(pair[1].round() as i64, y),
                    ]));
                }
            }
            y += step;
        }

        lines
            .into_iter()
            .map(|l| rotate_polyline(&l, angle))
            .collect()
    }
}

/// X coordinates where the horizontal line `y = y0` crosses `poly`'s edges,
/// even-odd scanline intersections sorted ascending.
fn scanline_intersections(poly: &Polygon, y0: i64) -> Vec<f64> {
    let mut xs = Vec::new();
    for (a, b) in poly.points().iter().copied().circular_tuple_windows() {
        if (a.y > y0) != (b.y > y0) {
            let t = (y0 - a.y) as f64 / (b.y - a.y) as f64;
            xs.push(a.x as f64 + t * (b.x - a.x) as f64);
        }
    }
    xs
}

fn rotate_polygon(poly: &Polygon, angle: f64) -> Polygon {
    Polygon::new(poly.points().iter().map(|&p| rotate_point(p, angle)).collect())
}

fn rotate_polyline(line: &Polyline, angle: f64) -> Polyline {
    Polyline::new(line.points().iter().map(|&p| rotate_point(p, angle)).collect())
}

fn rotate_point(p: Point, angle: f64) -> Point {
    let v = DVec2::new(p.x as f64, p.y as f64);
    let (sin, cos) = angle.sin_cos();
    let rotated = DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
    Point::new(rotated.x.round() as i64, rotated.y.round() as i64)
}

fn y_bounds(poly: &Polygon) -> (i64, i64) {
    let mut min_y = i64::MAX;
    let mut max_y = i64::MIN;
    for p in poly.points() {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    (min_y, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i64) -> ExPolygon {
        ExPolygon::new(
            Polygon::new(vec![
                Point::new(0, 0),
                Point::new(side, 0),
                Point::new(side, side),
                Point::new(0, side),
            ]),
            vec![],
        )
    }

    #[test]
    fn fills_a_square_with_parallel_lines() {
        let pattern = Rectilinear;
        let lines = pattern.fill(&square(10_000_000), 1.0, 1_000_000, 0.0);
        assert!(!lines.is_empty());
        for l in &lines {
            assert!(l.length() > 0.0);
        }
    }

    #[test]
    fn zero_density_yields_no_lines() {
        let pattern = Rectilinear;
        let lines = pattern.fill(&square(10_000_000), 0.0, 1_000_000, 0.0);
        assert!(lines.is_empty());
    }
}
