//! Medial axis extraction.
//!
//! The donor slicer never computes one (its retrieved source handles only
//! full-width walls and infill, not thin-wall fallback), so this is grounded
//! directly on the general computational-geometry technique rather than on a
//! donor file: for every boundary sample point, cast a ray along the inward
//! normal, pair it with the nearest opposite boundary crossing, and take the
//! midpoint of each pair as one point of the skeleton. Consecutive pairs
//! along the boundary are chained into polylines (or, when a ring's pairing
//! wraps all the way around, a closed polygon). This is an approximation —
//! it traces the centerline of ribbon-like thin walls and gaps correctly
//! but does not resolve the branch points of a true Voronoi-diagram medial
//! axis for shapes with three or more comparably-thin arms meeting at a
//! junction.

use itertools::Itertools;

use crate::scale::SCALED_RESOLUTION;

use super::expolygon::ExPolygon;
use super::point::Point;
use super::polygon::Polygon;
use super::polyline::Polyline;

/// A boundary sample: a point on the ring and the unit inward normal there.
struct Sample {
    point: Point,
    normal: (f64, f64),
}

pub fn medial_axis(ex: &ExPolygon, max_width: i64) -> (Vec<Polyline>, Vec<Polygon>) {
    if max_width <= 0 {
        return (Vec::new(), Vec::new());
    }

    let rings: Vec<&Polygon> = std::iter::once(ex.contour()).chain(ex.holes()).collect();
    let all_edges: Vec<(Point, Point)> = rings
        .iter()
        .flat_map(|ring| ring_edges(ring))
        .collect();

    let mut polylines = Vec::new();
    let mut polygons = Vec::new();

    for ring in &rings {
        let samples = sample_ring(ring, max_width);
        if samples.len() < 2 {
            continue;
        }

        let max_pair_distance = max_width as f64 * 1.25;
        let centers: Vec<Option<Point>> = samples
            .iter()
            .map(|s| {
                cast_ray(s.point, s.normal, &all_edges).and_then(|hit| {
                    let dist = s.point.distance(hit);
                    if dist <= max_pair_distance {
                        Some(s.point.midpoint(hit))
                    } else {
                        None
                    }
                })
            })
            .collect();

        let all_paired = centers.iter().all(Option::is_some);
        for run in split_runs(&centers) {
            if run.len() < 2 {
                continue;
            }
            let resolution = SCALED_RESOLUTION as f64;
            let simplified = Polyline::new(run.clone()).simplify(resolution);
            if all_paired && run.len() == centers.len() {
                let mut points = simplified.into_points();
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                if points.len() >= 3 {
                    polygons.push(Polygon::new(points));
                }
            } else if simplified.points().len() >= 2 {
                polylines.push(simplified);
            }
        }
    }

    (polylines, polygons)
}

fn ring_edges(ring: &Polygon) -> Vec<(Point, Point)> {
    let pts = ring.points();
    if pts.len() < 2 {
        return Vec::new();
    }
    pts.iter().copied().circular_tuple_windows().collect()
}

fn sample_ring(ring: &Polygon, max_width: i64) -> Vec<Sample> {
    let step = (max_width as f64 / 3.0).max(1.0);
    let mut samples = Vec::new();
    for (a, b) in ring_edges(ring) {
        let dx = (b.x - a.x) as f64;
        let dy = (b.y - a.y) as f64;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1.0 {
            continue;
        }
        let dir = (dx / len, dy / len);
        // Material is always to the left of travel direction for both the
        // CCW contour and the CW holes, by ExPolygon's winding convention.
        let normal = (-dir.1, dir.0);
        let steps = (len / step).floor().max(1.0) as usize;
        for i in 0..steps {
            let t = (i as f64 + 0.5) / steps as f64;
            let point = Point::new(
                (a.x as f64 + dx * t).round() as i64,
                (a.y as f64 + dy * t).round() as i64,
            );
            samples.push(Sample { point, normal });
        }
    }
    samples
}

/// Cast a ray from `origin` along `direction` and return the nearest
/// crossing with any edge strictly ahead of the origin.
fn cast_ray(origin: Point, direction: (f64, f64), edges: &[(Point, Point)]) -> Option<Point> {
    const MIN_T: f64 = 1.0;
    let mut best: Option<(f64, Point)> = None;
    for &(a, b) in edges {
        let ax = a.x as f64;
        let ay = a.y as f64;
        let bx = b.x as f64;
        let by = b.y as f64;
        let ex = bx - ax;
        let ey = by - ay;
        let denom = direction.0 * ey - direction.1 * ex;
        if denom.abs() < 1e-9 {
            continue;
        }
        let ox = origin.x as f64;
        let oy = origin.y as f64;
        let t = ((ax - ox) * ey - (ay - oy) * ex) / denom;
        let u = ((ax - ox) * direction.1 - (ay - oy) * direction.0) / denom;
        if t > MIN_T && (0.0..=1.0).contains(&u) {
            if best.map(|(bt, _)| t < bt).unwrap_or(true) {
                let hit = Point::new((ox + direction.0 * t).round() as i64, (oy + direction.1 * t).round() as i64);
                best = Some((t, hit));
            }
        }
    }
    best.map(|(_, p)| p)
}

fn split_runs(centers: &[Option<Point>]) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for c in centers {
        match c {
            Some(p) => current.push(*p),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
