use serde::{Deserialize, Serialize};

use super::boolean::union_ex;
use super::offset::offset;
use super::polygon::Polygon;

/// One outer CCW contour plus zero or more CW holes, strictly inside the
/// contour and pairwise non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExPolygon {
    contour: Polygon,
    holes: Vec<Polygon>,
}

impl ExPolygon {
    pub fn new(contour: Polygon, holes: Vec<Polygon>) -> Self {
        let contour = if contour.is_counter_clockwise() {
            contour
        } else {
            contour.reversed()
        };
        let holes = holes
            .into_iter()
            .map(|h| {
                if h.is_counter_clockwise() {
                    h.reversed()
                } else {
                    h
                }
            })
            .collect();
        Self { contour, holes }
    }

    pub fn contour(&self) -> &Polygon {
        &self.contour
    }

    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    pub fn into_parts(self) -> (Polygon, Vec<Polygon>) {
        (self.contour, self.holes)
    }

    /// All rings — contour first, then holes — as a flat bag, the shape every
    /// Boolean/offset primitive in [`crate::geom`] actually consumes.
    pub fn polygons(&self) -> Vec<Polygon> {
        let mut out = Vec::with_capacity(1 + self.holes.len());
        out.push(self.contour.clone());
        out.extend(self.holes.iter().cloned());
        out
    }

    /// Net filled area: contour area minus hole areas (both already signed
    /// correctly since contour is CCW and holes are CW).
    pub fn area(&self) -> f64 {
        self.contour.area() + self.holes.iter().map(Polygon::area).sum::<f64>()
    }

    pub fn is_well_formed(&self) -> bool {
        if !self.contour.is_counter_clockwise() || self.contour.is_degenerate() {
            return false;
        }
        self.holes.iter().all(|h| {
            !h.is_degenerate()
                && !h.is_counter_clockwise()
                && h.points().iter().all(|&p| self.contour.encloses_point(p))
        })
    }

    /// Offset the ExPolygon as a whole (contour and holes together), then
    /// re-union the result
    pub fn offset_ex(&self, delta: i64) -> Vec<ExPolygon> {
        union_ex(&offset(&self.polygons(), delta))
    }

    pub fn simplify(&self, tolerance: f64) -> ExPolygon {
        let contour = simplify_ring(&self.contour, tolerance);
        let holes = self
            .holes
            .iter()
            .map(|h| simplify_ring(h, tolerance))
            .filter(|h| !h.is_degenerate())
            .collect();
        ExPolygon::new(contour, holes)
    }
}

fn simplify_ring(ring: &Polygon, tolerance: f64) -> Polygon {
    use super::polyline::Polyline;
    let mut closed_points = ring.points().to_vec();
    if let Some(first) = closed_points.first().copied() {
        closed_points.push(first);
    }
    let simplified = Polyline::new(closed_points).simplify(tolerance).into_points();
    Polygon::new(simplified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;

    fn square(side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn new_normalizes_winding() {
        let ex = ExPolygon::new(square(1000).reversed(), vec![]);
        assert!(ex.contour().is_counter_clockwise());
    }

    #[test]
    fn well_formed_square_with_hole() {
        let outer = square(1000);
        let hole = Polygon::new(vec![
            Point::new(200, 200),
            Point::new(200, 800),
            Point::new(800, 800),
            Point::new(800, 200),
        ]); // CW
        let ex = ExPolygon::new(outer, vec![hole]);
        assert!(ex.is_well_formed());
        assert_eq!(ex.area(), 1_000_000.0 - 360_000.0);
    }
}
