//! Polygon Boolean algebra (`union_ex`, `diff_ex`,
//! `intersection_ex`), built on `geo-clipper`'s exact integer-coordinate
//! Clipper engine — the donor slicer's own `PolygonOperations` trait
//! (`union_with`/`difference_with`/`intersection_with`) wraps the same crate.

use geo::MultiPolygon;
use geo_clipper::Clipper;

use super::convert::{multipolygon_to_expolygons, polygons_to_multipolygon, CLIPPER_SCALE};
use super::expolygon::ExPolygon;
use super::offset::safety_offset;
use super::polygon::Polygon;

fn empty_multipolygon() -> MultiPolygon<f64> {
    MultiPolygon(Vec::new())
}

/// Union a flat bag of rings (mixed winding is fine — see
/// [`super::convert::polygons_to_multipolygon`]) into well-formed ExPolygons.
pub fn union_ex(polygons: &[Polygon]) -> Vec<ExPolygon> {
    if polygons.is_empty() {
        return Vec::new();
    }
    let mp = polygons_to_multipolygon(polygons);
    let result = mp.union(&empty_multipolygon(), CLIPPER_SCALE);
    multipolygon_to_expolygons(&result)
}

/// `A - B`, optionally safety-offsetting `A` first to absorb near-coincident
/// edges before the subtraction.
pub fn diff_ex(a: &[Polygon], b: &[Polygon], safety: bool) -> Vec<ExPolygon> {
    if a.is_empty() {
        return Vec::new();
    }
    let a = if safety { safety_offset(a) } else { a.to_vec() };
    let mp_a = polygons_to_multipolygon(&a);
    if b.is_empty() {
        return multipolygon_to_expolygons(&mp_a);
    }
    let mp_b = polygons_to_multipolygon(b);
    let result = mp_a.difference(&mp_b, CLIPPER_SCALE);
    multipolygon_to_expolygons(&result)
}

pub fn intersection_ex(a: &[Polygon], b: &[Polygon]) -> Vec<ExPolygon> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mp_a = polygons_to_multipolygon(a);
    let mp_b = polygons_to_multipolygon(b);
    let result = mp_a.intersection(&mp_b, CLIPPER_SCALE);
    multipolygon_to_expolygons(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;

    fn square(x: i64, y: i64, side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn union_of_overlapping_squares_is_single_piece() {
        let a = square(0, 0, 1000);
        let b = square(500, 0, 1000);
        let result = union_ex(&[a, b]);
        assert_eq!(result.len(), 1);
        assert!(result[0].area() > 1_000_000.0 && result[0].area() < 2_000_000.0);
    }

    #[test]
    fn intersection_of_self_is_self() {
        let a = square(0, 0, 1000);
        let result = intersection_ex(&[a.clone()], &[a]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area(), 1_000_000.0);
    }

    #[test]
    fn difference_removes_subtracted_region() {
        let a = square(0, 0, 1000);
        let b = square(500, 0, 1000);
        let result = diff_ex(&[a], &[b], false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area(), 500_000.0);
    }

    #[test]
    fn round_trip_union_then_difference_contains_original() {
        let a = square(0, 0, 1000);
        let b = square(2000, 0, 1000);
        let union = union_ex(&[a.clone(), b.clone()]);
        let union_polys: Vec<Polygon> = union.iter().flat_map(ExPolygon::polygons).collect();
        let back = diff_ex(&union_polys, &[b], false);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].area(), 1_000_000.0);
    }
}
