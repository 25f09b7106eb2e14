//! Polygon offsetting (`offset`, `safety_offset`,
//! `noncollapsing_offset_ex`), built on `geo-clipper`'s Clipper offset engine
//! the same way the donor slicer leans on its `PolygonOperations::offset_from`
//! wrapper around the same crate.

use geo_clipper::{Clipper, EndType, JoinType};

use crate::scale::SAFETY_OFFSET_EPSILON;

use super::convert::{multipolygon_to_polygons, polygons_to_multipolygon, CLIPPER_SCALE};
use super::expolygon::ExPolygon;
use super::polygon::Polygon;

const JOIN: JoinType = JoinType::Miter(2.0);

/// Minkowski-sum a bag of rings with a disc of radius `|delta|`. Positive
/// grows a CCW ring outward and shrinks the area enclosed by a CW ring;
/// negative does the opposite. May return fewer/zero rings if the region
/// collapses.
pub fn offset(polygons: &[Polygon], delta: i64) -> Vec<Polygon> {
    if polygons.is_empty() || delta == 0 {
        return polygons.to_vec();
    }
    let mp = polygons_to_multipolygon(polygons);
    let result = mp.offset(delta as f64, JOIN, EndType::ClosedPolygon, CLIPPER_SCALE);
    multipolygon_to_polygons(&result)
}

/// Grow by a small epsilon to absorb near-coincident edges before a Boolean
/// op. The caller is responsible for shrinking back by the same epsilon
/// where the net inset must be zero.
pub fn safety_offset(polygons: &[Polygon]) -> Vec<Polygon> {
    offset(polygons, SAFETY_OFFSET_EPSILON)
}

/// Like [`offset`], but when the offset would collapse a component to
/// nothing, keeps a thin sliver standing in for it instead of dropping it
/// or falling back to the full pre-offset contour, so a trial-width
/// gap-fill loop regrowing this sliver back out approximates the
/// component's true (narrow) width instead of ballooning to its original
/// extent.
pub fn noncollapsing_offset_ex(expolygons: &[ExPolygon], delta: i64) -> Vec<ExPolygon> {
    use super::boolean::union_ex;

    let mut out = Vec::new();
    for ex in expolygons {
        let offsetted = offset(&ex.polygons(), delta);
        if offsetted.is_empty() {
            // Collapsed at the requested delta: retry with just enough of an
            // offset, in the same direction, to keep a thin sliver along the
            // same footprint rather than losing it or keeping the whole
            // pre-offset contour.
            let epsilon = delta.signum() * SAFETY_OFFSET_EPSILON.min(delta.abs());
            if epsilon == 0 {
                continue;
            }
            let sliver = offset(&ex.polygons(), epsilon);
            if sliver.is_empty() {
                continue;
            }
            out.extend(union_ex(&sliver));
        } else {
            out.extend(union_ex(&offsetted));
        }
    }
    out
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
    fn positive_offset_grows_ccw_contour() {
        let grown = offset(&[square(1000)], 100);
        assert_eq!(grown.len(), 1);
        assert!(grown[0].area() > 1_000_000.0);
    }

    #[test]
    fn negative_offset_past_half_width_collapses() {
        let collapsed = offset(&[square(100)], -1000);
        assert!(collapsed.is_empty());
    }

    #[test]
    fn safety_offset_grows_by_epsilon() {
        let grown = safety_offset(&[square(1000)]);
        assert_eq!(grown.len(), 1);
        assert!(grown[0].area() > 1_000_000.0);
    }

    #[test]
    fn noncollapsing_offset_keeps_a_thin_sliver_not_the_original() {
        let ex = ExPolygon::new(square(100), vec![]);
        let original_area = ex.area();
        let result = noncollapsing_offset_ex(&[ex], -1000);
        assert!(!result.is_empty());
        let sliver_area: f64 = result.iter().map(ExPolygon::area).sum();
        assert!(sliver_area < original_area);
    }

    #[test]
    fn noncollapsing_offset_passes_through_when_it_does_not_collapse() {
        let ex = ExPolygon::new(square(1000), vec![]);
        let result = noncollapsing_offset_ex(&[ex], 100);
        assert_eq!(result.len(), 1);
        assert!(result[0].area() > 1_000_000.0);
    }
}
