//! Optional SVG dumps of intermediate expolygon sets, gated behind the
//! `svg-debug` Cargo feature. Grounded on the donor's
//! own dependency on `geo-svg` for debug visualization; disabled by
//! default, synchronous, no cancellation semantics.

use geo_svg::ToSvg;

use crate::geom::{convert, ExPolygon};

/// Renders a set of expolygons to an SVG document string. Coordinates are
/// left in the crate's scaled-integer units; callers that want millimeters
/// should unscale before calling.
pub fn dump_expolygons(expolygons: &[ExPolygon]) -> String {
    let multipolygon = convert::expolygons_to_multipolygon(expolygons);
    multipolygon.to_svg().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point, Polygon};

    #[test]
    fn dumps_a_square_as_svg() {
        let ex = ExPolygon::new(
            Polygon::new(vec![
                Point::new(0, 0),
                Point::new(1000, 0),
                Point::new(1000, 1000),
                Point::new(0, 1000),
            ]),
            vec![],
        );
        let svg = dump_expolygons(&[ex]);
        assert!(!svg.is_empty());
    }
}
