//! Conversions between this crate's scaled-integer types and the `f64`
//! `geo`/`geo-clipper` types the Boolean/offset kernel is built on.
//!
//! `geo-clipper` itself re-scales its `f64` input to Clipper's internal
//! integer engine using a caller-supplied `scale` factor; since our
//! coordinates are already integers (just stored in scaled units), we always
//! pass `scale = 1.0` so Clipper's internal rounding is a no-op.

use geo::{LineString, MultiPolygon, Polygon as GeoPolygon};

use super::expolygon::ExPolygon;
use super::point::Point;
use super::polygon::Polygon;

/// The `scale` argument handed to every `geo_clipper` call. Our coordinates
/// are pre-scaled integers, so Clipper's own rescaling step is a no-op.
pub const CLIPPER_SCALE: f64 = 1.0;

pub fn polygon_to_line_string(p: &Polygon) -> LineString<f64> {
    p.to_line_string()
}

/// Flatten a bag of rings (mixed CCW/CW) into a `MultiPolygon` where each
/// ring is its own single-ring `Polygon`. Clipper determines each path's
/// offset/fill behavior from its own winding, independent of which `geo`
/// struct the ring happens to sit in, so this flattening is lossless for the
/// Boolean/offset kernel even though it's not a "well-formed" `MultiPolygon`.
pub fn polygons_to_multipolygon(polys: &[Polygon]) -> MultiPolygon<f64> {
    MultiPolygon(
        polys
            .iter()
            .filter(|p| !p.is_degenerate())
            .map(|p| GeoPolygon::new(polygon_to_line_string(p), vec![]))
            .collect(),
    )
}

/// Convert a single `ExPolygon` into a `geo::Polygon<f64>` preserving the
/// contour/hole grouping, for operations (like `offset_ex`) that need that
/// grouping to determine grow/shrink direction for holes correctly.
pub fn expolygon_to_geo_polygon(ex: &ExPolygon) -> GeoPolygon<f64> {
    GeoPolygon::new(
        polygon_to_line_string(ex.contour()),
        ex.holes().iter().map(polygon_to_line_string).collect(),
    )
}

pub fn expolygons_to_multipolygon(exs: &[ExPolygon]) -> MultiPolygon<f64> {
    MultiPolygon(exs.iter().map(expolygon_to_geo_polygon).collect())
}

/// Trust Clipper's output nesting: every `geo::Polygon<f64>` in a boolean-op
/// or offset result already has its holes correctly assigned, so each one
/// becomes exactly one `ExPolygon`.
pub fn multipolygon_to_expolygons(mp: &MultiPolygon<f64>) -> Vec<ExPolygon> {
    mp.0.iter()
        .filter_map(|poly| {
            let contour = Polygon::from_line_string(poly.exterior());
            if contour.is_degenerate() {
                return None;
            }
            let contour = if contour.is_counter_clockwise() {
                contour
            } else {
                contour.reversed()
            };
            let holes: Vec<Polygon> = poly
                .interiors()
                .iter()
                .map(Polygon::from_line_string)
                .filter(|h| !h.is_degenerate())
                .map(|h| {
                    if h.is_counter_clockwise() {
                        h.reversed()
                    } else {
                        h
                    }
                })
                .collect();
            Some(ExPolygon::new(contour, holes))
        })
        .collect()
}

pub fn multipolygon_to_polygons(mp: &MultiPolygon<f64>) -> Vec<Polygon> {
    mp.0
        .iter()
        .flat_map(|poly| {
            std::iter::once(poly.exterior())
                .chain(poly.interiors().iter())
                .map(Polygon::from_line_string)
        })
        .filter(|p| !p.is_degenerate())
        .collect()
}

pub fn expolygons_to_polygons(exs: &[ExPolygon]) -> Vec<Polygon> {
    exs.iter().flat_map(ExPolygon::polygons).collect()
}

pub fn points_to_geo(points: &[Point]) -> Vec<geo::Coord<f64>> {
    points.iter().map(|&p| p.into()).collect()
}
