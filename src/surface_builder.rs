//! The `make_surfaces` stage: produce inset "slice"
//! expolygons and separately capture thin-wall skeletons. Grounded on the
//! donor's `ShrinkPass` (`slice_pass.rs`) as the nearest analogue of
//! "inset, then recover what the inset erased".

use crate::error::SlicerError;
use crate::flow::Flow;
use crate::geom::{diff_ex, medial_axis, offset, union_ex, ExPolygon, Polygon, Polyline};
use crate::loop_merger::merge_loops;

pub struct SurfaceBuilderOutput {
    pub slices: Vec<ExPolygon>,
    pub thin_walls: Vec<Polyline>,
    pub thin_wall_polygons: Vec<Polygon>,
}

/// `d = perimeter_flow.scaled_width / 2`.
pub fn make_surfaces(
    loops: &[Polygon],
    perimeter_flow: &Flow,
) -> Result<SurfaceBuilderOutput, SlicerError> {
    let original_surfaces = merge_loops(loops)?;
    if original_surfaces.is_empty() {
        return Ok(SurfaceBuilderOutput {
            slices: Vec::new(),
            thin_walls: Vec::new(),
            thin_wall_polygons: Vec::new(),
        });
    }

    let d = perimeter_flow.scaled_width() / 2;

    // shrunk_grown = offset(offset(expolygon, -2d), +d): erases anything
    // narrower than 2d, then grows what remains back by d.
    let mut slices = Vec::new();
    for ex in &original_surfaces {
        let shrunk = offset(&ex.polygons(), -2 * d);
        if shrunk.is_empty() {
            continue;
        }
        let regrown = offset(&shrunk, d);
        slices.extend(union_ex(&regrown));
    }

    for ex in &slices {
        if !ex.is_well_formed() {
            return Err(SlicerError::BooleanOpFailed {
                op: "make_surfaces",
                detail: "double-offset pass produced a non-well-formed slice".into(),
            });
        }
    }

    // Thin-wall extraction: grow the slices back to original scale, then
    // subtract from the original to recover exactly what the double-offset
    // erased.
    let slice_polygons: Vec<Polygon> = slices.iter().flat_map(ExPolygon::polygons).collect();
    let outgrown = offset(&slice_polygons, d);
    let original_polygons: Vec<Polygon> = original_surfaces.iter().flat_map(ExPolygon::polygons).collect();
    let diff = diff_ex(&original_polygons, &outgrown, true);

    let min_area = perimeter_flow.scaled_spacing() as f64 * perimeter_flow.scaled_spacing() as f64;
    let max_width = perimeter_flow.scaled_width();

    let mut thin_walls = Vec::new();
    let mut thin_wall_polygons = Vec::new();
    for component in diff.iter().filter(|c| c.area() > min_area) {
        let (polylines, polygons) = medial_axis(component, max_width);
        thin_walls.extend(polylines);
        thin_wall_polygons.extend(polygons);
    }

    Ok(SurfaceBuilderOutput {
        slices,
        thin_walls,
        thin_wall_polygons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn square(side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn wide_square_survives_as_a_slice() {
        let flow = Flow::new(0.5, 0.45);
        let out = make_surfaces(&[square(20_000_000)], &flow).unwrap();
        assert_eq!(out.slices.len(), 1);
        assert!(out.thin_walls.is_empty());
    }

    #[test]
    fn thin_sliver_produces_a_thin_wall_not_a_slice() {
        let flow = Flow::new(0.5, 0.45);
        // A strip narrower than 2d = perimeter_flow.scaled_width (0.5mm).
        let strip = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(10_000_000, 0),
            Point::new(10_000_000, 300_000),
            Point::new(0, 300_000),
        ]);
        let out = make_surfaces(&[strip], &flow).unwrap();
        assert!(out.slices.is_empty());
        assert!(!out.thin_walls.is_empty() || !out.thin_wall_polygons.is_empty());
    }

    #[test]
    fn empty_input_returns_empty_output() {
        let flow = Flow::new(0.5, 0.45);
        let out = make_surfaces(&[], &flow).unwrap();
        assert!(out.slices.is_empty());
        assert!(out.thin_walls.is_empty());
    }
}
