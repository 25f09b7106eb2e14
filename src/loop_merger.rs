//! Converts the unordered loop soup coming out of planar slicing into a set
//! of well-formed expolygons. No equivalent stage survives
//! in the donor's retrieved source — its own `ShrinkPass` assumes already-
//! merged slices — so the control flow here follows the donor's offset/union
//! idiom (`safety_offset` before a Boolean, explicit shrink-back after)
//! rather than a borrowed file.

use crate::error::SlicerError;
use crate::geom::{diff_ex, safety_offset, union_ex, ExPolygon, Polygon};
use crate::scale::SAFETY_OFFSET_EPSILON;

/// Merges `loops` (in slicer-supplied order) into expolygons. Loops with
/// fewer than 3 distinct points are dropped.
pub fn merge_loops(loops: &[Polygon]) -> Result<Vec<ExPolygon>, SlicerError> {
    let loops: Vec<Polygon> = loops.iter().filter(|l| !l.is_degenerate()).cloned().collect();
    if loops.is_empty() {
        return Ok(Vec::new());
    }

    let ordered = topological_sort_by_containment(loops);
    let grown: Vec<Polygon> = safety_offset(&ordered);

    let mut result: Vec<ExPolygon> = Vec::new();
    for loop_ in &grown {
        let polygons: Vec<Polygon> = result.iter().flat_map(ExPolygon::polygons).collect();
        if loop_.is_counter_clockwise() {
            let mut bag = polygons;
            bag.push(loop_.clone());
            result = union_ex(&bag);
        } else {
            result = diff_ex(&polygons, std::slice::from_ref(loop_), false);
        }
    }

    let shrunk: Vec<ExPolygon> = result
        .into_iter()
        .flat_map(|ex| ex.offset_ex(-SAFETY_OFFSET_EPSILON))
        .collect();

    for ex in &shrunk {
        if !ex.is_well_formed() {
            return Err(SlicerError::BooleanOpFailed {
                op: "merge_loops",
                detail: "union/difference pass produced a non-well-formed expolygon".into(),
            });
        }
    }

    Ok(shrunk)
}

/// Stable topological sort: any loop that encloses another must precede it.
/// Ties (non-nested siblings) keep their input relative order, since the
/// donor's own comparator is non-total here and any order among non-nested
/// siblings is an equally valid result.
fn topological_sort_by_containment(loops: Vec<Polygon>) -> Vec<Polygon> {
    let n = loops.len();
    let mut depth = vec![0usize; n];
    for i in 0..n {
        for j in 0..n {
            if i != j && encloses(&loops[i], &loops[j]) {
                depth[j] += 1;
            }
        }
    }
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by_key(|&i| depth[i]);
    indices.into_iter().map(|i| loops[i].clone()).collect()
}

/// `a` encloses `b` if every point of `b` lies inside (or on) `a`.
fn encloses(a: &Polygon, b: &Polygon) -> bool {
    if a.points().len() < 3 || std::ptr::eq(a, b) {
        return false;
    }
    b.points().iter().all(|&p| a.encloses_point(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn square(x: i64, y: i64, side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn single_square_produces_one_surface() {
        let merged = merge_loops(&[square(0, 0, 20_000_000)]).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged[0].holes().is_empty());
    }

    #[test]
    fn outer_plus_hole_produces_hole() {
        let outer = square(0, 0, 20_000_000);
        let hole = square(5_000_000, 5_000_000, 5_000_000).reversed(); // CW
        let merged = merge_loops(&[outer, hole]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].holes().len(), 1);
    }

    #[test]
    fn degenerate_loop_is_dropped() {
        let degenerate = Polygon::new(vec![Point::new(0, 0), Point::new(1, 1)]);
        let merged = merge_loops(&[degenerate]).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn empty_input_returns_empty_output() {
        assert!(merge_loops(&[]).unwrap().is_empty());
    }
}
