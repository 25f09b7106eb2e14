//! The `make_perimeters` stage: nested inward offsetting
//! per island, gap detection and gap fill, hole/contour traversal ordering,
//! brim reversal. Grounded on the donor's `inset_polygon_recursive`
//! (`plotter/walls.rs`) for the recursive inward-offset idiom and on
//! `Plotter::slice_walls_into_chains` (`plotter/mod.rs`) for hole-vs-contour
//! role assignment.

use rayon::prelude::*;

use crate::config::Config;
use crate::error::SlicerError;
use crate::extrusion::{ExtrusionLoop, ExtrusionPath, ExtrusionRole, Perimeter};
use crate::fill_pattern::{FillPattern, Rectilinear};
use crate::flow::Flow;
use crate::geom::{diff_ex, noncollapsing_offset_ex, offset, union_ex, ExPolygon, Point, Polygon, Polyline};
use crate::scale::{SCALED_RESOLUTION, SMALL_PERIMETER_LENGTH};
use crate::surface::{Surface, SurfaceType};

pub struct PerimeterOutput {
    pub perimeters: Vec<Perimeter>,
    pub fill_surfaces: Vec<Surface>,
    pub thin_fills: Vec<ExtrusionPath>,
}

pub fn make_perimeters(
    slices: &[ExPolygon],
    thin_walls: &[Polyline],
    perimeter_flow: &Flow,
    config: &Config,
    layer_id: usize,
    height: f64,
) -> Result<PerimeterOutput, SlicerError> {
    let islands = shortest_path_order_expolygons(slices.to_vec());

    let mut perimeters = Vec::new();
    let mut fill_surfaces = Vec::new();
    let mut thin_fills = Vec::new();

    let s = perimeter_flow.scaled_spacing();
    let n = config.perimeters;

    // One island's nested-offset pass is independent of every other
    // island's, the same parallel-fan-out boundary the donor's top-level
    // dispatch exploits with `par_iter_mut` across objects/layers.
    let per_island: Vec<(Vec<ExtrusionLoop>, Vec<Surface>, Vec<ExPolygon>)> = islands
        .par_iter()
        .map(|island| generate_island_perimeters(island, perimeter_flow, n, s))
        .collect::<Result<Vec<_>, _>>()?;

    for (island_perimeters, island_fill, island_gaps) in per_island {
        perimeters.extend(island_perimeters.into_iter().map(Perimeter::Loop));
        fill_surfaces.extend(island_fill);

        if config.gap_fill_enabled() {
            thin_fills.extend(fill_gaps(island_gaps, perimeter_flow, height)?);
        }
    }

    perimeters.extend(route_thin_walls(thin_walls, perimeter_flow, height));

    if layer_id == 0 && config.brim_enabled() {
        perimeters.reverse();
    }

    Ok(PerimeterOutput {
        perimeters,
        fill_surfaces,
        thin_fills,
    })
}

/// One `E' := union_ex(offset(offset(E, -1.5s), +0.5s))` inward pass for a
/// single expolygon, plus the gap it uncovers (the strip `offset(E, -0.5s)`
/// left behind that `E'` regrown by `+0.5s` doesn't cover).
fn inset_pass(e: &ExPolygon, perimeter_flow: &Flow, s: i64, gaps: &mut Vec<ExPolygon>) -> Vec<ExPolygon> {
    let polys = e.polygons();
    let inset = offset(&polys, -(s + s / 2));
    let e_prime = union_ex(&offset(&inset, s / 2));

    let inset_half_polys: Vec<Polygon> =
        e.offset_ex(-(s / 2)).iter().flat_map(ExPolygon::polygons).collect();
    let e_prime_polys: Vec<Polygon> = e_prime.iter().flat_map(ExPolygon::polygons).collect();
    let regrown_half = offset(&e_prime_polys, s / 2);

    let width_sq = perimeter_flow.scaled_width() as f64 * perimeter_flow.scaled_width() as f64;
    for gap in diff_ex(&inset_half_polys, &regrown_half, false) {
        if gap.area() >= width_sq {
            gaps.push(gap);
        }
    }

    e_prime
}

/// Runs the nested-offset loop for one island, returning its ordered
/// perimeter loops, its single fill-boundary surface (if it didn't
/// collapse), and the gap components accumulated along the way.
fn generate_island_perimeters(
    island: &ExPolygon,
    perimeter_flow: &Flow,
    n: usize,
    s: i64,
) -> Result<(Vec<ExtrusionLoop>, Vec<Surface>, Vec<ExPolygon>), SlicerError> {
    let mut depths: Vec<Vec<ExPolygon>> = vec![vec![island.clone()]];
    let mut last_offsets = depths[0].clone();
    let mut gaps: Vec<ExPolygon> = Vec::new();
    let mut fill_boundary: Vec<ExPolygon> = Vec::new();

    if n == 0 {
        // No perimeter loops requested, but the fill boundary still needs
        // its own inward pass rather than the raw, un-offset island.
        for e in &last_offsets {
            fill_boundary.extend(inset_pass(e, perimeter_flow, s, &mut gaps));
        }
    } else {
        for depth in 1..=n {
            let mut new_offsets = Vec::new();
            for e in &last_offsets {
                new_offsets.extend(inset_pass(e, perimeter_flow, s, &mut gaps));
            }

            if new_offsets.is_empty() || depth == n {
                fill_boundary = new_offsets;
                break;
            }
            last_offsets = new_offsets.clone();
            depths.push(new_offsets);
        }
    }

    for depth_exs in &depths {
        for ex in depth_exs {
            if !ex.is_well_formed() {
                return Err(SlicerError::BooleanOpFailed {
                    op: "make_perimeters",
                    detail: "nested-offset pass produced a non-well-formed expolygon".into(),
                });
            }
        }
    }

    let fill_surfaces: Vec<Surface> = fill_boundary
        .iter()
        .map(|ex| ex.simplify(SCALED_RESOLUTION as f64))
        .map(|ex| Surface::new(ex, SurfaceType::Internal))
        .collect();

    let loops = traverse_island(&depths, perimeter_flow);

    Ok((loops, fill_surfaces, gaps))
}

/// Hole-then-contour traversal producing printable `ExtrusionLoop`s.
fn traverse_island(depths: &[Vec<ExPolygon>], perimeter_flow: &Flow) -> Vec<ExtrusionLoop> {
    let max_depth = depths.len().saturating_sub(1);
    let mut holes_by_depth: Vec<Vec<Polygon>> = Vec::with_capacity(depths.len());
    let mut contours_by_depth: Vec<Vec<Polygon>> = Vec::with_capacity(depths.len());
    for depth_exs in depths {
        let mut holes = Vec::new();
        let mut contours = Vec::new();
        for ex in depth_exs {
            contours.push(ex.contour().clone());
            holes.extend(ex.holes().iter().cloned());
        }
        holes_by_depth.push(holes);
        contours_by_depth.push(contours);
    }

    let mut loops = Vec::new();

    for (polygon, is_external) in order_and_tag_holes(holes_by_depth) {
        if !is_printable(&polygon, perimeter_flow) {
            continue;
        }
        let role = if is_external {
            ExtrusionRole::ExternalPerimeter
        } else {
            ExtrusionRole::Perimeter
        };
        loops.push(ExtrusionLoop::new(
            polygon.into_points(),
            role,
            *perimeter_flow,
            false,
        ));
    }

    for depth in (0..=max_depth).rev() {
        for contour in &contours_by_depth[depth] {
            if !is_printable(contour, perimeter_flow) {
                continue;
            }
            let role = if depth == 0 {
                ExtrusionRole::ExternalPerimeter
            } else if depth == max_depth {
                ExtrusionRole::ContourInternalPerimeter
            } else {
                ExtrusionRole::Perimeter
            };
            loops.push(ExtrusionLoop::new(
                contour.points().to_vec(),
                role,
                *perimeter_flow,
                true,
            ));
        }
    }

    loops
}

/// Seeds hole chains from the outermost (depth 0) hole layer, sorted by
/// shortest path, then repeatedly climbs to the enclosing hole one depth up
/// ("pop-and-climb") until no parent is found. Holes that never appear at
/// depth 0 (an island that only grows a hole at a deeper offset) seed their
/// own single-element chain instead of being dropped. Each chain is
/// reversed before emission so the innermost hole of the chain prints
/// first; only the original depth-0 seed of each chain is tagged as the
/// external loop, every other hole in the chain gets the plain perimeter
/// role.
fn order_and_tag_holes(holes_by_depth: Vec<Vec<Polygon>>) -> Vec<(Polygon, bool)> {
    if holes_by_depth.is_empty() {
        return Vec::new();
    }
    let mut pools = holes_by_depth;
    let seeds = shortest_path_order(std::mem::take(&mut pools[0]));

    let mut chains: Vec<Vec<(Polygon, bool)>> = Vec::new();
    for seed in seeds {
        let mut chain = vec![(seed.clone(), true)];
        let mut current = seed;
        let mut d = 1;
        while d < pools.len() {
            if let Some(idx) = pools[d].iter().position(|h| encloses(h, &current)) {
                let parent = pools[d].remove(idx);
                current = parent.clone();
                chain.push((parent, false));
                d += 1;
            } else {
                break;
            }
        }
        chains.push(chain);
    }

    for depth in 1..pools.len() {
        for h in pools[depth].drain(..) {
            chains.push(vec![(h, false)]);
        }
    }

    let mut out = Vec::new();
    for mut chain in chains {
        chain.reverse();
        out.extend(chain);
    }
    out
}

fn encloses(a: &Polygon, b: &Polygon) -> bool {
    a.points().len() >= 3 && b.points().iter().all(|&p| a.encloses_point(p))
}

/// A loop is printable if it has at least 3 points and clears both the
/// nozzle-width floor and the global small-perimeter noise floor.
fn is_printable(loop_: &Polygon, flow: &Flow) -> bool {
    let floor = flow.scaled_width().max(SMALL_PERIMETER_LENGTH) as f64;
    loop_.points().len() >= 3 && loop_.length() >= floor
}

/// Trial-width gap filling: widest trial first so
/// narrower trials only claim what wider ones couldn't.
fn fill_gaps(
    mut gaps: Vec<ExPolygon>,
    perimeter_flow: &Flow,
    height: f64,
) -> Result<Vec<ExtrusionPath>, SlicerError> {
    let mut out = Vec::new();
    let pattern = Rectilinear;
    let trial_widths = [
        perimeter_flow.width * 1.5,
        perimeter_flow.width,
        perimeter_flow.width * 0.5,
    ];

    for width in trial_widths {
        if gaps.is_empty() {
            break;
        }
        let f = perimeter_flow.clone_with_width(width);
        let half = f.scaled_width() / 2;

        let shrunk = noncollapsing_offset_ex(&gaps, -half);
        let shrunk_polys: Vec<Polygon> = shrunk.iter().flat_map(ExPolygon::polygons).collect();
        let this_width = union_ex(&offset(&shrunk_polys, half));

        if this_width.is_empty() {
            continue;
        }

        let this_width_polys: Vec<Polygon> = this_width.iter().flat_map(ExPolygon::polygons).collect();
        let fillable = union_ex(&offset(&this_width_polys, -half));

        for ex in &fillable {
            for line in pattern.fill(ex, 1.0, f.scaled_spacing(), 0.0) {
                let simplified = line.simplify(f.scaled_width() as f64 / 3.0);
                out.push(ExtrusionPath::new(simplified.into_points(), ExtrusionRole::GapFill, f, height));
            }
        }

        let gap_polys: Vec<Polygon> = gaps.iter().flat_map(ExPolygon::polygons).collect();
        gaps = diff_ex(&gap_polys, &this_width_polys, false);
    }

    Ok(out)
}

/// Routes thin walls by shortest-path, tags each
/// EXTERNAL_PERIMETER, and splits any closed ones at their first point.
fn route_thin_walls(thin_walls: &[Polyline], perimeter_flow: &Flow, height: f64) -> Vec<Perimeter> {
    let ordered = shortest_path_order_polylines(thin_walls.to_vec());
    ordered
        .into_iter()
        .map(|line| {
            let mut points = line.into_points();
            if points.len() > 2 && points.first() == points.last() {
                points.pop();
            }
            Perimeter::Path(ExtrusionPath::new(
                points,
                ExtrusionRole::ExternalPerimeter,
                *perimeter_flow,
                height,
            ))
        })
        .collect()
}

fn shortest_path_order_expolygons(mut items: Vec<ExPolygon>) -> Vec<ExPolygon> {
    let mut ordered = Vec::with_capacity(items.len());
    let mut current = Point::new(0, 0);
    while !items.is_empty() {
        let (idx, _) = items
            .iter()
            .enumerate()
            .map(|(i, ex)| (i, first_point(ex).squared_distance(current)))
            .min_by_key(|&(_, d)| d)
            .unwrap();
        let next = items.remove(idx);
        current = first_point(&next);
        ordered.push(next);
    }
    ordered
}

fn shortest_path_order(mut items: Vec<Polygon>) -> Vec<Polygon> {
    let mut ordered = Vec::with_capacity(items.len());
    let mut current = Point::new(0, 0);
    while !items.is_empty() {
        let (idx, _) = items
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.points().first().copied().unwrap_or(current).squared_distance(current)))
            .min_by_key(|&(_, d)| d)
            .unwrap();
        let next = items.remove(idx);
        current = next.points().first().copied().unwrap_or(current);
        ordered.push(next);
    }
    ordered
}

fn shortest_path_order_polylines(mut items: Vec<Polyline>) -> Vec<Polyline> {
    let mut ordered = Vec::with_capacity(items.len());
    let mut current = Point::new(0, 0);
    while !items.is_empty() {
        let (idx, _) = items
            .iter()
            .enumerate()
            .map(|(i, l)| (i, l.first().unwrap_or(current).squared_distance(current)))
            .min_by_key(|&(_, d)| d)
            .unwrap();
        let next = items.remove(idx);
        current = next.last().unwrap_or(current);
        ordered.push(next);
    }
    ordered
}

fn first_point(ex: &ExPolygon) -> Point {
    ex.contour().points().first().copied().unwrap_or(Point::new(0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

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
    fn single_square_produces_nested_external_perimeters() {
        let flow = Flow::new(0.5, 0.45);
        let config = Config::default();
        let out = make_perimeters(&[square(20_000_000)], &[], &flow, &config, 1, 0.2).unwrap();
        assert!(!out.perimeters.is_empty());
        assert_eq!(out.fill_surfaces.len(), 1);
        let external_count = out
            .perimeters
            .iter()
            .filter(|p| matches!(p, Perimeter::Loop(l) if l.role == ExtrusionRole::ExternalPerimeter))
            .count();
        assert_eq!(external_count, 1);
    }

    #[test]
    fn brim_reverses_perimeter_order_on_layer_zero() {
        let flow = Flow::new(0.5, 0.45);
        let mut config = Config::default();
        config.brim_width = 4.0;
        let without_brim = make_perimeters(&[square(20_000_000)], &[], &flow, &config, 1, 0.2).unwrap();
        let with_brim = make_perimeters(&[square(20_000_000)], &[], &flow, &config, 0, 0.2).unwrap();
        assert_eq!(without_brim.perimeters.len(), with_brim.perimeters.len());
        assert_ne!(
            format!("{:?}", without_brim.perimeters.first()),
            format!("{:?}", with_brim.perimeters.first())
        );
    }

    #[test]
    fn empty_island_list_produces_nothing() {
        let flow = Flow::new(0.5, 0.45);
        let config = Config::default();
        let out = make_perimeters(&[], &[], &flow, &config, 1, 0.2).unwrap();
        assert!(out.perimeters.is_empty());
        assert!(out.fill_surfaces.is_empty());
    }
}
