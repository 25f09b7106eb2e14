//! `process_bridges`: bridge/reverse-bridge detection,
//! optimal bridge angle, merge-by-priority, and the final fill-surface
//! repartition. The angle math is grounded directly on the donor's
//! `get_optimal_bridge_angle` (`plotter/mod.rs`), which sums
//! `(cos θ · L, sin θ · L)` over supporting-edge vectors and takes
//! `atan2` — the same `glam`-based vector idiom used for the seam
//! direction in `plotter/walls.rs::seam`.

use glam::DVec2;

use crate::config::Config;
use crate::flow::Flow;
use crate::geom::{diff_ex, intersection_ex, offset, safety_offset, union_ex, ExPolygon, Point, Polygon, Polyline};
use crate::scale::scale;
use crate::surface::{Surface, SurfaceType};

/// Runs bridge detection over `fill_surfaces`, using `slices`' Internal and
/// InternalSolid pieces as the support set. No-op if `config.fill_density`
/// is zero. `layer_id` gates true (bottom) bridges to layers above the
/// first; top surfaces are always eligible as reverse bridges.
pub fn process_bridges(
    fill_surfaces: Vec<Surface>,
    slices: &[Surface],
    perimeter_flow: &Flow,
    config: &Config,
    layer_id: usize,
) -> Vec<Surface> {
    if !config.bridges_enabled() {
        return fill_surfaces;
    }

    let supports: Vec<&Surface> = slices
        .iter()
        .filter(|s| matches!(s.surface_type, SurfaceType::Internal | SurfaceType::InternalSolid))
        .collect();

    let mut candidates: Vec<BridgeResult> = Vec::new();
    for surface in &fill_surfaces {
        let is_true_bridge = surface.surface_type == SurfaceType::Bottom && layer_id > 0;
        let is_reverse_bridge = surface.surface_type == SurfaceType::Top;
        if !is_true_bridge && !is_reverse_bridge {
            continue;
        }
        if let Some(result) = detect_bridge(surface, &supports, perimeter_flow, is_true_bridge) {
            candidates.push(result);
        }
    }

    if candidates.is_empty() {
        return fill_surfaces;
    }

    let merged = merge_by_priority(candidates);
    apply_bridges(fill_surfaces, merged)
}

struct BridgeResult {
    surface_type: SurfaceType,
    bridge_angle: Option<f64>,
    geometry: Vec<ExPolygon>,
}

fn detect_bridge(
    candidate: &Surface,
    supports: &[&Surface],
    perimeter_flow: &Flow,
    is_true_bridge: bool,
) -> Option<BridgeResult> {
    let cs = union_ex(&safety_offset(&candidate.expolygon.polygons()));
    if cs.is_empty() {
        return None;
    }
    let cs_contours: Vec<Polygon> = cs.iter().map(|ex| ex.contour().clone()).collect();

    let reach = scale(perimeter_flow.spacing as f64 * std::f64::consts::SQRT_2);
    let contour_offset = offset(&cs_contours, reach);
    if contour_offset.is_empty() {
        return None;
    }

    let supporting: Vec<&Surface> = supports
        .iter()
        .filter(|s| !intersection_ex(&s.expolygon.polygons(), &contour_offset).is_empty())
        .copied()
        .collect();
    if supporting.is_empty() {
        return None;
    }

    let bridge_angle = if is_true_bridge {
        compute_bridge_angle(&supporting, &contour_offset)
    } else {
        None
    };

    let bridge_reach = offset(&cs_contours, scale(3.0));
    let mut support_polys: Vec<Polygon> = cs.iter().flat_map(ExPolygon::polygons).collect();
    for s in &supporting {
        support_polys.extend(s.expolygon.polygons());
    }
    let geometry = intersection_ex(&support_polys, &bridge_reach);
    if geometry.is_empty() {
        return None;
    }

    Some(BridgeResult {
        surface_type: candidate.surface_type,
        bridge_angle,
        geometry,
    })
}

/// Clips each supporting surface's contour and holes to `contour_offset`,
/// then derives the angle from however many non-empty edges survive.
fn compute_bridge_angle(supporting: &[&Surface], contour_offset: &[Polygon]) -> Option<f64> {
    let mut edges: Vec<Polyline> = Vec::new();
    for s in supporting {
        for ring in s.expolygon.polygons() {
            let line = Polyline::from_closed_polygon(&ring);
            for clip in contour_offset {
                edges.extend(line.clip_by_polygon(clip).into_iter().filter(|e| !e.is_empty()));
            }
        }
    }

    match edges.len() {
        0 => None,
        1 => {
            let edge = &edges[0];
            if edge.points().len() > 2 {
                Some(normalize_degrees(edge.direction().to_degrees()))
            } else {
                None
            }
        }
        2 => {
            let chord_a = (edges[0].first()?, edges[0].last()?);
            let chord_b = (edges[1].first()?, edges[1].last()?);
            let mid_a = chord_a.0.midpoint(chord_a.1);
            let mid_b = chord_b.0.midpoint(chord_b.1);
            Some(normalize_degrees(mid_a.direction_to(mid_b).to_degrees()))
        }
        _ => {
            let all_points: Vec<Point> = edges.iter().flat_map(|e| e.points().to_vec()).collect();
            if all_points.is_empty() {
                return None;
            }
            let n = all_points.len() as f64;
            let centroid = all_points.iter().fold(DVec2::ZERO, |acc, p| acc + DVec2::new(p.x as f64, p.y as f64)) / n;

            let sum = all_points.iter().fold(DVec2::ZERO, |acc, p| {
                let v = DVec2::new(p.x as f64, p.y as f64) - centroid;
                let len = v.length();
                if len == 0.0 {
                    acc
                } else {
                    let theta = v.y.atan2(v.x);
                    acc + DVec2::new(theta.cos() * len, theta.sin() * len)
                }
            });
            if sum.length() == 0.0 {
                None
            } else {
                Some(normalize_degrees(sum.y.atan2(sum.x).to_degrees()))
            }
        }
    }
}

fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// Groups bridges by `(surface_type, bridge_angle)` in first-seen (priority)
/// order, unions each group, and subtracts everything already accepted so
/// overlapping bridges don't double-claim area.
fn merge_by_priority(candidates: Vec<BridgeResult>) -> Vec<BridgeResult> {
    let mut group_keys: Vec<(SurfaceType, Option<i64>)> = Vec::new();
    let mut groups: Vec<Vec<Polygon>> = Vec::new();

    for c in &candidates {
        let key = (c.surface_type, c.bridge_angle.map(|a| a.round() as i64));
        let idx = match group_keys.iter().position(|k| *k == key) {
            Some(i) => i,
            None => {
                group_keys.push(key);
                groups.push(Vec::new());
                group_keys.len() - 1
            }
        };
        groups[idx].extend(c.geometry.iter().flat_map(ExPolygon::polygons));
    }

    let mut accepted: Vec<Polygon> = Vec::new();
    let mut out = Vec::new();
    for (i, key) in group_keys.into_iter().enumerate() {
        let union = union_ex(&groups[i]);
        let union_polys: Vec<Polygon> = union.iter().flat_map(ExPolygon::polygons).collect();
        let pieces = diff_ex(&union_polys, &accepted, false);
        if pieces.is_empty() {
            continue;
        }
        accepted.extend(pieces.iter().flat_map(ExPolygon::polygons));
        out.push(BridgeResult {
            surface_type: key.0,
            bridge_angle: key.1.map(|a| a as f64),
            geometry: pieces,
        });
    }
    out
}

/// For each bridge, carves its intersection out of `fill_surfaces` as a new
/// surface with the bridge's type/angle; everything left over keeps its
/// original type.
fn apply_bridges(fill_surfaces: Vec<Surface>, bridges: Vec<BridgeResult>) -> Vec<Surface> {
    let bridge_polys: Vec<Polygon> = bridges.iter().flat_map(|b| b.geometry.iter().flat_map(ExPolygon::polygons)).collect();

    let mut out = Vec::new();
    for bridge in &bridges {
        for ex in &bridge.geometry {
            let mut s = Surface::new(ex.clone(), bridge.surface_type);
            s.bridge_angle = bridge.bridge_angle;
            out.push(s);
        }
    }

    for surface in &fill_surfaces {
        let polys = surface.expolygon.polygons();
        let remainder = diff_ex(&polys, &bridge_polys, false);
        for ex in remainder {
            out.push(Surface::new(ex, surface.surface_type));
        }
    }

    out
}
