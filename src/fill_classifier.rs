//! `prepare_fill_surfaces`: top/bottom demotion and
//! internal-solid promotion. Grounded on the donor's
//! `TopAndBottomLayersPass` (`slice_pass.rs`), which performs the same
//! area-threshold promotion over a `Slice`'s fill surfaces.

use crate::config::Config;
use crate::scale::scale_area;
use crate::surface::{Surface, SurfaceType};

/// Pure and idempotent: each rule only fires on a `SurfaceType` its own
/// output never re-produces from the same input (demotion is one-way, and
/// the promotion guard is monotone in area, which this stage never
/// changes) — running it twice on its own output is a no-op.
pub fn prepare_fill_surfaces(mut surfaces: Vec<Surface>, config: &Config) -> Vec<Surface> {
    if config.top_solid_layers == 0 {
        for s in &mut surfaces {
            if s.surface_type == SurfaceType::Top {
                s.surface_type = SurfaceType::Internal;
            }
        }
    }
    if config.bottom_solid_layers == 0 {
        for s in &mut surfaces {
            if s.surface_type == SurfaceType::Bottom {
                s.surface_type = SurfaceType::Internal;
            }
        }
    }

    let threshold = scale_area(config.solid_infill_below_area as f64);
    for s in &mut surfaces {
        if s.surface_type == SurfaceType::Internal && s.expolygon.contour().area() <= threshold {
            s.surface_type = SurfaceType::InternalSolid;
        }
    }

    surfaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{ExPolygon, Point, Polygon};

    fn surface(side: i64, surface_type: SurfaceType) -> Surface {
        let ex = ExPolygon::new(
            Polygon::new(vec![
                Point::new(0, 0),
                Point::new(side, 0),
                Point::new(side, side),
                Point::new(0, side),
            ]),
            vec![],
        );
        Surface::new(ex, surface_type)
    }

    #[test]
    fn zero_top_solid_layers_demotes_top_surfaces() {
        let mut config = Config::default();
        config.top_solid_layers = 0;
        let surfaces = vec![surface(20_000_000, SurfaceType::Top)];
        let out = prepare_fill_surfaces(surfaces, &config);
        assert_eq!(out[0].surface_type, SurfaceType::Internal);
    }

    #[test]
    fn small_internal_surface_is_promoted_to_solid() {
        let mut config = Config::default();
        config.solid_infill_below_area = 1000.0; // mm^2, much bigger than the test square
        let surfaces = vec![surface(1_000_000, SurfaceType::Internal)]; // 1mm^2
        let out = prepare_fill_surfaces(surfaces, &config);
        assert_eq!(out[0].surface_type, SurfaceType::InternalSolid);
    }

    #[test]
    fn running_twice_is_idempotent() {
        let config = Config::default();
        let surfaces = vec![
            surface(20_000_000, SurfaceType::Top),
            surface(1_000_000, SurfaceType::Internal),
        ];
        let once = prepare_fill_surfaces(surfaces, &config);
        let twice = prepare_fill_surfaces(once.clone(), &config);
        let once_types: Vec<_> = once.iter().map(|s| s.surface_type).collect();
        let twice_types: Vec<_> = twice.iter().map(|s| s.surface_type).collect();
        assert_eq!(once_types, twice_types);
    }
}
