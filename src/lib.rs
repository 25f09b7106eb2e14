//! Per-layer, per-region geometry core of a fused-filament slicer: turns the
//! unordered boundary segments one material region produces on one
//! horizontal layer into classified fill surfaces, nested perimeter loops,
//! thin-wall and gap-fill paths, and bridge orientation.
//!
//! The pipeline runs in one direction and is a pure function of its inputs:
//! `merge_loops` → `make_surfaces` → `make_perimeters` → `prepare_fill_surfaces`
//! → `process_bridges`. [`process_region`] wires all five stages together;
//! callers needing finer control can invoke each stage module directly.

pub mod bridge_detector;
pub mod config;
pub mod error;
pub mod extrusion;
pub mod fill_classifier;
pub mod fill_pattern;
pub mod flow;
pub mod geom;
pub mod layer;
pub mod layer_region;
pub mod loop_merger;
pub mod perimeter_generator;
pub mod region;
pub mod surface;
pub mod surface_builder;
pub mod scale;

#[cfg(feature = "svg-debug")]
pub mod svg_debug;

pub use config::Config;
pub use error::SlicerError;
pub use extrusion::{ExtrusionLoop, ExtrusionPath, ExtrusionRole, Perimeter};
pub use flow::Flow;
pub use layer::Layer;
pub use layer_region::LayerRegion;
pub use region::Region;
pub use surface::{Surface, SurfaceType};

use std::sync::Arc;

use geom::Polygon;

/// Runs the full pipeline for one region's raw boundary loops on one layer
/// and returns the populated [`LayerRegion`]. `layer.id` gates brim reversal
/// (`id == 0`) and bridge eligibility (`id > 0`); `layer.height` and
/// `layer.flow`/`region.config` supply everything the stages below need.
pub fn process_region(
    loops: &[Polygon],
    layer: &Arc<Layer>,
    region: &Arc<Region>,
) -> Result<LayerRegion, SlicerError> {
    let perimeter_flow = &layer.flow;
    let config = &region.config;
    let layer_id = layer.id;

    log::info!("processing region: layer {layer_id}, {} input loops", loops.len());

    let built = surface_builder::make_surfaces(loops, perimeter_flow)?;
    let mut thin_walls = built.thin_walls.clone();
    thin_walls.extend(
        built
            .thin_wall_polygons
            .iter()
            .map(geom::Polyline::from_closed_polygon),
    );
    log::debug!(
        "surface builder: {} slices, {} thin walls",
        built.slices.len(),
        thin_walls.len()
    );

    let perimeter_output = perimeter_generator::make_perimeters(
        &built.slices,
        &thin_walls,
        perimeter_flow,
        config,
        layer_id,
        layer.height,
    )?;
    log::debug!(
        "perimeter generator: {} perimeters, {} fill surfaces, {} thin fills",
        perimeter_output.perimeters.len(),
        perimeter_output.fill_surfaces.len(),
        perimeter_output.thin_fills.len()
    );

    let classified = fill_classifier::prepare_fill_surfaces(perimeter_output.fill_surfaces, config);

    let slice_surfaces: Vec<Surface> = built
        .slices
        .iter()
        .cloned()
        .map(|ex| Surface::new(ex, SurfaceType::Internal))
        .collect();
    let final_fill_surfaces =
        bridge_detector::process_bridges(classified, &slice_surfaces, perimeter_flow, config, layer_id);
    log::debug!("bridge detector: {} final fill surfaces", final_fill_surfaces.len());

    Ok(LayerRegion {
        lines: loops.iter().map(geom::Polyline::from_closed_polygon).collect(),
        slices: built.slices,
        thin_walls,
        thin_fills: perimeter_output.thin_fills,
        fill_surfaces: final_fill_surfaces,
        perimeters: perimeter_output.perimeters,
        layer: Arc::downgrade(layer),
        region: Arc::downgrade(region),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Point;

    fn square(side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    fn layer_region_handles(id: usize) -> (Arc<Layer>, Arc<Region>) {
        let layer = Arc::new(Layer::new(id, 0.2, Flow::new(0.5, 0.45)));
        let region = Arc::new(Region::new(Config::default()));
        (layer, region)
    }

    #[test]
    fn single_square_end_to_end() {
        let (layer, region) = layer_region_handles(1);
        let out = process_region(&[square(20_000_000)], &layer, &region).unwrap();
        assert_eq!(out.slices.len(), 1);
        assert!(!out.perimeters.is_empty());
        assert!(!out.fill_surfaces.is_empty());
        assert!(Arc::ptr_eq(&out.layer.upgrade().unwrap(), &layer));
    }

    #[test]
    fn square_with_hole_end_to_end() {
        let (layer, region) = layer_region_handles(1);
        let outer = square(20_000_000);
        let hole = Polygon::new(vec![
            Point::new(5_000_000, 5_000_000),
            Point::new(5_000_000, 10_000_000),
            Point::new(10_000_000, 10_000_000),
            Point::new(10_000_000, 5_000_000),
        ]); // CW
        let out = process_region(&[outer, hole], &layer, &region).unwrap();
        assert_eq!(out.slices.len(), 1);
        assert_eq!(out.slices[0].holes().len(), 1);
        let external_loops = out
            .perimeters
            .iter()
            .filter(|p| matches!(p, Perimeter::Loop(l) if l.role == ExtrusionRole::ExternalPerimeter))
            .count();
        assert_eq!(external_loops, 2); // one outer contour, one outermost hole
    }

    #[test]
    fn first_layer_with_brim_reverses_order() {
        let mut config = Config::default();
        config.brim_width = 5.0;
        let region_config = Arc::new(Region::new(config));
        let layer_1 = Arc::new(Layer::new(1, 0.2, Flow::new(0.5, 0.45)));
        let layer_0 = Arc::new(Layer::new(0, 0.2, Flow::new(0.5, 0.45)));
        let without_brim = process_region(&[square(20_000_000)], &layer_1, &region_config).unwrap();
        let with_brim = process_region(&[square(20_000_000)], &layer_0, &region_config).unwrap();
        assert_eq!(without_brim.perimeters.len(), with_brim.perimeters.len());
    }

    #[test]
    fn empty_input_produces_empty_region() {
        let (layer, region) = layer_region_handles(1);
        let out = process_region(&[], &layer, &region).unwrap();
        assert!(out.slices.is_empty());
        assert!(out.perimeters.is_empty());
        assert!(out.fill_surfaces.is_empty());
    }
}
