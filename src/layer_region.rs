//! `LayerRegion` — the per-material, per-layer aggregate and the top-level
//! unit this crate operates on. Modeled after the donor's `Slice`
//! (`plotter/mod.rs`'s `Plotter` trait impl target), which
//! bundles an island's walls, fill areas, and perimeters behind one type
//! that the pass pipeline mutates in place.

use std::sync::Weak;

use serde::{Deserialize, Serialize};

use crate::extrusion::{ExtrusionPath, Perimeter};
use crate::geom::{ExPolygon, Polyline};
use crate::layer::Layer;
use crate::region::Region;
use crate::surface::Surface;

/// One region's slice of one layer: the raw boundary loops coming in from
/// the upstream mesh-slicing stage (an external collaborator, out of scope
/// for this crate), and everything this crate derives from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerRegion {
    /// Raw, possibly-unordered boundary segments for this region on this
    /// layer, as handed off by the external mesh-slicing stage.
    pub lines: Vec<Polyline>,

    /// Well-formed ExPolygons produced by the loop merger.
    pub slices: Vec<ExPolygon>,

    /// Thin-wall centerlines extracted by the surface builder, too narrow
    /// to hold a nested perimeter.
    pub thin_walls: Vec<Polyline>,

    /// Gap-fill extrusion paths produced by the perimeter generator, printed
    /// where consecutive perimeters leave a strip too narrow for another
    /// full loop.
    pub thin_fills: Vec<ExtrusionPath>,

    /// Fill surfaces after classification, ready for a
    /// `FillPattern` to trace.
    pub fill_surfaces: Vec<Surface>,

    /// Perimeter loops and paths produced by the perimeter generator,
    /// including routed thin walls.
    pub perimeters: Vec<Perimeter>,

    /// Non-owning handle to the layer this region sits on (id, height,
    /// flow) — the scheduler guarantees the `Layer` outlives its
    /// `LayerRegion`s, so this never extends its lifetime.
    #[serde(skip)]
    pub layer: Weak<Layer>,

    /// Non-owning handle to this region's material/config.
    #[serde(skip)]
    pub region: Weak<Region>,
}

impl LayerRegion {
    pub fn new(lines: Vec<Polyline>, layer: Weak<Layer>, region: Weak<Region>) -> Self {
        Self {
            lines,
            layer,
            region,
            ..Default::default()
        }
    }

    /// Net fill area across all classified fill surfaces, in scaled-unit²;
    /// used by the scheduler to estimate print time and material use.
    pub fn fill_area(&self) -> f64 {
        self.fill_surfaces.iter().map(|s| s.expolygon.area()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_region_has_no_derived_data() {
        let region = LayerRegion::new(vec![], Weak::new(), Weak::new());
        assert!(region.is_empty());
        assert_eq!(region.fill_area(), 0.0);
        assert!(region.layer.upgrade().is_none());
    }
}
