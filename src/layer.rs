//! `Layer` — one horizontal slice's shared, layer-wide data. Modeled after
//! the donor's `layer: usize` / `layer_settings: LayerSettings` fields
//! embedded directly in `Slice` (`plotter/mod.rs`); here the layer is its
//! own type so every region on the same layer can share one instance by
//! reference instead of each copying its height and flow.

use serde::{Deserialize, Serialize};

use crate::flow::Flow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: usize,
    pub height: f64,
    pub flow: Flow,
}

impl Layer {
    pub fn new(id: usize, height: f64, flow: Flow) -> Self {
        Self { id, height, flow }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_its_fields() {
        let layer = Layer::new(3, 0.2, Flow::new(0.5, 0.45));
        assert_eq!(layer.id, 3);
        assert_eq!(layer.height, 0.2);
    }
}
