//! `Region` — one material region's shared slicing configuration. Modeled
//! after the same donor `Slice`/`Plotter` bundling `layer_region` draws on,
//! split out so more than one `LayerRegion` on the same material can share
//! a config by reference instead of each copying it.

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub config: Config,
}

impl Region {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_its_config() {
        let region = Region::new(Config::default());
        assert_eq!(region.config.perimeters, 3);
    }
}
