//! The config bundle this core consumes. Plain data, no I/O —
//! modeled after the donor's `Settings` (`settings.rs`), but trimmed to just
//! the keys this region-level core actually reads; everything else in the
//! donor's `Settings` (filament, fan, skirt, support...) belongs to the
//! external multi-layer scheduler, not this crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of perimeter loops to generate per island, before any
    /// per-surface `additional_inner_perimeters` bump.
    pub perimeters: usize,

    /// Internal surfaces whose contour area is at or below this (in mm²)
    /// are promoted to INTERNAL_SOLID by the FillClassifier.
    pub solid_infill_below_area: f32,

    /// Number of solid layers to print at the top of the model. Zero
    /// disables top-solid classification entirely.
    pub top_solid_layers: usize,

    /// Number of solid layers to print at the bottom of the model. Zero
    /// disables bottom-solid classification entirely.
    pub bottom_solid_layers: usize,

    /// Gap-fill feedrate in mm/s. Zero disables gap filling.
    pub gap_fill_speed: f32,

    /// Infill density, 0.0..=1.0. Zero disables bridge processing entirely.
    pub fill_density: f32,

    /// Brim width in mm. Non-zero on layer 0 reverses perimeter print order.
    pub brim_width: f32,
}

impl Config {
    pub fn gap_fill_enabled(&self) -> bool {
        self.gap_fill_speed > 0.0
    }

    pub fn bridges_enabled(&self) -> bool {
        self.fill_density > 0.0
    }

    pub fn brim_enabled(&self) -> bool {
        self.brim_width > 0.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            perimeters: 3,
            solid_infill_below_area: 70.0,
            top_solid_layers: 3,
            bottom_solid_layers: 3,
            gap_fill_speed: 20.0,
            fill_density: 0.2,
            brim_width: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fill_density_disables_bridges() {
        let mut cfg = Config::default();
        cfg.fill_density = 0.0;
        assert!(!cfg.bridges_enabled());
    }

    #[test]
    fn default_config_has_bridges_and_gap_fill_enabled() {
        let cfg = Config::default();
        assert!(cfg.bridges_enabled());
        assert!(cfg.gap_fill_enabled());
    }
}
