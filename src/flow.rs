//! `Flow` — the nozzle-extrusion-geometry external collaborator. Modeled
//! after the donor's `MovementParameter` (`settings.rs`): plain,
//! `serde`-derived data with no behavior beyond the scaled-unit conversions
//! every consumer needs.

use serde::{Deserialize, Serialize};

use crate::scale::scale;

/// Deposited bead width and center-to-center spacing for one kind of
/// extrusion, both in millimeters, plus their scaled-integer counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub width: f32,
    pub spacing: f32,
}

impl Flow {
    pub fn new(width: f32, spacing: f32) -> Self {
        Self { width, spacing }
    }

    /// Spacing derived from width using the usual overlap factor: adjacent
    /// beads overlap a bit so the walls bond, so spacing < width.
    pub fn from_width(width: f32, overlap: f32) -> Self {
        Self {
            width,
            spacing: width * overlap,
        }
    }

    pub fn scaled_width(&self) -> i64 {
        scale(self.width as f64)
    }

    pub fn scaled_spacing(&self) -> i64 {
        scale(self.spacing as f64)
    }

    /// Clone this flow with a different width, keeping the same
    /// width/spacing ratio`).
    pub fn clone_with_width(&self, width: f32) -> Flow {
        let ratio = if self.width != 0.0 {
            self.spacing / self.width
        } else {
            1.0
        };
        Flow {
            width,
            spacing: width * ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_width_matches_scale_fn() {
        let flow = Flow::new(0.5, 0.45);
        assert_eq!(flow.scaled_width(), scale(0.5));
        assert_eq!(flow.scaled_spacing(), scale(0.45));
    }

    #[test]
    fn clone_with_width_preserves_ratio() {
        let flow = Flow::new(0.5, 0.45);
        let cloned = flow.clone_with_width(1.0);
        assert!((cloned.spacing - 0.9).abs() < 1e-5);
    }
}
