//! `Surface` and `SurfaceType`. Modeled after the donor's
//! enum style for role tags (`MovePrintType`/`MoveType` in `lib.rs`), but the
//! donor never tags a `MultiPolygon` with a role directly — it infers the
//! role from which pass produced it — so this struct is new.

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

use crate::geom::ExPolygon;

/// The role a filled region plays once it reaches the fill stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize)]
pub enum SurfaceType {
    Top,
    Bottom,
    Internal,
    InternalSolid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub expolygon: ExPolygon,
    pub surface_type: SurfaceType,
    /// Only meaningful for bridge/reverse-bridge surfaces.
    pub bridge_angle: Option<f64>,
    /// Extra perimeter loops the scheduler wants for this surface beyond
    /// `Config::perimeters`.
    pub additional_inner_perimeters: usize,
}

impl Surface {
    pub fn new(expolygon: ExPolygon, surface_type: SurfaceType) -> Self {
        Self {
            expolygon,
            surface_type,
            bridge_angle: None,
            additional_inner_perimeters: 0,
        }
    }

    pub fn with_bridge_angle(mut self, angle: f64) -> Self {
        self.bridge_angle = Some(angle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{ExPolygon, Point, Polygon};

    #[test]
    fn new_surface_has_no_bridge_angle() {
        let ex = ExPolygon::new(
            Polygon::new(vec![
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(10, 10),
                Point::new(0, 10),
            ]),
            vec![],
        );
        let s = Surface::new(ex, SurfaceType::Internal);
        assert_eq!(s.bridge_angle, None);
        assert_eq!(s.surface_type, SurfaceType::Internal);
    }
}
