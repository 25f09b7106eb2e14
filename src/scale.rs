//! Scaled-integer coordinate system shared by every module in this crate.
//!
//! All geometry downstream of the mesh-slicing boundary is expressed in scaled
//! 64-bit integers rather than millimeters, so that the Boolean kernel never has
//! to reason about floating point tolerances. [`scale`]/[`unscale`] are the only
//! places that convert between the two.

/// Scaled units per millimeter.
pub const SCALING_FACTOR: f64 = 1_000_000.0;

/// Tolerance used when simplifying polylines/polygons produced by the kernel.
pub const SCALED_RESOLUTION: i64 = (0.0125 * SCALING_FACTOR) as i64;

/// Loops shorter than this (in scaled units) are treated as noise rather than
/// printable perimeters.
pub const SMALL_PERIMETER_LENGTH: i64 = (6.5 * SCALING_FACTOR) as i64;

/// The safety-offset epsilon used to stabilize Booleans against coincident edges.
/// Equal to `scale(0.1)`.
pub const SAFETY_OFFSET_EPSILON: i64 = 100_000;

/// Convert a millimeter value to the crate's scaled integer unit.
pub fn scale(mm: f64) -> i64 {
    (mm * SCALING_FACTOR) as i64
}

/// Convert a scaled integer unit back to millimeters.
pub fn unscale(units: i64) -> f64 {
    units as f64 / SCALING_FACTOR
}

/// Convert a scaled *area* (units²) back to mm².
pub fn unscale_area(units_sq: f64) -> f64 {
    units_sq / (SCALING_FACTOR * SCALING_FACTOR)
}

/// Convert a millimeter² value to scaled units², for area thresholds that were
/// configured in mm² (see `Config::solid_infill_below_area`).
pub fn scale_area(mm_sq: f64) -> f64 {
    mm_sq * SCALING_FACTOR * SCALING_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        assert_eq!(unscale(scale(12.5)), 12.5);
        assert_eq!(scale(0.1), 100_000);
    }

    #[test]
    fn area_scale_is_squared() {
        assert_eq!(scale_area(1.0), SCALING_FACTOR * SCALING_FACTOR);
    }
}
