//! Extrusion paths and loops. Modeled after the donor's
//! `Move`/`MoveChain`/`MoveType` (`move.rs`, `plotter/walls.rs`): a chain of
//! points tagged with a role, optionally closed.

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

use crate::flow::Flow;
use crate::geom::{Point, Polygon, Polyline};

/// The printable role of one extrusion path, mirroring the donor's
/// `MovePrintType` but scoped to what a single region emits (no
/// support/travel/bridging-as-move-type — bridging is a `Surface` property
/// here, applied when a path is later scheduled).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize)]
pub enum ExtrusionRole {
    ExternalPerimeter,
    Perimeter,
    ContourInternalPerimeter,
    SolidFill,
    GapFill,
}

impl ExtrusionRole {
    pub fn is_perimeter(&self) -> bool {
        matches!(
            self,
            ExtrusionRole::ExternalPerimeter
                | ExtrusionRole::Perimeter
                | ExtrusionRole::ContourInternalPerimeter
        )
    }
}

/// A single open extrusion path: an ordered sequence of points with one
/// role, one flow, and the layer height it's deposited at (needed by
/// gap-fill and routed-thin-wall paths, which don't carry a loop's implicit
/// per-layer height any other way).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionPath {
    pub points: Vec<Point>,
    pub role: ExtrusionRole,
    pub flow: Flow,
    pub height: f64,
}

impl ExtrusionPath {
    pub fn new(points: Vec<Point>, role: ExtrusionRole, flow: Flow, height: f64) -> Self {
        Self { points, role, flow, height }
    }

    pub fn length(&self) -> f64 {
        Polyline::new(self.points.clone()).length()
    }
}

/// A closed extrusion loop (a perimeter ring). Keeps the `is_contour` flag
/// the donor's `inset_polygon_recursive` relies on to tell outer walls from
/// hole walls when choosing travel/seam behavior downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionLoop {
    pub points: Vec<Point>,
    pub role: ExtrusionRole,
    pub flow: Flow,
    pub is_contour: bool,
}

impl ExtrusionLoop {
    pub fn new(points: Vec<Point>, role: ExtrusionRole, flow: Flow, is_contour: bool) -> Self {
        Self {
            points,
            role,
            flow,
            is_contour,
        }
    }

    pub fn length(&self) -> f64 {
        Polyline::from_closed_polygon(&Polygon::new(self.points.clone())).length()
    }

    /// Splits this loop into an open path starting (and ending) at its
    /// first point, the representation a downstream travel-move scheduler
    /// expects (the donor's `MoveChain` with `is_loop: true` keeps its own
    /// start point separately; here the closing point is made explicit).
    pub fn into_path(self, height: f64) -> ExtrusionPath {
        let mut points = self.points;
        if points.first() != points.last() {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }
        ExtrusionPath::new(points, self.role, self.flow, height)
    }
}

/// One emitted perimeter: either a closed loop or (for a split thin wall,
/// or a loop already split for travel) an open path. A region packs both
/// kinds into a single ordered `perimeters` output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Perimeter {
    Loop(ExtrusionLoop),
    Path(ExtrusionPath),
}
