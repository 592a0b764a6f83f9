use serde::{Deserialize, Serialize};

/// Rectangular viewport sent by a web client.
///
/// Bounds are taken literally: nothing is normalised, so a box that is
/// inverted (`west_lng > east_lng` or `south_lat > north_lat`) or that crosses
/// the antimeridian contains no point at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub east_lng: f64,
    pub west_lng: f64,
    pub north_lat: f64,
    pub south_lat: f64,
}

impl BoundingBox {
    /// Degenerate box every viewer starts with. Its bounds coincide, so the
    /// strict containment test never passes.
    pub const EMPTY: BoundingBox = BoundingBox {
        east_lng: -180.0,
        west_lng: -180.0,
        north_lat: -90.0,
        south_lat: -90.0,
    };

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.west_lng < lng && lng < self.east_lng && self.south_lat < lat && lat < self.north_lat
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::EMPTY
    }
}
