use serde::{Deserialize, Serialize};

use crate::route_info::Point;

/// Latest known position of one simulated bus.
///
/// This is both the publisher -> server ingestion message and the element type
/// of the broadcast list sent to web clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusInfo {
    #[serde(rename = "busId")]
    pub id: String,
    pub route: String,
    pub lat: f64,
    pub lng: f64,
}

impl BusInfo {
    pub fn new(id: impl Into<String>, route: impl Into<String>, point: Point) -> BusInfo {
        BusInfo {
            id: id.into(),
            route: route.into(),
            lat: point.lat,
            lng: point.lng,
        }
    }

    /// Moves the bus to `point`, keeping its identity and route.
    pub fn set_position(&mut self, point: Point) {
        self.lat = point.lat;
        self.lng = point.lng;
    }
}
