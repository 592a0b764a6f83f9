use serde::{Deserialize, Serialize};

use crate::{bbox::BoundingBox, bus_info::BusInfo};

pub const BUSES_MSG_TYPE: &str = "Buses";
pub const ERROR_MSG_TYPE: &str = "Error";

/// Viewport update sent by a web client. `msgType` is carried but not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBoxMessage {
    #[serde(rename = "msgType")]
    pub msg_type: String,
    pub data: BoundingBox,
}

/// Periodic snapshot of the buses inside a client's viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusesListMessage {
    #[serde(rename = "msgType")]
    pub msg_type: String,
    pub buses: Vec<BusInfo>,
}

impl BusesListMessage {
    pub fn new(buses: Vec<BusInfo>) -> BusesListMessage {
        BusesListMessage {
            msg_type: BUSES_MSG_TYPE.to_owned(),
            buses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "msgType")]
    pub msg_type: String,
    #[serde(rename = "Errors")]
    pub errors: Vec<String>,
}

impl ErrorMessage {
    pub fn new(errors: Vec<String>) -> ErrorMessage {
        ErrorMessage {
            msg_type: ERROR_MSG_TYPE.to_owned(),
            errors,
        }
    }
}
