pub mod bbox;
pub mod bus_info;
pub mod route_info;
pub mod webclient_msg;

pub use bbox::BoundingBox;
pub use bus_info::BusInfo;
pub use route_info::{Point, RouteError, RouteInfo};
pub use webclient_msg::{BBoxMessage, BusesListMessage, ErrorMessage};
