//! Bus position server.
//!
//! Publishers push [`msgs::BusInfo`] updates over one WebSocket listener into a
//! shared [`storage::BusStorage`]; web clients connect to a second listener,
//! send the bounding box they are looking at and receive the buses inside it
//! on a fixed cadence.

pub mod buses;
pub mod config;
pub mod error;
pub mod handler;
pub mod routes;
pub mod server;
pub mod storage;
pub mod viewport;
pub mod webclients;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::Server;
pub use storage::BusStorage;
