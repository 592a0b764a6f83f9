//! Bus fleet emulator.
//!
//! Every bus runs as its own task and pushes its position into one shared
//! channel. A fixed pool of WebSocket senders drains that channel towards the
//! server, reconnecting whenever a connection fails.

pub mod bus;
pub mod config;
pub mod emulator;
pub mod error;
pub mod sender;

pub use config::EmulatorConfig;
pub use emulator::Emulator;
pub use error::SenderError;
