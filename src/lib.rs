pub mod account;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod gate;
pub mod session;
pub mod tui;

pub use error::GateError;
