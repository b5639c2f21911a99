//! Application bootstrap.
//!
//! [`StoreApp`] owns the shared coordinator state and runs the startup
//! sequence in the required order; [`AppConfig`] is the unified
//! configuration surface it starts from.

mod bootstrap;
mod config;

pub use bootstrap::StoreApp;
pub use config::AppConfig;
