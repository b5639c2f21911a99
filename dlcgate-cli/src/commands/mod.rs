//! CLI command implementations.

pub mod buy;
pub mod catalog;
mod common;
pub mod prices;
pub mod resolve;
pub mod sync;
