//! Host runtime for precompiled parg engines.
//!
//! The host fetches the engine's assets, copies them into engine memory behind
//! a completion barrier, brings up a window and graphics context, and then
//! drives the engine: one tick/draw per frame and normalized pointer input.

pub mod asset;
pub mod core;
pub mod device;
pub mod engine;
pub mod input;
pub mod surface;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;

mod error;

pub use error::HostError;

#[cfg(test)]
mod testing;
