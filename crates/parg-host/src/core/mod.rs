//! Application context.
//!
//! `HostApp` owns the engine and sequences the whole bootstrap: declare assets,
//! wait on the barrier, bring up the surface, then route input and run frames.
//! Runtimes (the winit `window::Runtime`, or a headless driver) only feed it
//! events.

mod app;
mod capture;
mod config;

pub use app::{HostApp, Phase};
pub use capture::{capture_path, flip_rows, write_png};
pub use config::HostConfig;
