//! Drawing surface lifecycle.
//!
//! The surface is sized once, from the engine's preferred size and the host's
//! pixel density, when the asset barrier releases. Resizing afterwards is not
//! tracked: input normalization keeps using the client size captured at start.

mod config;
mod host;
mod manager;

pub use config::{ContextOptions, OptionValue, SurfaceConfig};
pub use host::Surface;
pub use manager::{ActiveSurface, SurfaceManager, DEFAULT_BACKGROUND};
