//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a host window
//! - translating `ContextOptions` into surface configuration
//! - acquiring frames and clearing them on behalf of engines

mod context;
mod gpu;
mod init;
mod surface;

pub use context::GpuContext;
pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
