use std::path::PathBuf;

use thiserror::Error;

use crate::asset::AssetId;

/// Errors produced by the host core.
///
/// Asset-level failures (`Transport`, `Decode`, `Allocation`) are non-fatal: the
/// barrier logs them and keeps counting. `ContextCreation` aborts startup.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("unable to download {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("unable to decode image asset {id}: {reason}")]
    Decode { id: AssetId, reason: String },

    #[error(
        "engine allocation for {id} is out of bounds (offset {offset}, {len} bytes, memory is {capacity} bytes)"
    )]
    Allocation {
        id: AssetId,
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("failed to create graphics context: {0:#}")]
    ContextCreation(anyhow::Error),

    #[error("asset {0} is already declared")]
    DuplicateAsset(AssetId),

    #[error("asset {0} declared after the barrier was sealed")]
    BarrierSealed(AssetId),

    #[error("unexpected completion for asset {0}")]
    UnexpectedCompletion(AssetId),

    #[error("asset loading stopped with {0} assets outstanding")]
    Incomplete(usize),

    #[error("host is not ready to start")]
    NotReady,

    #[error("unable to capture frame to {}: {reason}", path.display())]
    Capture { path: PathBuf, reason: String },

    #[error("event loop error: {0}")]
    EventLoop(String),
}

impl HostError {
    /// Returns true for failures that only affect a single asset.
    pub fn is_asset_failure(&self) -> bool {
        matches!(
            self,
            HostError::Transport { .. } | HostError::Decode { .. } | HostError::Allocation { .. }
        )
    }
}
