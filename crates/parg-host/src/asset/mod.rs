//! Asset loading.
//!
//! Assets are declared up front, fetched concurrently, and transferred into
//! engine memory as they arrive. The barrier releases the host exactly once,
//! after every declared asset has reached a terminal state.

mod barrier;
mod fetch;
mod loader;
mod pixels;
mod request;

pub use barrier::{
    transfer, AssetBarrier, AssetCompletion, BarrierState, FailurePolicy, Transition,
};
pub use fetch::{AssetFetcher, AssetSource};
pub use loader::dispatch;
pub use pixels::{decode_image, AnnotatedPixelBuffer, PixelHeader};
pub use request::{AssetId, AssetKind, AssetRequest, AssetStatus};
