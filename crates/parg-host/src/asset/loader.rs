use tokio::runtime::Handle;

use super::{AssetCompletion, AssetFetcher, AssetRequest};

/// Spawns one fetch task per pending request onto `runtime`.
///
/// Each task hands exactly one `AssetCompletion` to `sink`. Completions arrive
/// in whatever order the transport finishes; `sink` is expected to forward
/// them to the thread that owns the barrier and the engine.
pub fn dispatch<S>(runtime: &Handle, fetcher: &AssetFetcher, requests: &[AssetRequest], sink: S)
where
    S: Fn(AssetCompletion) + Clone + Send + 'static,
{
    for request in requests.iter().filter(|r| !r.status.is_terminal()) {
        let fetcher = fetcher.clone();
        let request = request.clone();
        let sink = sink.clone();

        runtime.spawn(async move {
            let result = fetcher.fetch(&request).await;
            sink(AssetCompletion {
                id: request.id,
                result,
            });
        });
    }
}
