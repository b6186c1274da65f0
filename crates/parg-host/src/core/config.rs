use std::path::PathBuf;

use crate::asset::{AssetSource, FailurePolicy};
use crate::input::InteractionGate;
use crate::surface::ContextOptions;
use crate::time::DrawPolicy;

/// Host configuration, fixed at construction.
///
/// ```rust,ignore
/// let gate = InteractionGate::new();
/// let config = HostConfig::new()
///     .title("trefoil")
///     .asset_base("https://example.com/parg/")
///     .engine_args(["-capture", "out.png"])
///     .interaction(gate.clone())
///     .failure_policy(FailurePolicy::Abort);
/// ```
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Window title; identifies the surface the host draws into.
    pub title: String,
    /// Opaque argument list handed to `Engine::init`.
    pub engine_args: Vec<String>,
    /// Prefix every asset identifier is appended to.
    pub asset_base: String,
    pub interaction: InteractionGate,
    pub context_options: ContextOptions,
    pub failure_policy: FailurePolicy,
    pub draw_policy: DrawPolicy,
    /// Write the first drawn frame to this PNG, then stop.
    pub capture: Option<PathBuf>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self {
            title: "parg".to_string(),
            engine_args: Vec::new(),
            asset_base: "parg/".to_string(),
            interaction: InteractionGate::new(),
            context_options: ContextOptions::default(),
            failure_policy: FailurePolicy::default(),
            draw_policy: DrawPolicy::default(),
            capture: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn engine_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engine_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = base.into();
        self
    }

    /// Shares `gate` with the embedder so it can block input at any time.
    pub fn interaction(mut self, gate: InteractionGate) -> Self {
        self.interaction = gate;
        self
    }

    pub fn context_options(mut self, options: ContextOptions) -> Self {
        self.context_options = options;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn draw_policy(mut self, policy: DrawPolicy) -> Self {
        self.draw_policy = policy;
        self
    }

    pub fn capture(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture = Some(path.into());
        self
    }

    pub fn asset_source(&self) -> AssetSource {
        AssetSource::from_base(self.asset_base.clone())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
