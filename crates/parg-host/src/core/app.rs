use std::path::PathBuf;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::asset::{
    dispatch, AssetBarrier, AssetCompletion, AssetFetcher, AssetId, AssetKind, AssetRequest,
    BarrierState, Transition,
};
use crate::coords::Rect;
use crate::engine::{Engine, LinkedEngine};
use crate::error::HostError;
use crate::input::{InputRouter, PointerEvent, RouteOutcome};
use crate::surface::{ActiveSurface, Surface, SurfaceConfig, SurfaceManager};
use crate::time::{FrameReport, FrameScheduler};

use super::{capture, HostConfig};

/// Lifecycle of a host.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Declaring assets or waiting for them.
    Loading,
    /// Every asset reached a terminal state; the surface can be started.
    Ready,
    /// Engine initialized; frames and input flow.
    Running,
    /// Assets failed under `FailurePolicy::Abort`.
    Aborted,
    /// Graphics context creation failed.
    Failed,
    /// `shutdown` was called.
    Stopped,
}

struct Running {
    surface: ActiveSurface,
    router: InputRouter,
    scheduler: FrameScheduler,
}

/// Owns the engine and sequences loading, startup, input and frames.
///
/// Single-threaded: asset completions produced on worker threads must be
/// handed to `on_asset` on the thread that owns the app.
pub struct HostApp {
    config: HostConfig,
    engine: Box<dyn Engine>,
    linked: Option<LinkedEngine>,
    barrier: AssetBarrier,
    running: Option<Running>,
    phase: Phase,
    disposed: bool,
}

impl HostApp {
    pub fn new(config: HostConfig, engine: impl Engine + 'static) -> Self {
        let barrier = AssetBarrier::new(config.failure_policy);
        Self {
            config,
            engine: Box::new(engine),
            linked: None,
            barrier,
            running: None,
            phase: Phase::Loading,
            disposed: false,
        }
    }

    /// Attaches a second engine that receives a copy of every routed input.
    pub fn link(&mut self, engine: LinkedEngine) {
        self.linked = Some(engine);
    }

    pub fn declare(&mut self, id: impl Into<AssetId>, kind: AssetKind) -> Result<(), HostError> {
        self.barrier.declare(id, kind)
    }

    pub fn requests(&self) -> &[AssetRequest] {
        self.barrier.requests()
    }

    /// Ends declaration. Returns the transition if nothing was declared.
    pub fn seal(&mut self) -> Option<Transition> {
        let transition = self.barrier.seal();
        self.apply(transition)
    }

    /// Seals the barrier and starts one fetch per declared asset on `runtime`.
    ///
    /// `sink` must forward every completion back to this app's `on_asset`.
    pub fn begin_loading<S>(&mut self, runtime: &Handle, fetcher: &AssetFetcher, sink: S) -> Option<Transition>
    where
        S: Fn(AssetCompletion) + Clone + Send + 'static,
    {
        let transition = self.seal();
        if transition.is_none() {
            log::info!("loading {} assets from {:?}", self.barrier.pending(), fetcher.source());
            dispatch(runtime, fetcher, self.barrier.requests(), sink);
        }
        transition
    }

    /// Feeds one completion into the barrier.
    ///
    /// Returns the transition when this was the last outstanding asset.
    /// Unexpected completions are logged and ignored.
    pub fn on_asset(&mut self, completion: AssetCompletion) -> Option<Transition> {
        match self.barrier.complete(completion, &mut *self.engine) {
            Ok(transition) => self.apply(transition),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    /// Loads every declared asset and waits for the barrier to drain.
    ///
    /// Must be awaited inside a tokio runtime. Suited to headless hosts; the
    /// windowed runtime uses `begin_loading` and its own event loop instead.
    pub async fn load_assets(&mut self, fetcher: &AssetFetcher) -> Result<Transition, HostError> {
        match self.barrier.state() {
            BarrierState::Declaring => {}
            BarrierState::Ready => {
                return Ok(Transition::Ready {
                    failed: self.barrier.failed(),
                })
            }
            BarrierState::Aborted => {
                return Ok(Transition::Aborted {
                    failed: self.barrier.failed(),
                })
            }
            BarrierState::Loading => return Err(HostError::Incomplete(self.barrier.pending())),
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(transition) = self.begin_loading(&Handle::current(), fetcher, move |c| {
            let _ = tx.send(c);
        }) {
            return Ok(transition);
        }

        while let Some(completion) = rx.recv().await {
            if let Some(transition) = self.on_asset(completion) {
                return Ok(transition);
            }
        }
        Err(HostError::Incomplete(self.barrier.pending()))
    }

    fn apply(&mut self, transition: Option<Transition>) -> Option<Transition> {
        match &transition {
            Some(Transition::Ready { failed }) => {
                if failed.is_empty() {
                    log::info!("all assets loaded");
                } else {
                    log::warn!("starting without {} failed assets", failed.len());
                }
                self.phase = Phase::Ready;
            }
            Some(Transition::Aborted { failed }) => {
                log::error!("{} assets failed, not starting", failed.len());
                self.phase = Phase::Aborted;
            }
            None => {}
        }
        transition
    }

    /// Brings up the surface and initializes the engine.
    ///
    /// Runs at most once; later calls while running are no-ops. A context
    /// failure moves the app to `Phase::Failed` and the engine is never
    /// initialized.
    pub fn start(&mut self, surface: &mut dyn Surface) -> Result<(), HostError> {
        match self.phase {
            Phase::Running => return Ok(()),
            Phase::Ready => {}
            _ => return Err(HostError::NotReady),
        }

        let mut active =
            match SurfaceManager::start(&mut *self.engine, surface, &self.config.context_options) {
                Ok(active) => active,
                Err(e) => {
                    self.phase = Phase::Failed;
                    return Err(e);
                }
            };

        self.engine.init(&self.config.engine_args);

        if self.config.capture.is_some() && !active.context.request_capture() {
            log::warn!("graphics context cannot read frames back");
        }

        let router = InputRouter::new(active.client_size, self.config.interaction.clone());
        self.running = Some(Running {
            surface: active,
            router,
            scheduler: FrameScheduler::new(self.config.draw_policy),
        });
        self.phase = Phase::Running;
        Ok(())
    }

    /// Routes one pointer event. Does nothing until the app is running.
    pub fn route_input(&mut self, event: &PointerEvent, bounds: Rect) -> RouteOutcome {
        let Some(running) = &self.running else {
            return RouteOutcome::default();
        };
        running
            .router
            .route(event, bounds, &mut *self.engine, self.linked.as_ref())
    }

    /// Runs one frame. Returns `None` until the app is running.
    pub fn run_frame(&mut self, pixel_density: f32) -> Option<FrameReport> {
        let running = self.running.as_mut()?;
        Some(running.scheduler.run_frame(&mut *self.engine, pixel_density))
    }

    /// Writes the frame kept for `HostConfig::capture` once the engine drew.
    ///
    /// Returns the written path, after which the runtime should stop. Returns
    /// `None` while nothing is to be written yet. A drawn frame with nothing
    /// read back is an error, as the capture would never complete.
    pub fn write_capture(&mut self, report: &FrameReport) -> Result<Option<PathBuf>, HostError> {
        let (Some(path), Some(running)) = (&self.config.capture, &mut self.running) else {
            return Ok(None);
        };
        if !report.drew {
            return Ok(None);
        }

        let frame = running.surface.context.take_capture().ok_or_else(|| HostError::Capture {
            path: path.clone(),
            reason: "no frame was read back".to_string(),
        })?;
        capture::write_png(path, frame)?;
        log::info!("captured frame to {}", path.display());
        Ok(Some(path.clone()))
    }

    /// The engine's preferred logical window size.
    pub fn preferred_window_size(&self) -> (u32, u32) {
        self.engine.preferred_window_size()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn surface_config(&self) -> Option<&SurfaceConfig> {
        self.running.as_ref().map(|r| &r.surface.config)
    }

    /// Tears down the surface and disposes the engine if it was initialized.
    ///
    /// Idempotent.
    pub fn shutdown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(running) = self.running.take() {
            log::info!("shutting down after {} frames", running.scheduler.frames());
            self.engine.dispose();
        }
        self.phase = Phase::Stopped;
    }
}
