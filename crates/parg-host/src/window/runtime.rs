use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::asset::{AssetCompletion, AssetFetcher, Transition};
use crate::core::{HostApp, Phase};
use crate::error::HostError;
use crate::input::platform::winit::PointerTranslator;
use crate::surface::Surface;

use super::WindowSurface;

/// Events injected into the winit loop from fetch workers.
#[derive(Debug)]
pub enum HostEvent {
    Asset(AssetCompletion),
}

/// Entry point for the windowed host.
pub struct Runtime;

impl Runtime {
    /// Loads the app's declared assets and runs it in a window until it closes.
    ///
    /// Fetches run on a tokio worker pool; completions are sent back to the
    /// event loop thread as `HostEvent`s so the engine only ever sees one
    /// writer. Returns an error if loading aborts or startup fails.
    pub fn run(app: HostApp, fetcher: AssetFetcher) -> Result<()> {
        let event_loop = EventLoop::<HostEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let workers = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("parg-fetch")
            .build()
            .context("failed to start asset fetch runtime")?;

        let mut state = HostState::new(app);

        let proxy = event_loop.create_proxy();
        let sink = move |completion| {
            if proxy.send_event(HostEvent::Asset(completion)).is_err() {
                log::debug!("event loop closed, dropping asset completion");
            }
        };
        if state.app.begin_loading(workers.handle(), &fetcher, sink).is_some() {
            log::debug!("no assets declared");
        }

        event_loop
            .run_app(&mut state)
            .map_err(|e| HostError::EventLoop(e.to_string()))?;

        state.app.shutdown();
        workers.shutdown_background();

        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn aborted(transition: &Transition) -> Option<anyhow::Error> {
    match transition {
        Transition::Aborted { failed } => Some(anyhow!(
            "asset loading aborted, {} assets failed",
            failed.len()
        )),
        Transition::Ready { .. } => None,
    }
}

/// Escape or Q closes the host.
fn is_quit_key(key: &KeyEvent) -> bool {
    key.state == ElementState::Pressed
        && matches!(key.physical_key, PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ))
}

struct HostState {
    app: HostApp,
    surface: Option<WindowSurface>,
    translator: PointerTranslator,
    error: Option<anyhow::Error>,
}

impl HostState {
    fn new(app: HostApp) -> Self {
        Self {
            app,
            surface: None,
            translator: PointerTranslator::new(),
            error: None,
        }
    }

    fn window(&self) -> Option<&Arc<Window>> {
        self.surface.as_ref().map(WindowSurface::inner)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.app.preferred_window_size();
        let attrs = Window::default_attributes()
            .with_title(self.app.config().title.clone())
            .with_inner_size(LogicalSize::new(w, h))
            .with_visible(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        self.surface = Some(WindowSurface::new(Arc::new(window)));
        Ok(())
    }

    /// Starts the app once both the assets and the window are in place.
    fn try_start(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.phase() != Phase::Ready {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match self.app.start(surface) {
            Ok(()) => surface.inner().request_redraw(),
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

impl ApplicationHandler<HostEvent> for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.try_start(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::Asset(completion) => match self.app.on_asset(completion) {
                Some(transition @ Transition::Aborted { .. }) => {
                    if let Some(err) = aborted(&transition) {
                        self.fail(event_loop, err);
                    }
                }
                Some(Transition::Ready { .. }) => self.try_start(event_loop),
                None => {}
            },
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = self.window().cloned() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }

            WindowEvent::KeyboardInput { event: key, .. } if is_quit_key(key) => {
                event_loop.exit();
                return;
            }

            WindowEvent::RedrawRequested => {
                let Some(report) = self.app.run_frame(window.scale_factor() as f32) else {
                    return;
                };
                match self.app.write_capture(&report) {
                    Ok(Some(_)) => event_loop.exit(),
                    Ok(None) => window.request_redraw(),
                    Err(e) => self.fail(event_loop, e.into()),
                }
                return;
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                window.request_redraw();
            }

            _ => {}
        }

        if let Some(pointer) = self.translator.translate(&event, window.scale_factor()) {
            let bounds = match &self.surface {
                Some(surface) => surface.bounding_box(),
                None => return,
            };
            self.app.route_input(&pointer, bounds);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.shutdown();
    }
}
