use crate::engine::{ContextVersion, Engine, GraphicsContext};
use crate::error::HostError;
use crate::paint::Color;

use super::{ContextOptions, Surface, SurfaceConfig};

/// Colour the context is cleared to before the engine draws anything.
pub const DEFAULT_BACKGROUND: Color = Color::rgba(0.2, 0.4, 0.8, 1.0);

/// A sized, visible surface with a live graphics context.
pub struct ActiveSurface {
    pub config: SurfaceConfig,
    pub context: Box<dyn GraphicsContext>,
    /// Client size captured right after the surface became visible.
    pub client_size: (f32, f32),
}

/// Brings the surface up once the engine's assets are in place.
pub struct SurfaceManager;

impl SurfaceManager {
    /// Sizes the surface, asks the engine for a context, clears it and shows it.
    ///
    /// Context creation failure is fatal to startup; the surface is left hidden.
    pub fn start(
        engine: &mut dyn Engine,
        surface: &mut dyn Surface,
        options: &ContextOptions,
    ) -> Result<ActiveSurface, HostError> {
        let preferred = engine.preferred_window_size();
        let config = SurfaceConfig::new(preferred, surface.pixel_density(), options.clone());

        surface.set_logical_size(config.logical_width, config.logical_height);
        surface.set_backing_size(config.backing_width, config.backing_height);

        let mut context = engine
            .create_context(&*surface, ContextVersion::BASELINE, options)
            .map_err(HostError::ContextCreation)?;
        context.clear(DEFAULT_BACKGROUND);

        surface.show();

        log::info!(
            "surface {}x{} @{} ({}x{} device px)",
            config.logical_width,
            config.logical_height,
            config.pixel_density,
            config.backing_width,
            config.backing_height,
        );

        Ok(ActiveSurface {
            config,
            context,
            client_size: surface.client_size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingEngine, TestSurface};

    #[test]
    fn sizes_from_engine_preference_and_density() {
        let mut engine = RecordingEngine::new("primary").with_window_size(400, 300);
        let mut surface = TestSurface::new(2.0);

        let active =
            SurfaceManager::start(&mut engine, &mut surface, &ContextOptions::default()).unwrap();

        assert_eq!(surface.logical, Some((400, 300)));
        assert_eq!(surface.backing, Some((800, 600)));
        assert!(surface.visible);
        assert_eq!(active.config.pixel_density, 2.0);
        assert_eq!(active.client_size, (400.0, 300.0));
    }

    #[test]
    fn context_requested_with_options_and_cleared() {
        let mut engine = RecordingEngine::new("primary");
        let mut surface = TestSurface::new(1.0);
        let options = ContextOptions::default().antialias(false).flag("stencil", true);

        SurfaceManager::start(&mut engine, &mut surface, &options).unwrap();

        assert_eq!(
            engine.calls(),
            vec![
                Call::CreateContext { version: ContextVersion::BASELINE, options },
                Call::Clear(DEFAULT_BACKGROUND),
            ]
        );
    }

    #[test]
    fn context_failure_is_fatal_and_keeps_surface_hidden() {
        let mut engine = RecordingEngine::new("primary").failing_context();
        let mut surface = TestSurface::new(1.0);

        let err = SurfaceManager::start(&mut engine, &mut surface, &ContextOptions::default())
            .err()
            .unwrap();

        assert!(matches!(err, HostError::ContextCreation(_)));
        assert!(!surface.visible);
    }
}
