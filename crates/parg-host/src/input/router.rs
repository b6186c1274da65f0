use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::coords::{Rect, Vec2};
use crate::engine::{Engine, EventCode, LinkedEngine};

use super::types::{PointerEvent, PointerKind};

/// Shared switch that lets an embedder suspend interaction without tearing
/// down event subscriptions.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct InteractionGate(Arc<AtomicBool>);

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn unblock(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_blocked(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One engine `input` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EngineInput {
    pub code: EventCode,
    pub x: f32,
    pub y: f32,
    pub delta: f32,
}

/// Result of routing one event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RouteOutcome {
    /// Number of engines that received the event.
    pub delivered: u8,
    /// The host should not apply its own default handling (e.g. scrolling).
    pub suppress_default: bool,
}

/// Normalizes pointer events and fans them out to the engine(s).
///
/// The client size is a snapshot taken when the surface started. The bounding
/// box is passed per event.
#[derive(Debug, Clone)]
pub struct InputRouter {
    client_width: f32,
    client_height: f32,
    gate: InteractionGate,
}

impl InputRouter {
    pub fn new(client_size: (f32, f32), gate: InteractionGate) -> Self {
        Self {
            client_width: client_size.0,
            client_height: client_size.1,
            gate,
        }
    }

    pub fn client_size(&self) -> (f32, f32) {
        (self.client_width, self.client_height)
    }

    /// Maps a client-space event to engine space.
    ///
    /// x grows right from the box's left edge, y grows up from its bottom row.
    /// Points outside the surface yield values outside `[0, 1]`.
    pub fn translate(&self, event: &PointerEvent, bounds: Rect) -> EngineInput {
        let local = bounds.local(Vec2::new(event.client_x, event.client_y));
        let x = local.x / self.client_width;
        let y = ((self.client_height - 1.0) - local.y) / self.client_height;

        let (code, delta) = match event.kind {
            PointerKind::Down => (EventCode::Down, 0.0),
            PointerKind::Up => (EventCode::Up, 0.0),
            PointerKind::Move => (EventCode::Move, 0.0),
            PointerKind::Wheel(wheel) => (EventCode::Move, wheel.engine_delta()),
        };

        EngineInput { code, x, y, delta }
    }

    /// Delivers `event` to `primary`, then to `linked` if present.
    pub fn route(
        &self,
        event: &PointerEvent,
        bounds: Rect,
        primary: &mut dyn Engine,
        linked: Option<&LinkedEngine>,
    ) -> RouteOutcome {
        if self.gate.is_blocked() {
            return RouteOutcome::default();
        }

        let input = self.translate(event, bounds);
        primary.input(input.code, input.x, input.y, input.delta);
        let mut delivered = 1;

        if let Some(linked) = linked {
            linked
                .borrow_mut()
                .input(input.code, input.x, input.y, input.delta);
            delivered += 1;
        }

        RouteOutcome {
            delivered,
            suppress_default: matches!(event.kind, PointerKind::Wheel(_)),
        }
    }
}
