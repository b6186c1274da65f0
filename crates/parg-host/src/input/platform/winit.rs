use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

use crate::input::{PointerEvent, PointerKind, WheelDelta};

/// `wheelDelta` reported per notch by line-based wheels.
const WHEEL_DELTA_PER_LINE: f32 = 120.0;

/// Translates winit window events into pointer events.
///
/// winit reports button and wheel events without a position, so the last
/// cursor position is tracked here.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    cursor: Option<(f32, f32)>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in logical pixels.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Returns `None` for events the input subsystem does not represent.
    ///
    /// `scale_factor` converts winit's physical positions to logical pixels.
    pub fn translate(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical_f32(*position, scale_factor);
                self.cursor = Some((x, y));
                Some(PointerEvent::new(PointerKind::Move, x, y))
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }

            // any button; the engine only sees down/up
            WindowEvent::MouseInput { state, .. } => {
                let kind = match state {
                    ElementState::Pressed => PointerKind::Down,
                    ElementState::Released => PointerKind::Up,
                };
                let (x, y) = self.cursor?;
                Some(PointerEvent::new(kind, x, y))
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let wheel = match delta {
                    MouseScrollDelta::LineDelta(_, y) => WheelDelta::Legacy {
                        wheel_delta: y * WHEEL_DELTA_PER_LINE,
                    },
                    // winit: positive y scrolls up; `delta_y` follows the opposite convention.
                    MouseScrollDelta::PixelDelta(p) => {
                        let (_, y) = to_logical_f32(*p, scale_factor);
                        WheelDelta::Standard { delta_y: -y }
                    }
                };
                let (x, y) = self.cursor?;
                Some(PointerEvent::new(PointerKind::Wheel(wheel), x, y))
            }

            _ => None,
        }
    }
}

fn to_logical_f32(pos: PhysicalPosition<f64>, scale_factor: f64) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x as f32, logical.y as f32)
}
