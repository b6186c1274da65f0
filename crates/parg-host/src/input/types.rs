/// Wheel payload, one variant per wheel event flavour a host can report.
///
/// Each flavour uses its own sign convention and scale; the router maps them
/// all onto the engine's single delta value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    /// `mousewheel`-style: positive `wheel_delta` scrolls up, 120 per notch.
    Legacy { wheel_delta: f32 },
    /// `DOMMouseScroll`-style: positive `detail` scrolls down, in lines.
    LegacyScroll { detail: f32 },
    /// `wheel`-style: positive `delta_y` scrolls down, in pixels.
    Standard { delta_y: f32 },
}

impl WheelDelta {
    /// Engine delta for this wheel event.
    pub fn engine_delta(self) -> f32 {
        match self {
            WheelDelta::Legacy { wheel_delta } => wheel_delta / 10.0,
            WheelDelta::LegacyScroll { detail } => -detail / 2.0,
            WheelDelta::Standard { delta_y } => -delta_y / 2.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    Wheel(WheelDelta),
}

/// Pointer or wheel event in host client coordinates (logical px, top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, client_x: f32, client_y: f32) -> Self {
        Self {
            kind,
            client_x,
            client_y,
        }
    }
}
