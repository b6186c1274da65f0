//! Coordinate types.
//!
//! Host space is logical pixels with a top-left origin, +Y down. Engine input
//! space is normalized with a bottom-left origin; the conversion lives in
//! `input::InputRouter`.

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
