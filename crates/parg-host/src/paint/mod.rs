//! Colour values handed to graphics contexts.

pub mod color;

pub use color::Color;
