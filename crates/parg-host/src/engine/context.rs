use crate::paint::Color;

/// Graphics API version requested at context creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextVersion {
    pub major: u32,
    pub minor: u32,
}

impl ContextVersion {
    /// The version every engine build is compiled against.
    pub const BASELINE: ContextVersion = ContextVersion { major: 1, minor: 1 };
}

/// Order in which a read-back frame stores its rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RowOrder {
    /// First row is the top of the image.
    TopDown,
    /// First row is the bottom of the image, as GL readbacks return them.
    BottomUp,
}

/// RGBA8 pixels read back from a presented frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCapture {
    pub width: u32,
    pub height: u32,
    pub rows: RowOrder,
    pub rgba: Vec<u8>,
}

/// Graphics context handed back by the engine.
///
/// The host only clears it once after creation; all further drawing goes
/// through `Engine::draw`. Contexts that can read back what they present
/// override the capture pair.
pub trait GraphicsContext {
    fn clear(&mut self, color: Color);

    /// Keeps a copy of the next presented frame. Returns false when the
    /// context cannot read frames back.
    fn request_capture(&mut self) -> bool {
        false
    }

    /// The frame kept after `request_capture`, once one has been presented.
    fn take_capture(&mut self) -> Option<FrameCapture> {
        None
    }
}
