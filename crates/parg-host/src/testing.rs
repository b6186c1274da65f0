//! Test doubles shared by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Once;

use crate::asset::AssetId;
use crate::coords::Rect;
use crate::engine::{ContextVersion, Engine, EventCode, FrameCapture, GraphicsContext};
use crate::paint::Color;
use crate::surface::{ContextOptions, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Alloc { id: String, len: usize },
    Commit { id: String, bytes: Vec<u8> },
    CreateContext { version: ContextVersion, options: ContextOptions },
    Clear(Color),
    RequestCapture,
    Init(Vec<String>),
    Tick { seconds: f64, pixel_density: f32 },
    Draw,
    Input { code: EventCode, x: f32, y: f32, delta: f32 },
    Dispose,
}

/// Ordered log shared between engines, tagged with the engine's name.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<(&'static str, Call)>>>);

impl CallLog {
    pub fn entries(&self) -> Vec<(&'static str, Call)> {
        self.0.borrow().clone()
    }

    /// Calls made by the engine called `name`, in order.
    pub fn calls_of(&self, name: &str) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, call)| call.clone())
            .collect()
    }

    fn push(&self, name: &'static str, call: Call) {
        self.0.borrow_mut().push((name, call));
    }
}

/// Engine that records every call and keeps a bump-allocated memory region.
pub struct RecordingEngine {
    name: &'static str,
    log: CallLog,
    memory: Vec<u8>,
    cursor: usize,
    allocations: HashMap<AssetId, (usize, usize)>,
    window_size: (u32, u32),
    redraw: bool,
    fail_context: bool,
    readback: Option<FrameCapture>,
}

impl RecordingEngine {
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, 1024)
    }

    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            log: CallLog::default(),
            memory: vec![0; capacity],
            cursor: 0,
            allocations: HashMap::new(),
            window_size: (800, 600),
            redraw: true,
            fail_context: false,
            readback: None,
        }
    }

    pub fn sharing(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn requesting_redraw(mut self, redraw: bool) -> Self {
        self.redraw = redraw;
        self
    }

    pub fn failing_context(mut self) -> Self {
        self.fail_context = true;
        self
    }

    /// Context reads `frame` back once a capture is requested.
    pub fn reading_back(mut self, frame: FrameCapture) -> Self {
        self.readback = Some(frame);
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Calls made by this engine, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.log.calls_of(self.name)
    }

    pub fn commits(&self) -> usize {
        self.count(|c| matches!(c, Call::Commit { .. }))
    }

    pub fn draws(&self) -> usize {
        self.count(|c| matches!(c, Call::Draw))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.log.push(self.name, call);
    }
}

impl Engine for RecordingEngine {
    fn alloc(&mut self, id: &AssetId, nbytes: usize) -> usize {
        let offset = self.cursor;
        self.cursor += nbytes;
        self.allocations.insert(id.clone(), (offset, nbytes));
        self.record(Call::Alloc { id: id.to_string(), len: nbytes });
        offset
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn commit(&mut self, id: &AssetId) {
        let (offset, len) = self.allocations[id];
        let bytes = self.memory[offset..offset + len].to_vec();
        self.record(Call::Commit { id: id.to_string(), bytes });
    }

    fn preferred_window_size(&self) -> (u32, u32) {
        self.window_size
    }

    fn create_context(
        &mut self,
        _surface: &dyn Surface,
        version: ContextVersion,
        options: &ContextOptions,
    ) -> anyhow::Result<Box<dyn GraphicsContext>> {
        if self.fail_context {
            anyhow::bail!("no adapter");
        }
        self.record(Call::CreateContext { version, options: options.clone() });
        Ok(Box::new(RecordingContext {
            name: self.name,
            log: self.log.clone(),
            readback: self.readback.clone(),
            armed: false,
        }))
    }

    fn init(&mut self, args: &[String]) {
        self.record(Call::Init(args.to_vec()));
    }

    fn tick(&mut self, seconds: f64, pixel_density: f32) -> bool {
        self.record(Call::Tick { seconds, pixel_density });
        self.redraw
    }

    fn draw(&mut self) {
        self.record(Call::Draw);
    }

    fn input(&mut self, code: EventCode, x: f32, y: f32, delta: f32) {
        self.record(Call::Input { code, x, y, delta });
    }

    fn dispose(&mut self) {
        self.record(Call::Dispose);
    }
}

struct RecordingContext {
    name: &'static str,
    log: CallLog,
    readback: Option<FrameCapture>,
    armed: bool,
}

impl GraphicsContext for RecordingContext {
    fn clear(&mut self, color: Color) {
        self.log.push(self.name, Call::Clear(color));
    }

    fn request_capture(&mut self) -> bool {
        self.log.push(self.name, Call::RequestCapture);
        self.armed = self.readback.is_some();
        self.armed
    }

    fn take_capture(&mut self) -> Option<FrameCapture> {
        if self.armed {
            self.readback.take()
        } else {
            None
        }
    }
}

/// In-memory surface with a configurable pixel density.
#[derive(Debug)]
pub struct TestSurface {
    pub density: f32,
    pub logical: Option<(u32, u32)>,
    pub backing: Option<(u32, u32)>,
    pub visible: bool,
}

impl TestSurface {
    pub fn new(density: f32) -> Self {
        Self {
            density,
            logical: None,
            backing: None,
            visible: false,
        }
    }
}

impl Surface for TestSurface {
    fn pixel_density(&self) -> f32 {
        self.density
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        self.logical = Some((width, height));
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = Some((width, height));
    }

    fn client_size(&self) -> (f32, f32) {
        let (w, h) = self.logical.unwrap_or((0, 0));
        (w as f32, h as f32)
    }

    fn bounding_box(&self) -> Rect {
        let (w, h) = self.client_size();
        Rect::from_size(w, h)
    }

    fn show(&mut self) {
        self.visible = true;
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps records per thread, so parallel tests don't see each other.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Runs `f` and returns what it logged on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(log::Level, String)>) {
    INSTALL.call_once(|| {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    RECORDS.with(|r| r.borrow_mut().clear());
    let out = f();
    let records = RECORDS.with(|r| r.borrow_mut().drain(..).collect());
    (out, records)
}
