//! Demo engine: clears the window to a colour that pulses over time and
//! follows the pointer. Stands in for a real precompiled engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use parg_host::asset::{AssetId, PixelHeader};
use parg_host::device::{Gpu, GpuContext, SurfaceErrorAction};
use parg_host::engine::{ContextVersion, Engine, EventCode, GraphicsContext};
use parg_host::paint::Color;
use parg_host::surface::{ContextOptions, Surface};

const CALM: Color = Color::rgba(0.08, 0.10, 0.16, 1.0);
const BRIGHT: Color = Color::rgba(0.95, 0.55, 0.20, 1.0);
const PRESSED: Color = Color::rgba(0.20, 0.80, 0.45, 1.0);

/// What the engine made of a committed asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    Image { width: u32, height: u32 },
    Blob { len: usize },
}

pub struct Pulse {
    name: &'static str,
    memory: Vec<u8>,
    cursor: usize,
    allocations: HashMap<AssetId, (usize, usize)>,
    assets: HashMap<AssetId, Committed>,

    gpu: Option<Rc<RefCell<Gpu>>>,
    seconds: f64,
    speed: f32,
    pointer: (f32, f32),
    pressed: bool,
    inputs: usize,
}

impl Pulse {
    pub fn new(name: &'static str, memory_bytes: usize) -> Self {
        Self {
            name,
            memory: vec![0; memory_bytes],
            cursor: 0,
            allocations: HashMap::new(),
            assets: HashMap::new(),
            gpu: None,
            seconds: 0.0,
            speed: 1.0,
            pointer: (0.5, 0.5),
            pressed: false,
            inputs: 0,
        }
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Committed> {
        self.assets.get(id)
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Colour for the current time and pointer state.
    pub fn color(&self) -> Color {
        if self.pressed {
            return PRESSED;
        }
        let wave = 0.5 + 0.5 * (self.seconds as f32 * self.speed).sin();
        let base = CALM.lerp(BRIGHT, wave);
        // pointer height dims, pointer x warms
        base.lerp(Color::rgba(self.pointer.0, 0.1, 0.3, 1.0), 0.3 * (1.0 - self.pointer.1))
    }
}

impl Engine for Pulse {
    fn alloc(&mut self, id: &AssetId, nbytes: usize) -> usize {
        let offset = self.cursor;
        self.cursor += nbytes;
        self.allocations.insert(id.clone(), (offset, nbytes));
        offset
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn commit(&mut self, id: &AssetId) {
        let Some(&(offset, len)) = self.allocations.get(id) else {
            log::warn!("[{}] commit without alloc for {id}", self.name);
            return;
        };
        let bytes = &self.memory[offset..offset + len];

        let committed = match PixelHeader::read(bytes) {
            Some(h) if h.channels == 4 && PixelHeader::SIZE + h.pixel_len() == len => {
                Committed::Image {
                    width: h.width,
                    height: h.height,
                }
            }
            _ => Committed::Blob { len },
        };
        log::info!("[{}] committed {id}: {committed:?}", self.name);
        self.assets.insert(id.clone(), committed);
    }

    fn preferred_window_size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn create_context(
        &mut self,
        surface: &dyn Surface,
        version: ContextVersion,
        options: &ContextOptions,
    ) -> anyhow::Result<Box<dyn GraphicsContext>> {
        let context = GpuContext::create(surface, version, options)?;
        self.gpu = Some(context.gpu());
        Ok(Box::new(context))
    }

    fn init(&mut self, args: &[String]) {
        if let Some(speed) = args
            .windows(2)
            .find(|w| w[0] == "-speed")
            .and_then(|w| w[1].parse::<f32>().ok())
        {
            self.speed = speed;
        }
        log::info!(
            "[{}] init with {} assets, args {args:?}",
            self.name,
            self.assets.len()
        );
    }

    fn tick(&mut self, seconds: f64, _pixel_density: f32) -> bool {
        self.seconds = seconds;
        true
    }

    fn draw(&mut self) {
        let color = self.color();
        let Some(gpu) = &self.gpu else {
            return;
        };
        if let Err(SurfaceErrorAction::Fatal) = gpu.borrow_mut().clear(color) {
            log::error!("[{}] surface lost", self.name);
        }
    }

    fn input(&mut self, code: EventCode, x: f32, y: f32, delta: f32) {
        self.inputs += 1;
        self.pointer = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        match code {
            EventCode::Down => self.pressed = true,
            EventCode::Up => self.pressed = false,
            EventCode::Move => {
                if delta != 0.0 {
                    self.speed = (self.speed * (1.0 + delta * 0.01)).clamp(0.1, 10.0);
                }
            }
        }
    }

    fn dispose(&mut self) {
        log::info!("[{}] disposed after {} inputs", self.name, self.inputs);
        self.gpu = None;
    }
}
