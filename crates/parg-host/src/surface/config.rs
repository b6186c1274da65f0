use std::collections::BTreeMap;

/// Value of an open-ended context option.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
}

impl OptionValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(b),
            OptionValue::Number(_) => None,
        }
    }

    pub fn as_number(self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(n),
            OptionValue::Bool(_) => None,
        }
    }
}

/// Capability flags passed through to graphics context creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    pub alpha: bool,
    pub antialias: bool,
    pub extra: BTreeMap<String, OptionValue>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            extra: BTreeMap::new(),
        }
    }
}

impl ContextOptions {
    pub fn alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.extra.insert(name.into(), OptionValue::Bool(value));
        self
    }

    pub fn number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.insert(name.into(), OptionValue::Number(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<OptionValue> {
        self.extra.get(name).copied()
    }
}

/// Surface dimensions fixed at start.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub logical_width: u32,
    pub logical_height: u32,
    pub pixel_density: f32,
    pub backing_width: u32,
    pub backing_height: u32,
    pub context_options: ContextOptions,
}

impl SurfaceConfig {
    /// Scales the logical size by `pixel_density`, truncating toward zero.
    pub fn new(logical: (u32, u32), pixel_density: f32, context_options: ContextOptions) -> Self {
        let (logical_width, logical_height) = logical;
        Self {
            logical_width,
            logical_height,
            pixel_density,
            backing_width: (logical_width as f32 * pixel_density) as u32,
            backing_height: (logical_height as f32 * pixel_density) as u32,
            context_options,
        }
    }
}
