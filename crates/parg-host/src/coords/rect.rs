use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(w: f32, h: f32) -> Self {
        Self::new(0.0, 0.0, w, h)
    }

    /// Position of `p` relative to the top-left corner.
    #[inline]
    pub fn local(self, p: Vec2) -> Vec2 {
        p - self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_subtracts_origin() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.local(Vec2::new(15.0, 22.0)), Vec2::new(5.0, 2.0));
    }

    #[test]
    fn from_size_is_at_origin() {
        let r = Rect::from_size(8.0, 6.0);
        assert_eq!(r.origin, Vec2::zero());
        assert_eq!(r.size, Vec2::new(8.0, 6.0));
    }
}
