use crate::geometry::BoundingBox;

/// A level of an image pyramid where every level halves both image dimensions.
///
/// Level 0 is the original image. Levels above [`MAX_LEVEL`](Self::MAX_LEVEL) behave
/// like `MAX_LEVEL`, by then every dimension has already shrunk to a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PyramidLevel(pub u32);

impl PyramidLevel {
    pub const MAX_LEVEL: u32 = usize::BITS;

    pub fn new(level: u32) -> Self {
        Self(level)
    }

    pub fn level(&self) -> u32 {
        self.0
    }

    fn halvings(&self) -> u32 {
        self.0.min(Self::MAX_LEVEL)
    }

    /// Scale from original image coordinates into this level, `1 / 2^level`.
    pub fn factor(&self) -> f64 {
        0.5f64.powi(self.halvings() as i32)
    }

    /// `(height, width)` of the image at this level. Odd dimensions round up on each halving.
    pub fn dims(&self, (height, width): (usize, usize)) -> (usize, usize) {
        let half = |d: usize| d / 2 + d % 2;
        (0..self.halvings()).fold((height, width), |(h, w), _| (half(h), half(w)))
    }

    /// Map a box drawn on the original image into this level.
    pub fn scale(&self, b: &BoundingBox) -> BoundingBox {
        b.resize(self.factor())
    }

    pub fn scale_all(&self, boxes: &[BoundingBox]) -> Vec<BoundingBox> {
        boxes.iter().map(|b| self.scale(b)).collect()
    }
}
