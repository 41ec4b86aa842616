use std::ops::Range;

use ndarray::{s, ArrayView3};

use crate::geometry::BoundingBox;

/// The rows and columns of an image covered by a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRange {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl PixelRange {
    /// Pixel range of `b` inside an image of `(height, width)`.
    ///
    /// Corner coordinates are truncated towards zero and clamped into the image.
    /// Returns `None` when nothing of the box remains.
    pub fn of(b: &BoundingBox, (height, width): (usize, usize)) -> Option<Self> {
        let clamp = |v: f64, max: usize| -> usize { (v.trunc().max(0.) as usize).min(max) };
        let (tl, br) = (b.top_left(), b.bottom_right());
        let rows = clamp(tl.y(), height)..clamp(br.y(), height);
        let cols = clamp(tl.x(), width)..clamp(br.x(), width);
        if rows.is_empty() || cols.is_empty() {
            return None;
        }
        Some(Self { rows, cols })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }
}

/// View of the pixels of a `height x width x channels` buffer covered by `b`, without copying.
pub fn crop<'a, T>(image: ArrayView3<'a, T>, b: &BoundingBox) -> Option<ArrayView3<'a, T>> {
    let (height, width, _) = image.dim();
    let range = PixelRange::of(b, (height, width))?;
    Some(image.slice_move(s![range.rows, range.cols, ..]))
}
