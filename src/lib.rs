pub mod annotation;
pub mod config;
pub mod crop;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geometry;
pub mod pyramid;
pub mod render;
pub mod samplers;

pub use error::{Error, Result};
pub use geometry::{BoundingBox, Point};

/// Finds regions of an image that are free of the given positive boxes.
pub trait SampleRegions {
    /// Regions for an image of `(height, width)`, in the coordinates of that image.
    fn regions(&self, dims: (usize, usize), positives: &[BoundingBox]) -> Vec<BoundingBox> {
        self.observe(dims, positives, |_, _| {})
    }

    /// Like [`regions`](Self::regions) but reports every candidate together with
    /// whether it was accepted, before any subsampling.
    fn observe(
        &self,
        dims: (usize, usize),
        positives: &[BoundingBox],
        observer: impl FnMut(&BoundingBox, bool),
    ) -> Vec<BoundingBox>;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::samplers::SlidingWindow;

    #[test]
    fn public_api() {
        let box1 = BoundingBox::new((-1, -2), (4, 4));
        let box2 = BoundingBox::new((1, 3), (5, 5));
        assert_eq!(box1 & box2, Some(BoundingBox::new((1, 3), (4, 4))));
        assert_eq!(box1 | box2, BoundingBox::new((-1, -2), (5, 5)));

        let positives = [box1.resize(8)];
        let tiles = SlidingWindow::new(16).regions((64, 64), &positives);
        assert!(tiles.iter().all(|t| !t.intersect(&positives[0])));
        assert!(!tiles.is_empty());
    }
}
