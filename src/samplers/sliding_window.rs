use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::config::SamplerConfig;
use crate::geometry::BoundingBox;
use crate::SampleRegions;

/// Tiles an image with square, non-overlapping windows and keeps those that do not
/// overlap any positive box.
///
/// Tiles are laid out row by row from the top-left corner with a stride equal to
/// the tile size. A tile starts at every stride position inside the image, so the
/// last row and column may reach past the bottom and right edges; cropping with
/// [`PixelRange`](crate::crop::PixelRange) clamps them. With
/// [`full_tiles_only`](Self::full_tiles_only) such partial tiles are skipped.
/// A tile that merely touches a positive box along an edge is kept.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    tile: u32,
    full_tiles_only: bool,
    max_tiles: Option<usize>,
    seed: Option<u64>,
}

impl SlidingWindow {
    pub fn new(tile: u32) -> Self {
        Self {
            tile,
            full_tiles_only: false,
            max_tiles: None,
            seed: None,
        }
    }

    /// Skip tiles that would extend past the image border.
    pub fn full_tiles_only(mut self, full_tiles_only: bool) -> Self {
        self.full_tiles_only = full_tiles_only;
        self
    }

    /// Keep at most `max_tiles` of the accepted tiles, picked at random.
    pub fn with_limit(mut self, max_tiles: usize, seed: Option<u64>) -> Self {
        self.max_tiles = Some(max_tiles);
        self.seed = seed;
        self
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self {
            tile: config.sample_size,
            full_tiles_only: config.full_tiles_only,
            max_tiles: config.max_negatives,
            seed: config.seed,
        }
    }

    pub fn tile(&self) -> u32 {
        self.tile
    }

    /// All grid positions for an image of `(height, width)`, row-major.
    pub fn candidates(&self, (height, width): (usize, usize)) -> Vec<BoundingBox> {
        let s = self.tile as usize;
        if s == 0 {
            return Vec::new();
        }
        // last start position of a tile along an axis of length `len`
        let end = |len: usize| -> Option<usize> {
            if self.full_tiles_only {
                len.checked_sub(s)
            } else {
                len.checked_sub(1)
            }
        };
        let (y_end, x_end) = match (end(height), end(width)) {
            (Some(y_end), Some(x_end)) => (y_end, x_end),
            _ => return Vec::new(),
        };
        let mut tiles = Vec::with_capacity((y_end / s + 1) * (x_end / s + 1));
        for y in (0..=y_end).step_by(s) {
            for x in (0..=x_end).step_by(s) {
                tiles.push(BoundingBox::new(
                    (x as f64, y as f64),
                    ((x + s) as f64, (y + s) as f64),
                ));
            }
        }
        tiles
    }

    fn subsample(&self, mut tiles: Vec<BoundingBox>) -> Vec<BoundingBox> {
        let max = match self.max_tiles {
            Some(max) if max < tiles.len() => max,
            _ => return tiles,
        };
        let mut picked = match self.seed {
            Some(seed) => pick(&mut StdRng::seed_from_u64(seed), tiles.len(), max),
            None => pick(&mut rand::thread_rng(), tiles.len(), max),
        };
        // keep grid order
        picked.sort_unstable();
        let mut n = 0;
        let mut next = picked.into_iter().peekable();
        tiles.retain(|_| {
            let keep = next.peek() == Some(&n);
            if keep {
                next.next();
            }
            n += 1;
            keep
        });
        tiles
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    index::sample(rng, len, amount).into_vec()
}

impl SampleRegions for SlidingWindow {
    fn observe(
        &self,
        dims: (usize, usize),
        positives: &[BoundingBox],
        mut observer: impl FnMut(&BoundingBox, bool),
    ) -> Vec<BoundingBox> {
        if self.tile == 0 {
            warn!("sliding window with zero tile size yields no regions");
            return Vec::new();
        }
        let candidates = self.candidates(dims);
        let total = candidates.len();
        let accepted: Vec<BoundingBox> = candidates
            .into_iter()
            .filter(|tile| {
                let free = !positives.iter().any(|p| p.intersect(tile));
                observer(tile, free);
                free
            })
            .collect();
        debug!(
            "{} of {} tiles of size {} clear of {} positives",
            accepted.len(),
            total,
            self.tile,
            positives.len()
        );
        self.subsample(accepted)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_covers_partial_edges() {
        let window = SlidingWindow::new(64);
        let tiles = window.candidates((100, 100));
        assert_eq!(
            tiles,
            vec![
                BoundingBox::new((0, 0), (64, 64)),
                BoundingBox::new((64, 0), (128, 64)),
                BoundingBox::new((0, 64), (64, 128)),
                BoundingBox::new((64, 64), (128, 128)),
            ]
        );
        assert_eq!(window.candidates((128, 128)).len(), 4);
        assert_eq!(window.candidates((64, 64)).len(), 1);
        // an image smaller than one tile still yields one partial tile
        assert_eq!(window.candidates((9, 100)).len(), 2);
        assert!(window.candidates((0, 100)).is_empty());
        assert!(SlidingWindow::new(0).candidates((100, 100)).is_empty());
    }

    #[test]
    fn full_tiles_only() {
        let window = SlidingWindow::new(10).full_tiles_only(true);
        let tiles = window.candidates((25, 30));
        assert_eq!(tiles.len(), 2 * 3);
        assert_eq!(tiles[0], BoundingBox::new((0, 0), (10, 10)));
        assert_eq!(tiles[1], BoundingBox::new((10, 0), (20, 10)));
        assert_eq!(tiles[5], BoundingBox::new((20, 10), (30, 20)));

        // exact fit includes the last row and column
        assert_eq!(window.candidates((20, 20)).len(), 4);
        assert!(window.candidates((9, 100)).is_empty());

        let window = SlidingWindow::new(64).full_tiles_only(true);
        assert_eq!(window.candidates((100, 100)).len(), 1);
        assert_eq!(window.candidates((128, 128)).len(), 4);
    }

    #[test]
    fn partial_tiles_are_tested_for_overlap() {
        let window = SlidingWindow::new(10);
        // lies entirely in the part of the last column beyond the 25px wide image
        let positives = [BoundingBox::new((26, 0), (29, 5))];
        let tiles = window.regions((10, 25), &positives);
        assert_eq!(
            tiles,
            vec![
                BoundingBox::new((0, 0), (10, 10)),
                BoundingBox::new((10, 0), (20, 10)),
            ]
        );
    }

    #[test]
    fn rejects_overlapping_tiles() {
        let _ = env_logger::builder().is_test(true).try_init();
        let window = SlidingWindow::new(10);
        let positives = [BoundingBox::new((5, 5), (15, 8))];
        let tiles = window.regions((20, 20), &positives);
        assert_eq!(
            tiles,
            vec![
                BoundingBox::new((0, 10), (10, 20)),
                BoundingBox::new((10, 10), (20, 20)),
            ]
        );
    }

    #[test]
    fn touching_tiles_are_kept() {
        let window = SlidingWindow::new(10);
        // shares the edge x = 10 with the first tile and x = 20 with the third
        let positives = [BoundingBox::new((10, 0), (20, 10))];
        let tiles = window.regions((10, 30), &positives);
        assert_eq!(
            tiles,
            vec![
                BoundingBox::new((0, 0), (10, 10)),
                BoundingBox::new((20, 0), (30, 10)),
            ]
        );
    }

    #[test]
    fn observer_sees_every_candidate() {
        let window = SlidingWindow::new(8);
        let positives = [BoundingBox::new((0, 0), (4, 4))];
        let mut seen = Vec::new();
        let accepted = window.observe((16, 16), &positives, |tile, free| {
            seen.push((*tile, free))
        });
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], (BoundingBox::new((0, 0), (8, 8)), false));
        assert_eq!(accepted.len(), 3);
    }

    #[test]
    fn limit_is_seeded_and_ordered() {
        let window = SlidingWindow::new(4).with_limit(5, Some(42));
        let a = window.regions((40, 40), &[]);
        let b = window.regions((40, 40), &[]);
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);

        let all = SlidingWindow::new(4).regions((40, 40), &[]);
        assert_eq!(all.len(), 100);
        let positions: Vec<usize> = a
            .iter()
            .map(|t| all.iter().position(|c| c == t).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);

        // a limit above the number of tiles changes nothing
        let loose = SlidingWindow::new(4).with_limit(1000, None);
        assert_eq!(loose.regions((40, 40), &[]), all);
    }

    #[test]
    fn from_config() {
        let config = SamplerConfig {
            sample_size: 32,
            max_negatives: Some(3),
            ..SamplerConfig::default()
        };
        let window = SlidingWindow::from_config(&config);
        assert_eq!(window.tile(), 32);
        assert_eq!(window.regions((128, 128), &[]).len(), 3);
    }
}
