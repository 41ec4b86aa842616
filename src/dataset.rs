use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::Rng;

use crate::config::{OutputConfig, SamplerConfig};
use crate::crop::PixelRange;
use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::pyramid::PyramidLevel;
use crate::samplers::SlidingWindow;
use crate::SampleRegions;

/// The regions to extract from one annotated image.
///
/// Positive boxes are in original image coordinates. Negative tiles live on the
/// configured pyramid level, where the positives were rescaled before tiling.
#[derive(Debug, Clone)]
pub struct DatasetPlan {
    dims: (usize, usize),
    level: PyramidLevel,
    positives: Vec<BoundingBox>,
    negatives: Vec<BoundingBox>,
}

impl DatasetPlan {
    /// Plan samples for an image of `(height, width)` with the given positive boxes.
    pub fn build(dims: (usize, usize), positives: &[BoundingBox], config: &SamplerConfig) -> Self {
        let level = PyramidLevel::new(config.pyramid_level);
        let scaled = level.scale_all(positives);
        let negatives = SlidingWindow::from_config(config).regions(level.dims(dims), &scaled);
        info!(
            "planned {} positives and {} negatives for a {}x{} image",
            positives.len(),
            negatives.len(),
            dims.1,
            dims.0
        );
        Self {
            dims,
            level,
            positives: positives.to_vec(),
            negatives,
        }
    }

    /// `(height, width)` of the original image.
    pub fn dims(&self) -> (usize, usize) {
        self.dims
    }

    pub fn level(&self) -> PyramidLevel {
        self.level
    }

    /// `(height, width)` of the pyramid level the negatives are taken from.
    pub fn level_dims(&self) -> (usize, usize) {
        self.level.dims(self.dims)
    }

    pub fn positives(&self) -> &[BoundingBox] {
        &self.positives
    }

    pub fn negatives(&self) -> &[BoundingBox] {
        &self.negatives
    }

    /// Negative tiles mapped back onto the original image.
    pub fn negatives_in_image(&self) -> Vec<BoundingBox> {
        let back = 1. / self.level.factor();
        self.negatives.iter().map(|b| b.resize(back)).collect()
    }

    /// Pixel ranges of the positives in the original image. Boxes entirely outside are dropped.
    pub fn positive_ranges(&self) -> Vec<PixelRange> {
        self.positives
            .iter()
            .filter_map(|b| PixelRange::of(b, self.dims))
            .collect()
    }

    /// Pixel ranges of the negatives in the pyramid level image.
    pub fn negative_ranges(&self) -> Vec<PixelRange> {
        let dims = self.level_dims();
        self.negatives
            .iter()
            .filter_map(|b| PixelRange::of(b, dims))
            .collect()
    }
}

const NAME_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";
const NAME_LEN: usize = 8;

/// A random file name such as `k3_x9a0q.png`.
pub fn random_file_name<R: Rng + ?Sized>(rng: &mut R, extension: &str) -> String {
    let stem: String = (0..NAME_LEN)
        .map(|_| NAME_CHARS[rng.gen_range(0..NAME_CHARS.len())] as char)
        .collect();
    format!("{}.{}", stem, extension)
}

/// The `positives/` and `negatives/` directories samples are written into.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    config: OutputConfig,
}

impl OutputLayout {
    /// Create both sample directories if they do not exist yet.
    pub fn prepare(config: OutputConfig) -> Result<Self> {
        for dir in [config.positives_dir(), config.negatives_dir()] {
            if !dir.exists() {
                info!("creating {}", dir.display());
            }
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { config })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Create an empty file with a fresh random name for a positive sample.
    pub fn create_positive<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(PathBuf, File)> {
        self.create_fresh(&self.config.positives_dir(), rng)
    }

    /// Create an empty file with a fresh random name for a negative sample.
    pub fn create_negative<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(PathBuf, File)> {
        self.create_fresh(&self.config.negatives_dir(), rng)
    }

    /// The file is created with `create_new`, so a name taken by a concurrent
    /// writer fails atomically and another name is drawn.
    fn create_fresh<R: Rng + ?Sized>(&self, dir: &Path, rng: &mut R) -> Result<(PathBuf, File)> {
        loop {
            let path = dir.join(random_file_name(rng, &self.config.extension));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} already taken, drawing another name", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
