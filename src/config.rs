use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How background tiles are searched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Edge length of the square tiles in pixels of the pyramid level.
    pub sample_size: u32,
    /// Number of halvings applied to the image before tiling.
    pub pyramid_level: u32,
    /// Skip tiles that would extend past the image border.
    pub full_tiles_only: bool,
    /// Keep at most this many tiles, chosen at random.
    pub max_negatives: Option<usize>,
    /// Seed for the subsampling above. Without a seed the thread rng is used.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_size: 64,
            pyramid_level: 2,
            full_tiles_only: false,
            max_negatives: None,
            seed: None,
        }
    }
}

/// Behaviour of an [`AnnotationSession`](crate::annotation::AnnotationSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Dragged boxes narrower or shorter than this are ignored.
    pub min_span: f64,
    /// Edge length of the squares placed by a single click.
    pub initial_rect_size: f64,
    /// Amount by which the click square grows or shrinks.
    pub rect_size_step: f64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            min_span: 5.,
            initial_rect_size: 80.,
            rect_size_step: 2.,
        }
    }
}

/// Where samples are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: PathBuf,
    /// File extension of written samples, without the dot.
    pub extension: String,
}

impl OutputConfig {
    pub fn positives_dir(&self) -> PathBuf {
        self.root.join("positives")
    }

    pub fn negatives_dir(&self) -> PathBuf {
        self.root.join("negatives")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("samples"),
            extension: "png".to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn output_dirs() {
        let config = OutputConfig {
            root: PathBuf::from("/tmp/set"),
            ..OutputConfig::default()
        };
        assert_eq!(config.positives_dir(), PathBuf::from("/tmp/set/positives"));
        assert_eq!(config.negatives_dir(), PathBuf::from("/tmp/set/negatives"));
        assert_eq!(config.extension, "png");
    }

    #[test]
    fn defaults() {
        let sampler = SamplerConfig::default();
        assert_eq!(sampler.sample_size, 64);
        assert_eq!(sampler.pyramid_level, 2);
        assert!(!sampler.full_tiles_only);
        assert_eq!(sampler.max_negatives, None);

        let annotation = AnnotationConfig::default();
        assert_eq!(annotation.min_span, 5.);
        assert_eq!(annotation.initial_rect_size, 80.);
    }
}
