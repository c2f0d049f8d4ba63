//! Reading-direction detection from raw OCR fragments.
//!
//! Captured book pages come in two fundamentally different reading orders:
//! horizontal (left-to-right, top-to-bottom) and vertical (top-to-bottom,
//! right-to-left, typical of Japanese novels). The detector classifies a page
//! from fragment geometry alone, before any grouping or merging happens.
//!
//! No single geometric signal is reliable on its own: an x-decreasing trend
//! can arise from noise, and tall boxes can arise from single-character
//! lines. The detector therefore combines two weighted signals and defaults
//! to horizontal on ties and low-signal pages.

use crate::core::errors::{OcrError, OcrResult};
use crate::processors::types::Fragment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dominant reading direction of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Left-to-right lines, read top to bottom.
    #[default]
    Horizontal,
    /// Top-to-bottom columns, read right to left.
    Vertical,
}

impl Orientation {
    /// Returns true for vertical orientation.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// The arrow key that advances to the next page in an e-reader displaying
    /// this orientation.
    ///
    /// Vertical (right-to-left) books page with the left arrow; horizontal
    /// books with the right arrow. Consumed by capture collaborators, not by
    /// the pipeline itself.
    pub fn page_turn_key(&self) -> &'static str {
        match self {
            Orientation::Vertical => "left",
            Orientation::Horizontal => "right",
        }
    }
}

impl FromStr for Orientation {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(OcrError::invalid_field(
                "orientation",
                "one of 'horizontal', 'vertical'",
                format!("'{other}'"),
            )),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// The detector's classification of a page, with a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationVerdict {
    /// The classified reading direction.
    pub orientation: Orientation,
    /// Confidence in `[0, 1]`. Zero means the detector had no signal and
    /// fell back to the horizontal default.
    pub confidence: f32,
}

impl OrientationVerdict {
    /// The safe fallback verdict used when detection has no signal: too few
    /// fragments, or recognition failed on the probe page.
    pub fn horizontal_fallback() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            confidence: 0.0,
        }
    }

    /// A verdict for an orientation forced by configuration rather than
    /// detected.
    pub fn forced(orientation: Orientation) -> Self {
        Self {
            orientation,
            confidence: 1.0,
        }
    }
}

/// Tunable constants for orientation detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationConfig {
    /// Combined score above which a page is classified vertical.
    /// Default: 0.5.
    #[serde(default = "OrientationConfig::default_vertical_threshold")]
    pub vertical_threshold: f32,

    /// A box is counted as tall when height > width × this factor.
    /// Default: 1.2.
    #[serde(default = "OrientationConfig::default_aspect_ratio_threshold")]
    pub aspect_ratio_threshold: f32,

    /// Weight of the x-coordinate trend signal (decreasing x in reading
    /// order suggests right-to-left columns). Default: 0.6.
    #[serde(default = "OrientationConfig::default_x_trend_weight")]
    pub x_trend_weight: f32,

    /// Weight of the tall-box aspect-ratio signal. Default: 0.4.
    #[serde(default = "OrientationConfig::default_aspect_ratio_weight")]
    pub aspect_ratio_weight: f32,

    /// Minimum number of fragments required to attempt detection; below
    /// this the detector returns the horizontal fallback. Default: 3.
    #[serde(default = "OrientationConfig::default_min_fragments")]
    pub min_fragments: usize,
}

impl OrientationConfig {
    /// Validates configuration values.
    pub fn validate(&self) -> OcrResult<()> {
        for (field, value) in [
            ("orientation.vertical_threshold", self.vertical_threshold),
            ("orientation.x_trend_weight", self.x_trend_weight),
            ("orientation.aspect_ratio_weight", self.aspect_ratio_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OcrError::invalid_field(field, "a value in [0, 1]", value));
            }
        }
        if self.aspect_ratio_threshold <= 0.0 {
            return Err(OcrError::invalid_field(
                "orientation.aspect_ratio_threshold",
                "a positive value",
                self.aspect_ratio_threshold,
            ));
        }
        Ok(())
    }

    fn default_vertical_threshold() -> f32 {
        0.5
    }

    fn default_aspect_ratio_threshold() -> f32 {
        1.2
    }

    fn default_x_trend_weight() -> f32 {
        0.6
    }

    fn default_aspect_ratio_weight() -> f32 {
        0.4
    }

    fn default_min_fragments() -> usize {
        3
    }
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            vertical_threshold: Self::default_vertical_threshold(),
            aspect_ratio_threshold: Self::default_aspect_ratio_threshold(),
            x_trend_weight: Self::default_x_trend_weight(),
            aspect_ratio_weight: Self::default_aspect_ratio_weight(),
            min_fragments: Self::default_min_fragments(),
        }
    }
}

/// Classifies a page's reading direction from its raw fragments.
#[derive(Debug, Clone, Default)]
pub struct OrientationDetector {
    config: OrientationConfig,
}

impl OrientationDetector {
    /// Creates a detector with the given configuration.
    pub fn new(config: OrientationConfig) -> Self {
        Self { config }
    }

    /// Classifies the fragments of one page.
    ///
    /// Pure function: sorts a copy of the input into assumed top-to-bottom
    /// reading order (descending y), then combines two signals:
    ///
    /// 1. the fraction of adjacent pairs whose x strictly decreases
    ///    (right-to-left column progression), and
    /// 2. the fraction of boxes that are tall.
    ///
    /// With fewer than `min_fragments` fragments there is not enough signal,
    /// and the horizontal fallback is returned so that detection failure can
    /// never block the pipeline.
    pub fn detect(&self, fragments: &[Fragment]) -> OrientationVerdict {
        if fragments.len() < self.config.min_fragments {
            return OrientationVerdict::horizontal_fallback();
        }

        // Assumed top-to-bottom reading order.
        let mut sorted: Vec<&Fragment> = fragments.iter().collect();
        sorted.sort_by(|a, b| b.bounding_box.y.total_cmp(&a.bounding_box.y));

        let decreasing_pairs = sorted
            .windows(2)
            .filter(|pair| pair[0].bounding_box.x > pair[1].bounding_box.x)
            .count();
        let decreasing_ratio = decreasing_pairs as f32 / (sorted.len() - 1) as f32;

        let tall_boxes = fragments
            .iter()
            .filter(|f| f.bounding_box.is_tall(self.config.aspect_ratio_threshold))
            .count();
        let vertical_ratio = tall_boxes as f32 / fragments.len() as f32;

        let score = decreasing_ratio * self.config.x_trend_weight
            + vertical_ratio * self.config.aspect_ratio_weight;

        if score > self.config.vertical_threshold {
            OrientationVerdict {
                orientation: Orientation::Vertical,
                confidence: score,
            }
        } else {
            OrientationVerdict {
                orientation: Orientation::Horizontal,
                confidence: 1.0 - score,
            }
        }
    }
}
