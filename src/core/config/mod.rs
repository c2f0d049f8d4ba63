//! Configuration management for the OCR post-processing pipeline.
//!
//! Everything the pipeline can be tuned with lives in [`OcrConfig`]: the
//! reading-direction policy, opaque hints forwarded to the OCR capability,
//! the batch execution policy, and the per-stage processor settings. The
//! engine reads this struct; it never consults ambient or process-wide state.

pub mod parallel;

pub use parallel::{ExecutionStrategy, ParallelPolicy};

use crate::core::errors::{OcrError, OcrResult};
use crate::processors::{GroupingConfig, OrientationConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the reading direction of a document is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionPolicy {
    /// Detect the direction from the first page's fragments.
    #[default]
    Auto,
    /// Force horizontal (left-to-right, top-to-bottom) reading order.
    Horizontal,
    /// Force vertical (top-to-bottom, right-to-left) reading order.
    Vertical,
}

impl FromStr for DirectionPolicy {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DirectionPolicy::Auto),
            "horizontal" => Ok(DirectionPolicy::Horizontal),
            "vertical" => Ok(DirectionPolicy::Vertical),
            other => Err(OcrError::invalid_field(
                "direction",
                "one of 'auto', 'horizontal', 'vertical'",
                format!("'{other}'"),
            )),
        }
    }
}

impl fmt::Display for DirectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionPolicy::Auto => write!(f, "auto"),
            DirectionPolicy::Horizontal => write!(f, "horizontal"),
            DirectionPolicy::Vertical => write!(f, "vertical"),
        }
    }
}

/// Recognition quality hint forwarded to the OCR capability.
///
/// Opaque to the post-processing stages; backends that have no notion of a
/// recognition level are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionLevel {
    /// Prefer speed over accuracy.
    Fast,
    /// Prefer accuracy over speed.
    #[default]
    Accurate,
}

impl FromStr for RecognitionLevel {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(RecognitionLevel::Fast),
            "accurate" => Ok(RecognitionLevel::Accurate),
            other => Err(OcrError::invalid_field(
                "recognition_level",
                "one of 'fast', 'accurate'",
                format!("'{other}'"),
            )),
        }
    }
}

/// Configuration for the OCR post-processing pipeline.
///
/// Supplied by the caller at engine construction; the pipeline itself never
/// loads configuration from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Reading-direction policy for the whole document.
    #[serde(default)]
    pub direction: DirectionPolicy,

    /// Language hints forwarded to the OCR capability, in preference order.
    /// Opaque to the pipeline. Default: `["ja", "en"]`.
    #[serde(default = "OcrConfig::default_languages")]
    pub languages: Vec<String>,

    /// Recognition quality hint forwarded to the OCR capability.
    #[serde(default)]
    pub recognition_level: RecognitionLevel,

    /// Batch execution policy.
    #[serde(default)]
    pub parallel: ParallelPolicy,

    /// Orientation detection settings.
    #[serde(default)]
    pub orientation: OrientationConfig,

    /// Line/column grouping settings.
    #[serde(default)]
    pub grouping: GroupingConfig,
}

impl OcrConfig {
    /// Creates a new OcrConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reading-direction policy.
    pub fn with_direction(mut self, direction: DirectionPolicy) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the language hints forwarded to the OCR capability.
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the recognition quality hint.
    pub fn with_recognition_level(mut self, level: RecognitionLevel) -> Self {
        self.recognition_level = level;
        self
    }

    /// Sets the batch execution policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the orientation detection settings.
    pub fn with_orientation(mut self, orientation: OrientationConfig) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the line/column grouping settings.
    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = grouping;
        self
    }

    /// Validates configuration values.
    ///
    /// Called by the engine builder; callers constructing configs from
    /// untrusted input may also call it directly.
    pub fn validate(&self) -> OcrResult<()> {
        if self.parallel.max_workers == 0 {
            return Err(OcrError::invalid_field(
                "parallel.max_workers",
                "at least 1",
                self.parallel.max_workers,
            ));
        }
        self.orientation.validate()?;
        self.grouping.validate()?;
        Ok(())
    }

    fn default_languages() -> Vec<String> {
        vec!["ja".to_string(), "en".to_string()]
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            direction: DirectionPolicy::default(),
            languages: Self::default_languages(),
            recognition_level: RecognitionLevel::default(),
            parallel: ParallelPolicy::default(),
            orientation: OrientationConfig::default(),
            grouping: GroupingConfig::default(),
        }
    }
}
