//! Core error types for the OCR post-processing pipeline.
//!
//! This module defines the error enum shared across the pipeline. The design
//! goal is that nothing in the per-page path is fatal: a recognition failure
//! is recovered into an explicit per-page outcome by the engine, and only
//! configuration problems and executor construction surface to the caller.

use thiserror::Error;

/// Errors that can occur in the OCR post-processing pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR capability failed to recognize an image.
    ///
    /// The batch engine recovers this into
    /// [`PageOutcome::Failed`](crate::readerocr::PageOutcome::Failed); it only
    /// reaches the caller from the single-page entry points.
    #[error("recognition failed: {message}")]
    Recognition {
        /// A message describing the recognition failure.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    InvalidConfig {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error building the worker pool for batch recognition.
    #[error("worker pool construction: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// A convenient result type for pipeline operations.
pub type OcrResult<T> = Result<T, OcrError>;

impl OcrError {
    /// Creates a recognition error from any displayable source.
    pub fn recognition(message: impl Into<String>) -> Self {
        Self::Recognition {
            message: message.into(),
        }
    }

    /// Creates a configuration error with context and details.
    pub fn invalid_config(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error for invalid field values.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidConfig {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual
            ),
        }
    }
}
