//! The core module of the OCR post-processing pipeline.
//!
//! This module contains the fundamental components shared across the
//! pipeline:
//! - Configuration management
//! - Error handling
//! - The recognizer trait that connects the pipeline to an OCR backend
//!
//! It also re-exports commonly used types for convenience.

pub mod config;
pub mod errors;
pub mod traits;

pub use config::{
    DirectionPolicy, ExecutionStrategy, OcrConfig, ParallelPolicy, RecognitionLevel,
};
pub use errors::{OcrError, OcrResult};
pub use traits::{RecognizeOptions, TextRecognizer};
