//! High-level pipeline API.
//!
//! This module provides the complete document pipeline: the [`ReaderOcr`]
//! engine built through [`ReaderOcrBuilder`], per-page outcomes, and the
//! assembled [`DocumentResult`].

pub mod engine;
pub mod result;

pub use engine::{ReaderOcr, ReaderOcrBuilder};
pub use result::{DocumentResult, PageOutcome};
