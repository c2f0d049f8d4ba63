//! # Reader OCR
//!
//! A text-direction-aware OCR post-processing pipeline for e-reader page
//! captures. Takes the unordered, spatially positioned text fragments an OCR
//! engine returns for each page and reassembles them into correctly ordered
//! lines, merged paragraphs, and a clean document, under both horizontal
//! (left-to-right) and vertical (top-to-bottom, right-to-left) reading
//! orders.
//!
//! The OCR engine itself is a black box behind the [`TextRecognizer`] trait:
//! anything that turns an image into positioned fragments can drive the
//! pipeline. Screen capture, PDF encoding, and storage are likewise external
//! collaborators.
//!
//! ## Components
//!
//! - **Orientation Detection**: classify a page's reading direction from
//!   fragment geometry, with a confidence score
//! - **Line/Column Grouping**: cluster fragments into reading-ordered lines
//!   or columns by positional proximity
//! - **Line Merging**: join a line's fragments with script-aware spacing
//!   cleanup for East-Asian text
//! - **Paragraph Merging**: collapse layout-driven line breaks into semantic
//!   paragraph breaks
//! - **Document Assembly**: order per-page results by page number, run
//!   batches sequentially or on a bounded worker pool
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, and the recognizer trait
//! * [`processors`] - The pure post-processing stages
//! * [`readerocr`] - The high-level engine and result types
//! * [`utils`] - Tracing setup and small helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use reader_ocr::prelude::*;
//!
//! # struct MyRecognizer;
//! # impl TextRecognizer for MyRecognizer {
//! #     fn recognize(
//! #         &self,
//! #         _: &image::RgbImage,
//! #         _: &RecognizeOptions<'_>,
//! #     ) -> OcrResult<Vec<Fragment>> {
//! #         Ok(Vec::new())
//! #     }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ReaderOcrBuilder::new(MyRecognizer)
//!     .config(OcrConfig::new().with_direction(DirectionPolicy::Auto))
//!     .build()?;
//!
//! let pages: Vec<(u32, image::RgbImage)> = vec![
//!     (1, image::RgbImage::new(1200, 1600)),
//!     (2, image::RgbImage::new(1200, 1600)),
//! ];
//! let document = engine.process_document(&pages)?;
//!
//! println!("failed pages: {}", document.failed_pages());
//! println!("{}", document.to_merged_text(engine.paragraph_merger()));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod processors;
pub mod readerocr;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{
        DirectionPolicy, ExecutionStrategy, OcrConfig, OcrError, OcrResult, ParallelPolicy,
        RecognitionLevel, RecognizeOptions, TextRecognizer,
    };
    pub use crate::processors::{
        BoundingBox, Fragment, GroupingConfig, Orientation, OrientationConfig,
        OrientationVerdict, ParagraphMerger, ParagraphRules,
    };
    pub use crate::readerocr::{DocumentResult, PageOutcome, ReaderOcr, ReaderOcrBuilder};
}
