//! Pure post-processing stages between raw OCR output and document text.
//!
//! Every stage here is a synchronous, deterministic computation over
//! fragments or strings: orientation detection, line/column grouping,
//! line text merging, and paragraph merging. The [`crate::readerocr`]
//! engine wires them together.

pub mod grouping;
pub mod orientation;
pub mod paragraph;
pub mod spacing;
pub mod types;

pub use grouping::{GroupingConfig, LineGrouper};
pub use orientation::{Orientation, OrientationConfig, OrientationDetector, OrientationVerdict};
pub use paragraph::{ParagraphMerger, ParagraphRules};
pub use spacing::{collapse_east_asian_spaces, is_east_asian, merge_line};
pub use types::{BoundingBox, Fragment};
