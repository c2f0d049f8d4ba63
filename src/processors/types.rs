//! Data types shared by the post-processing stages.
//!
//! A page of OCR output is a flat list of [`Fragment`]s: one recognized text
//! span each, with a confidence score and a normalized bounding box. Every
//! stage downstream of recognition consumes fragments read-only.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in normalized image coordinates.
///
/// # Coordinate System
///
/// Coordinates are relative to the image dimensions, in `[0, 1]`, with the
/// **origin at the bottom-left** (the convention used by platform OCR
/// services on macOS). `y` grows upward: a fragment near the top of the page
/// has a `y` close to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge of the box.
    pub x: f32,
    /// Bottom edge of the box.
    pub y: f32,
    /// Width of the box.
    pub width: f32,
    /// Height of the box.
    pub height: f32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Whether the box is "tall": height exceeds width by more than the given
    /// aspect-ratio factor. Tall boxes are a signal of vertical script lines.
    pub fn is_tall(&self, aspect_ratio: f32) -> bool {
        self.height > self.width * aspect_ratio
    }
}

/// One OCR-recognized text span.
///
/// Produced by the external OCR capability; consumed read-only by every
/// post-processing stage. Degenerate boxes (zero width or height) are not
/// rejected: the geometric sorts tolerate them, at some cost to output
/// quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The recognized text.
    pub text: String,
    /// Confidence score in `[0, 1]` reported by the OCR capability.
    pub confidence: f32,
    /// Position of the span on the page.
    pub bounding_box: BoundingBox,
}

impl Fragment {
    /// Creates a new fragment.
    pub fn new(text: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounding_box,
        }
    }

    /// Returns true if the fragment carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
