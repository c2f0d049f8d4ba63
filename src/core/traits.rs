//! Traits defining the seam between the pipeline and the OCR capability.
//!
//! The pipeline treats recognition as a black box: anything that can turn an
//! image into positioned text fragments can drive it, whether that is a
//! platform OCR service, a cloud API, or a mock in tests.

use crate::core::config::RecognitionLevel;
use crate::core::errors::OcrResult;
use crate::processors::Fragment;
use image::RgbImage;

/// Per-call hints the engine forwards from [`OcrConfig`](crate::core::config::OcrConfig)
/// to the recognizer. Backends ignore what they do not understand.
#[derive(Debug, Clone, Copy)]
pub struct RecognizeOptions<'a> {
    /// Language hints, in preference order.
    pub languages: &'a [String],
    /// Recognition quality hint.
    pub level: RecognitionLevel,
}

/// The OCR capability consumed by the pipeline.
///
/// Implementations return one [`Fragment`] per recognized text span, with a
/// confidence score and a bounding box in normalized `[0, 1]` coordinates
/// with the origin at the bottom-left of the image.
pub trait TextRecognizer {
    /// Recognizes text in an image.
    ///
    /// A failure here is never fatal to a batch run: the engine records the
    /// page as failed with empty text and continues.
    fn recognize(
        &self,
        image: &RgbImage,
        options: &RecognizeOptions<'_>,
    ) -> OcrResult<Vec<Fragment>>;

    /// Whether the backend tolerates concurrent invocation from multiple
    /// workers.
    ///
    /// Some platform OCR services are constrained to a single logical thread;
    /// returning `false` makes the engine fall back to strictly sequential,
    /// in-page-order batch execution regardless of the configured strategy.
    fn supports_concurrency(&self) -> bool {
        true
    }
}
