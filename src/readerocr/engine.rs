//! High-level pipeline engine and its builder.
//!
//! `ReaderOcr` wires the post-processing stages together around a
//! caller-supplied [`TextRecognizer`]: orientation is resolved once per
//! document, each page's fragments are grouped and merged into lines, and
//! the batch runs either sequentially or on a bounded worker pool.

use crate::core::config::{DirectionPolicy, ExecutionStrategy, OcrConfig};
use crate::core::errors::OcrResult;
use crate::core::traits::{RecognizeOptions, TextRecognizer};
use crate::processors::grouping::LineGrouper;
use crate::processors::orientation::{Orientation, OrientationDetector, OrientationVerdict};
use crate::processors::paragraph::{ParagraphMerger, ParagraphRules};
use crate::processors::spacing::merge_line;
use crate::processors::types::Fragment;
use crate::readerocr::result::{DocumentResult, PageOutcome};
use image::RgbImage;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builder for constructing [`ReaderOcr`] engines.
///
/// # Example
///
/// ```no_run
/// use reader_ocr::core::{DirectionPolicy, OcrConfig};
/// use reader_ocr::readerocr::ReaderOcrBuilder;
/// # use reader_ocr::core::{OcrResult, RecognizeOptions, TextRecognizer};
/// # use reader_ocr::processors::Fragment;
/// # struct MyRecognizer;
/// # impl TextRecognizer for MyRecognizer {
/// #     fn recognize(
/// #         &self,
/// #         _: &image::RgbImage,
/// #         _: &RecognizeOptions<'_>,
/// #     ) -> OcrResult<Vec<Fragment>> {
/// #         Ok(Vec::new())
/// #     }
/// # }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ReaderOcrBuilder::new(MyRecognizer)
///     .config(OcrConfig::new().with_direction(DirectionPolicy::Auto))
///     .build()?;
///
/// let pages: Vec<(u32, image::RgbImage)> = Vec::new();
/// let document = engine.process_document(&pages)?;
/// println!("{}", document.to_plain_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReaderOcrBuilder<R> {
    recognizer: R,
    config: OcrConfig,
    paragraph_rules: ParagraphRules,
}

impl<R: TextRecognizer> ReaderOcrBuilder<R> {
    /// Creates a builder around the recognizer that will drive the pipeline.
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            config: OcrConfig::default(),
            paragraph_rules: ParagraphRules::default(),
        }
    }

    /// Replaces the whole engine configuration.
    pub fn config(mut self, config: OcrConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the paragraph-merge rules used by [`ReaderOcr::paragraph_merger`].
    pub fn paragraph_rules(mut self, rules: ParagraphRules) -> Self {
        self.paragraph_rules = rules;
        self
    }

    /// Validates the configuration and builds the engine.
    pub fn build(self) -> OcrResult<ReaderOcr<R>> {
        self.config.validate()?;
        Ok(ReaderOcr {
            detector: OrientationDetector::new(self.config.orientation),
            grouper: LineGrouper::new(self.config.grouping),
            merger: ParagraphMerger::new(self.paragraph_rules),
            recognizer: self.recognizer,
            config: self.config,
        })
    }
}

/// The OCR post-processing engine.
///
/// Holds the recognizer, the validated configuration, and the processing
/// stages. All methods take `&self`; the engine is freely shared across
/// threads when the recognizer is.
#[derive(Debug)]
pub struct ReaderOcr<R> {
    recognizer: R,
    config: OcrConfig,
    detector: OrientationDetector,
    grouper: LineGrouper,
    merger: ParagraphMerger,
}

impl<R: TextRecognizer> ReaderOcr<R> {
    /// The engine's configuration.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// The paragraph merger built from the engine's rules, for use with
    /// [`DocumentResult::to_merged_text`].
    pub fn paragraph_merger(&self) -> &ParagraphMerger {
        &self.merger
    }

    fn options(&self) -> RecognizeOptions<'_> {
        RecognizeOptions {
            languages: &self.config.languages,
            level: self.config.recognition_level,
        }
    }

    /// Probes one page and classifies its reading direction.
    ///
    /// A recognition failure on the probe is recovered as the horizontal
    /// fallback verdict; orientation detection never blocks the pipeline.
    pub fn detect_orientation(&self, image: &RgbImage) -> OrientationVerdict {
        match self.recognizer.recognize(image, &self.options()) {
            Ok(fragments) => self.detector.detect(&fragments),
            Err(err) => {
                tracing::warn!(
                    target: "reader_ocr",
                    error = %err,
                    "orientation probe failed; defaulting to horizontal"
                );
                OrientationVerdict::horizontal_fallback()
            }
        }
    }

    /// Recognizes one page and merges its fragments into line-broken text.
    pub fn recognize_page(
        &self,
        image: &RgbImage,
        orientation: Orientation,
    ) -> OcrResult<String> {
        let fragments = self.recognizer.recognize(image, &self.options())?;
        Ok(self.compose_page_text(&fragments, orientation))
    }

    /// Groups fragments into reading order and merges each line, producing
    /// the page's text with one line per group.
    pub fn compose_page_text(&self, fragments: &[Fragment], orientation: Orientation) -> String {
        self.grouper
            .group(fragments, orientation)
            .iter()
            .map(|group| merge_line(group))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolves the document's orientation from the configured policy.
    ///
    /// A forced policy maps directly to a full-confidence verdict; `Auto`
    /// probes the lowest-numbered page. An empty batch has nothing to probe
    /// and gets the horizontal fallback.
    fn resolve_orientation(&self, pages: &[(u32, RgbImage)]) -> OrientationVerdict {
        let verdict = match self.config.direction {
            DirectionPolicy::Horizontal => OrientationVerdict::forced(Orientation::Horizontal),
            DirectionPolicy::Vertical => OrientationVerdict::forced(Orientation::Vertical),
            DirectionPolicy::Auto => match pages.iter().min_by_key(|(number, _)| *number) {
                Some((_, probe)) => self.detect_orientation(probe),
                None => OrientationVerdict::horizontal_fallback(),
            },
        };
        tracing::info!(
            target: "reader_ocr",
            orientation = %verdict.orientation,
            confidence = verdict.confidence,
            "document orientation resolved"
        );
        verdict
    }

    fn process_page(&self, number: u32, image: &RgbImage, orientation: Orientation) -> PageOutcome {
        match self.recognize_page(image, orientation) {
            Ok(text) => PageOutcome::Recognized(text),
            Err(err) => {
                tracing::warn!(
                    target: "reader_ocr",
                    page = number,
                    error = %err,
                    "page recognition failed"
                );
                PageOutcome::Failed(err.to_string())
            }
        }
    }
}

impl<R: TextRecognizer + Sync> ReaderOcr<R> {
    /// Processes a batch of numbered pages into a document.
    ///
    /// Orientation is resolved once and applied uniformly. Pages run
    /// concurrently on a bounded worker pool when the configured strategy
    /// and the recognizer both allow it; otherwise strictly sequentially in
    /// page order. Either way outcomes are keyed by page number, so the
    /// result is independent of completion order. A page's failure becomes a
    /// [`PageOutcome::Failed`] entry and never aborts the batch; the only
    /// errors surfaced here are worker-pool construction failures.
    pub fn process_document(&self, pages: &[(u32, RgbImage)]) -> OcrResult<DocumentResult> {
        let orientation = self.resolve_orientation(pages);
        let outcomes = self.run_batch(pages, orientation.orientation)?;
        let document = DocumentResult::new(outcomes, orientation);
        tracing::info!(
            target: "reader_ocr",
            pages = document.page_count(),
            failed = document.failed_pages(),
            "document processed"
        );
        Ok(document)
    }

    fn run_batch(
        &self,
        pages: &[(u32, RgbImage)],
        orientation: Orientation,
    ) -> OcrResult<BTreeMap<u32, PageOutcome>> {
        let sequential = self.config.parallel.strategy == ExecutionStrategy::Sequential
            || !self.recognizer.supports_concurrency();
        tracing::info!(
            target: "reader_ocr",
            pages = pages.len(),
            %orientation,
            sequential,
            "starting batch"
        );

        let total = pages.len();
        let completed = AtomicUsize::new(0);
        let run_one = |number: u32, image: &RgbImage| {
            let outcome = self.process_page(number, image, orientation);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(target: "reader_ocr", page = number, "{done}/{total} pages completed");
            (number, outcome)
        };

        if sequential {
            // In-page-order execution for recognizers constrained to a
            // single logical thread.
            let mut ordered: Vec<&(u32, RgbImage)> = pages.iter().collect();
            ordered.sort_by_key(|(number, _)| *number);
            Ok(ordered
                .into_iter()
                .map(|(number, image)| run_one(*number, image))
                .collect())
        } else {
            let pool = self.config.parallel.build_pool()?;
            Ok(pool.install(|| {
                pages
                    .par_iter()
                    .map(|(number, image)| run_one(*number, image))
                    .collect::<Vec<_>>()
            })
            .into_iter()
            .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ParallelPolicy;
    use crate::core::errors::OcrError;
    use crate::processors::types::BoundingBox;
    use std::collections::{HashMap, HashSet};

    /// Test recognizer keyed by image width: each width maps to a canned
    /// fragment list, and widths in the fail set error out.
    struct MockRecognizer {
        fragments_by_width: HashMap<u32, Vec<Fragment>>,
        fail_widths: HashSet<u32>,
        concurrent: bool,
    }

    impl MockRecognizer {
        fn new() -> Self {
            Self {
                fragments_by_width: HashMap::new(),
                fail_widths: HashSet::new(),
                concurrent: true,
            }
        }

        fn with_page(mut self, width: u32, texts: &[(&str, f32, f32)]) -> Self {
            let fragments = texts
                .iter()
                .map(|(text, x, y)| {
                    Fragment::new(*text, 0.9, BoundingBox::new(*x, *y, 0.1, 0.02))
                })
                .collect();
            self.fragments_by_width.insert(width, fragments);
            self
        }

        fn failing(mut self, width: u32) -> Self {
            self.fail_widths.insert(width);
            self
        }

        fn sequential_only(mut self) -> Self {
            self.concurrent = false;
            self
        }
    }

    impl TextRecognizer for MockRecognizer {
        fn recognize(
            &self,
            image: &RgbImage,
            _options: &RecognizeOptions<'_>,
        ) -> OcrResult<Vec<Fragment>> {
            let width = image.width();
            if self.fail_widths.contains(&width) {
                return Err(OcrError::recognition(format!("mock failure for width {width}")));
            }
            Ok(self
                .fragments_by_width
                .get(&width)
                .cloned()
                .unwrap_or_default())
        }

        fn supports_concurrency(&self) -> bool {
            self.concurrent
        }
    }

    fn page(number: u32, width: u32) -> (u32, RgbImage) {
        (number, RgbImage::new(width, 100))
    }

    fn engine(recognizer: MockRecognizer) -> ReaderOcr<MockRecognizer> {
        ReaderOcrBuilder::new(recognizer).build().unwrap()
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = OcrConfig::new()
            .with_parallel(ParallelPolicy::new().with_max_workers(0));
        let result = ReaderOcrBuilder::new(MockRecognizer::new())
            .config(config)
            .build();
        assert!(matches!(result, Err(OcrError::InvalidConfig { .. })));
    }

    #[test]
    fn test_page_text_joins_groups_with_newlines() {
        let recognizer = MockRecognizer::new().with_page(
            10,
            &[("second", 0.1, 0.7), ("Hello", 0.1, 0.9), ("world", 0.3, 0.9)],
        );
        let engine = engine(recognizer);
        let text = engine
            .recognize_page(&RgbImage::new(10, 100), Orientation::Horizontal)
            .unwrap();
        assert_eq!(text, "Helloworld\nsecond");
    }

    #[test]
    fn test_document_pages_ordered_regardless_of_submission_order() {
        let recognizer = MockRecognizer::new()
            .with_page(10, &[("one", 0.1, 0.9)])
            .with_page(20, &[("two", 0.1, 0.9)])
            .with_page(30, &[("three", 0.1, 0.9)]);
        let engine = engine(recognizer);

        // Pages submitted in reverse.
        let pages = vec![page(3, 30), page(2, 20), page(1, 10)];
        let document = engine.process_document(&pages).unwrap();
        assert_eq!(document.to_plain_text(), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_failed_page_contained_and_counted() {
        let recognizer = MockRecognizer::new()
            .with_page(10, &[("p1", 0.1, 0.9)])
            .with_page(20, &[("p2", 0.1, 0.9)])
            .with_page(40, &[("p4", 0.1, 0.9)])
            .with_page(50, &[("p5", 0.1, 0.9)])
            .failing(30);
        let engine = engine(recognizer);

        let pages: Vec<(u32, RgbImage)> =
            (1..=5).map(|n| page(n, n * 10)).collect();
        let document = engine.process_document(&pages).unwrap();

        assert_eq!(document.page_count(), 5);
        assert_eq!(document.failed_pages(), 1);
        assert!(document.pages[&3].is_failed());
        assert_eq!(document.to_plain_text(), "p1\n\np2\n\np4\n\np5");
    }

    #[test]
    fn test_empty_batch_produces_empty_document() {
        let engine = engine(MockRecognizer::new());
        let document = engine.process_document(&[]).unwrap();
        assert_eq!(document.page_count(), 0);
        assert_eq!(document.orientation, OrientationVerdict::horizontal_fallback());
        assert_eq!(document.to_plain_text(), "");
    }

    #[test]
    fn test_forced_direction_skips_probe() {
        // The probe page would fail; a forced policy never touches it.
        let recognizer = MockRecognizer::new()
            .failing(10)
            .with_page(20, &[("本", 0.5, 0.9)]);
        let config = OcrConfig::new().with_direction(DirectionPolicy::Vertical);
        let engine = ReaderOcrBuilder::new(recognizer)
            .config(config)
            .build()
            .unwrap();

        let pages = vec![page(1, 10), page(2, 20)];
        let document = engine.process_document(&pages).unwrap();
        assert_eq!(document.orientation, OrientationVerdict::forced(Orientation::Vertical));
        assert!(document.pages[&1].is_failed());
    }

    #[test]
    fn test_auto_policy_probes_lowest_numbered_page() {
        // Page 1 is a clearly vertical layout; page 2 is horizontal. Auto
        // must classify from page 1 even when it is listed last.
        let vertical: Vec<(String, f32, f32)> = (0..6)
            .map(|i| ("字".to_string(), 0.9 - 0.1 * i as f32, 0.9 - 0.1 * i as f32))
            .collect();
        let mut recognizer = MockRecognizer::new().with_page(20, &[("flat", 0.1, 0.9)]);
        recognizer.fragments_by_width.insert(
            10,
            vertical
                .iter()
                .map(|(t, x, y)| Fragment::new(t.clone(), 0.9, BoundingBox::new(*x, *y, 0.05, 0.1)))
                .collect(),
        );
        let engine = engine(recognizer);

        let pages = vec![page(2, 20), page(1, 10)];
        let document = engine.process_document(&pages).unwrap();
        assert_eq!(document.orientation.orientation, Orientation::Vertical);
        assert!(document.orientation.confidence > 0.5);
    }

    #[test]
    fn test_probe_failure_falls_back_to_horizontal() {
        let recognizer = MockRecognizer::new().failing(10);
        let engine = engine(recognizer);
        let verdict = engine.detect_orientation(&RgbImage::new(10, 100));
        assert_eq!(verdict, OrientationVerdict::horizontal_fallback());
    }

    #[test]
    fn test_sequential_fallback_when_recognizer_rejects_concurrency() {
        let recognizer = MockRecognizer::new()
            .with_page(10, &[("a", 0.1, 0.9)])
            .with_page(20, &[("b", 0.1, 0.9)])
            .sequential_only();
        let engine = engine(recognizer);

        let pages = vec![page(2, 20), page(1, 10)];
        let document = engine.process_document(&pages).unwrap();
        assert_eq!(document.to_plain_text(), "a\n\nb");
    }

    #[test]
    fn test_explicit_sequential_strategy() {
        let recognizer = MockRecognizer::new().with_page(10, &[("only", 0.1, 0.9)]);
        let config = OcrConfig::new().with_parallel(ParallelPolicy::sequential());
        let engine = ReaderOcrBuilder::new(recognizer)
            .config(config)
            .build()
            .unwrap();
        let document = engine.process_document(&[page(1, 10)]).unwrap();
        assert_eq!(document.to_plain_text(), "only");
    }

    #[test]
    fn test_empty_recognition_yields_empty_page_text() {
        let engine = engine(MockRecognizer::new());
        let document = engine.process_document(&[page(1, 10)]).unwrap();
        assert_eq!(document.pages[&1], PageOutcome::Recognized(String::new()));
        assert_eq!(document.to_plain_text(), "");
    }
}
