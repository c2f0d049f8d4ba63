//! Result types produced by the pipeline: per-page outcomes and the
//! assembled document.

use crate::processors::paragraph::ParagraphMerger;
use crate::processors::orientation::OrientationVerdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The outcome of recognizing one page.
///
/// Failure is an explicit state, not a missing key: a failed page keeps its
/// page number in the document with empty text, so batch callers can count
/// and report failures instead of inferring them from logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "detail")]
pub enum PageOutcome {
    /// The page's merged text, possibly empty when OCR found nothing.
    Recognized(String),
    /// Recognition failed; carries the failure reason for diagnostics.
    Failed(String),
}

impl PageOutcome {
    /// The page's text. A failed page contributes an empty string.
    pub fn text(&self) -> &str {
        match self {
            PageOutcome::Recognized(text) => text,
            PageOutcome::Failed(_) => "",
        }
    }

    /// Returns true if recognition failed for this page.
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

/// The assembled output of a document run.
///
/// Rebuilt fully each run; pages are keyed by page number in a `BTreeMap`,
/// so iteration is always in page order regardless of the order in which
/// batch workers completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Per-page outcomes, keyed by page number (≥ 1).
    pub pages: BTreeMap<u32, PageOutcome>,
    /// The orientation verdict the whole document was processed under.
    pub orientation: OrientationVerdict,
}

impl DocumentResult {
    /// Creates a document result from collected page outcomes.
    pub fn new(pages: BTreeMap<u32, PageOutcome>, orientation: OrientationVerdict) -> Self {
        Self { pages, orientation }
    }

    /// Number of pages in the document, failed pages included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages whose recognition failed.
    pub fn failed_pages(&self) -> usize {
        self.pages.values().filter(|p| p.is_failed()).count()
    }

    /// Page-indexed text mapping, for collaborators that pair each page's
    /// text with its source image (an invisible PDF text layer, say).
    /// Failed pages map to empty strings.
    pub fn page_texts(&self) -> BTreeMap<u32, &str> {
        self.pages.iter().map(|(n, p)| (*n, p.text())).collect()
    }

    /// The simple document variant: non-empty trimmed page texts in page
    /// order, joined by a blank line. Failed and empty pages drop out.
    pub fn to_plain_text(&self) -> String {
        self.pages
            .values()
            .map(|p| p.text().trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The paragraph-merged document variant: every page's lines are
    /// concatenated in page order and merged as one stream, so a sentence
    /// split across a page turn is rejoined.
    pub fn to_merged_text(&self, merger: &ParagraphMerger) -> String {
        let lines: Vec<&str> = self
            .pages
            .values()
            .flat_map(|p| p.text().lines())
            .collect();
        merger.merge(&lines)
    }
}

impl fmt::Display for DocumentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "document: {} pages ({} failed), orientation {} (confidence {:.2})",
            self.page_count(),
            self.failed_pages(),
            self.orientation.orientation,
            self.orientation.confidence
        )?;
        for (number, outcome) in &self.pages {
            let status = if outcome.is_failed() { "failed" } else { "ok" };
            writeln!(f, "  page {number}: {status}, {} chars", outcome.text().chars().count())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(pages: &[(u32, PageOutcome)]) -> DocumentResult {
        DocumentResult::new(
            pages.iter().cloned().collect(),
            OrientationVerdict::horizontal_fallback(),
        )
    }

    #[test]
    fn test_failed_page_contributes_empty_text_but_keeps_its_key() {
        let doc = document(&[
            (1, PageOutcome::Recognized("一ページ".into())),
            (2, PageOutcome::Failed("engine crashed".into())),
            (3, PageOutcome::Recognized("三ページ".into())),
        ]);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.failed_pages(), 1);
        assert_eq!(doc.page_texts()[&2], "");
        assert_eq!(doc.to_plain_text(), "一ページ\n\n三ページ");
    }

    #[test]
    fn test_pages_iterate_in_page_order_regardless_of_insertion_order() {
        let doc = document(&[
            (3, PageOutcome::Recognized("c".into())),
            (1, PageOutcome::Recognized("a".into())),
            (2, PageOutcome::Recognized("b".into())),
        ]);
        assert_eq!(doc.to_plain_text(), "a\n\nb\n\nc");
    }

    #[test]
    fn test_empty_document() {
        let doc = document(&[]);
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.to_plain_text(), "");
        assert_eq!(doc.to_merged_text(&ParagraphMerger::default()), "");
    }

    #[test]
    fn test_merged_text_rejoins_sentences_across_page_turns() {
        let doc = document(&[
            (1, PageOutcome::Recognized("これは長い文章の\n途中で".into())),
            (2, PageOutcome::Recognized("ページが変わります。".into())),
        ]);
        assert_eq!(
            doc.to_merged_text(&ParagraphMerger::default()),
            "これは長い文章の途中でページが変わります。"
        );
    }

    #[test]
    fn test_whitespace_only_page_drops_out_of_plain_text() {
        let doc = document(&[
            (1, PageOutcome::Recognized("text".into())),
            (2, PageOutcome::Recognized("   \n".into())),
        ]);
        assert_eq!(doc.to_plain_text(), "text");
    }
}
