//! Collapsing layout-driven line breaks into semantic paragraph breaks.
//!
//! OCR breaks text wherever the original layout wrapped it, which is
//! typographic rather than semantic. The merger walks lines in order and
//! flushes the accumulated paragraph only at genuine structural boundaries:
//! sentence-ending full stops, headings, list items, and blank lines.
//! Everything else is re-joined into continuous prose.
//!
//! The flush heuristics are tuned for Japanese/English mixed prose and are
//! held as data in [`ParagraphRules`] so callers can extend them for other
//! scripts.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bullet characters that open a list item.
const DEFAULT_BULLET_MARKERS: &str = "●○■□◆◇▶▷‐-・※*";

/// Chapter and section headings, start-anchored so a numbered heading may
/// carry a trailing title ("第1章 はじめに").
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?x) ^第 [0-9０-９一二三四五六七八九十百千]+ [章節部]",
        r"(?xi) ^chapter \s+ \d+",
        r"(?x) ^(はじめに|目次|序章|終章|おわりに|あとがき|まえがき|付録|索引|参考文献)$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid built-in title pattern: {e}")))
    .collect()
});

/// Enumerated list markers: "1." "2)" "(3)" "（４）" "①" "a)".
static ENUMERATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?x) ^[0-9０-９]+ [.)．）\-]",
        r"(?x) ^[(（] [0-9０-９]+ [)）]",
        r"(?x) ^[①-⑳]",
        r"(?x) ^[a-zA-Z] [.)]",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid built-in enumeration pattern: {e}")))
    .collect()
});

/// The flush heuristics of the paragraph merger, extensible by the caller.
#[derive(Debug, Clone)]
pub struct ParagraphRules {
    title_patterns: Vec<Regex>,
    enumeration_patterns: Vec<Regex>,
    bullet_markers: String,
}

impl ParagraphRules {
    /// Adds a heading pattern. Heading lines always end a paragraph, and a
    /// heading on the next line ends the current one.
    pub fn with_title_pattern(mut self, pattern: Regex) -> Self {
        self.title_patterns.push(pattern);
        self
    }

    /// Adds an enumerated-marker pattern matched against the start of the
    /// next line.
    pub fn with_enumeration_pattern(mut self, pattern: Regex) -> Self {
        self.enumeration_patterns.push(pattern);
        self
    }

    /// Replaces the bullet marker character set.
    pub fn with_bullet_markers(mut self, markers: impl Into<String>) -> Self {
        self.bullet_markers = markers.into();
        self
    }

    /// Whether a line is a chapter or section heading.
    pub fn is_title(&self, line: &str) -> bool {
        self.title_patterns.iter().any(|p| p.is_match(line))
    }

    /// Whether a line opens a new structural block: a bullet item, an
    /// enumerated item, or a heading.
    pub fn starts_block(&self, line: &str) -> bool {
        if let Some(first) = line.chars().next()
            && self.bullet_markers.contains(first)
        {
            return true;
        }
        self.enumeration_patterns.iter().any(|p| p.is_match(line)) || self.is_title(line)
    }
}

impl Default for ParagraphRules {
    fn default() -> Self {
        Self {
            title_patterns: TITLE_PATTERNS.clone(),
            enumeration_patterns: ENUMERATION_PATTERNS.clone(),
            bullet_markers: DEFAULT_BULLET_MARKERS.to_string(),
        }
    }
}

/// Rebuilds paragraph-level text from layout-broken lines.
#[derive(Debug, Clone, Default)]
pub struct ParagraphMerger {
    rules: ParagraphRules,
}

impl ParagraphMerger {
    /// Creates a merger with the given rules.
    pub fn new(rules: ParagraphRules) -> Self {
        Self { rules }
    }

    /// Merges lines into paragraphs.
    ///
    /// Walks the lines in order, accumulating a paragraph buffer. After each
    /// line the buffer is flushed when, checked in order:
    ///
    /// 1. there is no next line,
    /// 2. the next line is blank,
    /// 3. the current line ends with the full stop "。",
    /// 4. the current line is a heading, or
    /// 5. the next line starts a structural block.
    ///
    /// Otherwise the next line is concatenated directly onto the buffer with
    /// no separator, re-joining sentences broken mid-line by the layout.
    /// Paragraphs are joined by a single newline, with no blank-line
    /// separation. Pure; empty input gives an empty string.
    pub fn merge<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for (i, line) in lines.iter().enumerate() {
            let current = line.as_ref().trim();
            if current.is_empty() {
                continue;
            }
            buffer.push_str(current);

            let flush = match lines.get(i + 1) {
                None => true,
                Some(next) => {
                    let next = next.as_ref().trim();
                    next.is_empty()
                        || current.ends_with('。')
                        || self.rules.is_title(current)
                        || self.rules.starts_block(next)
                }
            };
            if flush {
                paragraphs.push(std::mem::take(&mut buffer));
            }
        }
        if !buffer.is_empty() {
            paragraphs.push(buffer);
        }

        paragraphs.join("\n")
    }
}
