//! Clustering fragments into reading lines or columns.
//!
//! OCR returns fragments in no particular order. The grouper partitions them
//! into lines (horizontal pages) or columns (vertical pages) by positional
//! proximity, and orders both the groups and their members into reading
//! order. Groups have no persistent identity: they exist only long enough
//! for the text merge to consume them.

use crate::core::errors::{OcrError, OcrResult};
use crate::processors::orientation::Orientation;
use crate::processors::types::Fragment;
use serde::{Deserialize, Serialize};

/// Proximity thresholds for line/column grouping, in normalized page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Maximum y distance from a line's reference fragment for a fragment to
    /// join that line (horizontal mode). Default: 0.025.
    #[serde(default = "GroupingConfig::default_line_break_threshold")]
    pub line_break_threshold: f32,

    /// Maximum x distance from a column's reference fragment for a fragment
    /// to join that column (vertical mode). Tighter than the line threshold
    /// because columns are narrower than lines in typical typography.
    /// Default: 0.02.
    #[serde(default = "GroupingConfig::default_column_break_threshold")]
    pub column_break_threshold: f32,
}

impl GroupingConfig {
    /// Validates configuration values.
    pub fn validate(&self) -> OcrResult<()> {
        for (field, value) in [
            ("grouping.line_break_threshold", self.line_break_threshold),
            ("grouping.column_break_threshold", self.column_break_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(OcrError::invalid_field(field, "a value in (0, 1]", value));
            }
        }
        Ok(())
    }

    fn default_line_break_threshold() -> f32 {
        0.025
    }

    fn default_column_break_threshold() -> f32 {
        0.02
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            line_break_threshold: Self::default_line_break_threshold(),
            column_break_threshold: Self::default_column_break_threshold(),
        }
    }
}

/// Partitions a page's fragments into ordered lines or columns.
#[derive(Debug, Clone, Default)]
pub struct LineGrouper {
    config: GroupingConfig,
}

impl LineGrouper {
    /// Creates a grouper with the given thresholds.
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Groups fragments into reading order for the given orientation.
    ///
    /// Horizontal: fragments are walked top to bottom; a fragment joins the
    /// current line while its y stays within the threshold of the line's
    /// FIRST member, and each finished line is ordered left to right.
    /// Vertical is symmetric on x with the reading direction reversed:
    /// rightmost column first, members top to bottom.
    ///
    /// Using the first member (not a running centroid) as the reference can
    /// drift on gradually sloping text; callers rely on this exact behavior,
    /// so it is kept rather than "fixed" with averaging.
    ///
    /// Pure geometric partition: empty input gives empty output, and a
    /// single fragment gives one group of one. Never fails.
    pub fn group<'a>(
        &self,
        fragments: &'a [Fragment],
        orientation: Orientation,
    ) -> Vec<Vec<&'a Fragment>> {
        match orientation {
            Orientation::Horizontal => self.group_horizontal(fragments),
            Orientation::Vertical => self.group_vertical(fragments),
        }
    }

    fn group_horizontal<'a>(&self, fragments: &'a [Fragment]) -> Vec<Vec<&'a Fragment>> {
        let mut sorted: Vec<&Fragment> = fragments.iter().collect();
        sorted.sort_by(|a, b| b.bounding_box.y.total_cmp(&a.bounding_box.y));

        let mut groups = split_by_proximity(sorted, self.config.line_break_threshold, |f| {
            f.bounding_box.y
        });
        for group in &mut groups {
            group.sort_by(|a, b| a.bounding_box.x.total_cmp(&b.bounding_box.x));
        }
        groups
    }

    fn group_vertical<'a>(&self, fragments: &'a [Fragment]) -> Vec<Vec<&'a Fragment>> {
        let mut sorted: Vec<&Fragment> = fragments.iter().collect();
        sorted.sort_by(|a, b| b.bounding_box.x.total_cmp(&a.bounding_box.x));

        let mut groups = split_by_proximity(sorted, self.config.column_break_threshold, |f| {
            f.bounding_box.x
        });
        for group in &mut groups {
            group.sort_by(|a, b| b.bounding_box.y.total_cmp(&a.bounding_box.y));
        }
        groups
    }
}

/// Walks fragments already sorted into group order and starts a new group
/// whenever the key coordinate moves more than `threshold` away from the
/// current group's first member.
fn split_by_proximity<'a>(
    sorted: Vec<&'a Fragment>,
    threshold: f32,
    key: impl Fn(&Fragment) -> f32,
) -> Vec<Vec<&'a Fragment>> {
    let mut groups: Vec<Vec<&Fragment>> = Vec::new();

    for fragment in sorted {
        match groups.last_mut() {
            Some(group) if (key(fragment) - key(group[0])).abs() <= threshold => {
                group.push(fragment);
            }
            _ => groups.push(vec![fragment]),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::types::BoundingBox;

    fn fragment(text: &str, x: f32, y: f32) -> Fragment {
        Fragment::new(text, 0.9, BoundingBox::new(x, y, 0.05, 0.02))
    }

    fn texts(group: &[&Fragment]) -> Vec<String> {
        group.iter().map(|f| f.text.clone()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let grouper = LineGrouper::default();
        assert!(grouper.group(&[], Orientation::Horizontal).is_empty());
        assert!(grouper.group(&[], Orientation::Vertical).is_empty());
    }

    #[test]
    fn test_single_fragment_yields_one_group_of_one() {
        let fragments = vec![fragment("a", 0.5, 0.5)];
        let groups = LineGrouper::default().group(&fragments, Orientation::Horizontal);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn test_horizontal_lines_grouped_top_to_bottom_left_to_right() {
        // Two lines; fragments supplied out of order.
        let fragments = vec![
            fragment("world", 0.4, 0.901),
            fragment("second", 0.1, 0.70),
            fragment("Hello", 0.1, 0.90),
            fragment("line", 0.3, 0.699),
        ];
        let groups = LineGrouper::default().group(&fragments, Orientation::Horizontal);
        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), vec!["Hello", "world"]);
        assert_eq!(texts(&groups[1]), vec!["second", "line"]);
    }

    #[test]
    fn test_horizontal_split_beyond_threshold() {
        // 0.03 apart in y: more than the 0.025 threshold, so two lines.
        let fragments = vec![fragment("a", 0.1, 0.90), fragment("b", 0.2, 0.87)];
        let groups = LineGrouper::default().group(&fragments, Orientation::Horizontal);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_vertical_columns_grouped_right_to_left_top_to_bottom() {
        let fragments = vec![
            fragment("た", 0.901, 0.5),
            fragment("し", 0.70, 0.9),
            fragment("わ", 0.90, 0.9),
            fragment("。", 0.699, 0.5),
        ];
        let groups = LineGrouper::default().group(&fragments, Orientation::Vertical);
        assert_eq!(groups.len(), 2);
        // Rightmost column first, read top to bottom.
        assert_eq!(texts(&groups[0]), vec!["わ", "た"]);
        assert_eq!(texts(&groups[1]), vec!["し", "。"]);
    }

    #[test]
    fn test_vertical_threshold_tighter_than_horizontal() {
        // 0.022 apart: within the horizontal threshold (0.025) but beyond
        // the vertical one (0.02).
        let fragments = vec![fragment("a", 0.5, 0.5), fragment("b", 0.522, 0.522)];
        let grouper = LineGrouper::default();
        assert_eq!(grouper.group(&fragments, Orientation::Vertical).len(), 2);
        assert_eq!(grouper.group(&fragments, Orientation::Horizontal).len(), 1);
    }

    #[test]
    fn test_reference_is_first_member_not_running_centroid() {
        // Gradually sloping line: each fragment within the threshold of its
        // neighbor, but the third drifts beyond the threshold of the FIRST.
        // The first-member reference splits here; a centroid would not.
        let fragments = vec![
            fragment("a", 0.1, 0.900),
            fragment("b", 0.2, 0.880),
            fragment("c", 0.3, 0.860),
        ];
        let groups = LineGrouper::default().group(&fragments, Orientation::Horizontal);
        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), vec!["a", "b"]);
        assert_eq!(texts(&groups[1]), vec!["c"]);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let fragments: Vec<Fragment> = (0..20)
            .map(|i| fragment("x", (i % 5) as f32 * 0.1, 0.9 - (i / 5) as f32 * 0.1))
            .collect();
        let grouper = LineGrouper::default();
        let first: Vec<Vec<String>> = grouper
            .group(&fragments, Orientation::Horizontal)
            .iter()
            .map(|g| texts(g))
            .collect();
        let second: Vec<Vec<String>> = grouper
            .group(&fragments, Orientation::Horizontal)
            .iter()
            .map(|g| texts(g))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_area_boxes_do_not_panic() {
        let degenerate = Fragment::new("", 0.0, BoundingBox::new(0.5, 0.5, 0.0, 0.0));
        let fragments = vec![degenerate, fragment("a", 0.5, 0.5)];
        let groups = LineGrouper::default().group(&fragments, Orientation::Vertical);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }
}
