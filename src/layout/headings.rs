//! Heading classification from whole-document font statistics.
//!
//! Font sizes are tallied across the document once; sizes larger than the
//! body-text baseline become heading levels by rank. The resulting map is
//! immutable and cheap to query per span.

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::page::{PageContent, Span};

/// Maximum heading depth emitted.
const MAX_HEADING_LEVEL: usize = 6;

/// Spans longer than this never qualify for the all-caps promotion.
const ALL_CAPS_MAX_CHARS: usize = 48;

/// Round a font size to half-point precision, as an integer key.
fn size_key(size: f32) -> i32 {
    (size * 2.0).round() as i32
}

/// Occurrence counts per rounded font size.
///
/// Feed every span of the document (or a capped page subset) through
/// [`record`](Self::record), then build a [`HeadingLevelMap`].
#[derive(Debug, Clone, Default)]
pub struct FontSizeStats {
    histogram: HashMap<i32, usize>,
    total: usize,
}

impl FontSizeStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one font-size observation.
    pub fn record(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            *self.histogram.entry(size_key(size)).or_insert(0) += 1;
            self.total += 1;
        }
    }

    /// Record every horizontal span of a page.
    pub fn record_page(&mut self, page: &dyn PageContent) {
        for block in page.text_blocks() {
            for line in &block.lines {
                for span in &line.spans {
                    self.record(span.font_size);
                }
            }
        }
    }

    /// Total observations recorded.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The size key at the given occurrence-weighted percentile, walking
    /// sizes in ascending order. `None` when nothing was recorded.
    fn percentile_key(&self, percentile: f32) -> Option<i32> {
        if self.total == 0 {
            return None;
        }
        let mut keys: Vec<i32> = self.histogram.keys().copied().collect();
        keys.sort_unstable();

        let target = (self.total as f32 * percentile / 100.0).ceil() as usize;
        let target = target.clamp(1, self.total);

        let mut cumulative = 0usize;
        for key in &keys {
            cumulative += self.histogram[key];
            if cumulative >= target {
                return Some(*key);
            }
        }
        keys.last().copied()
    }
}

/// Read-only mapping from rounded font size to heading level.
///
/// 0 means body text. Larger qualifying sizes always map to a lower or
/// equal numeric level. Built once per document; safe to share across
/// pages (`Send + Sync`, no interior mutability).
#[derive(Debug, Clone, Default)]
pub struct HeadingLevelMap {
    levels: HashMap<i32, u8>,
    denied: Vec<i32>,
    use_font_weight: bool,
    use_all_caps: bool,
}

impl HeadingLevelMap {
    /// Build from recorded statistics and configuration.
    pub fn from_stats(stats: &FontSizeStats, config: &LayoutConfig) -> Self {
        let denied: Vec<i32> = config.header_size_denylist.iter().map(|s| size_key(*s)).collect();

        let baseline = stats.percentile_key(config.header_percentile_threshold);

        let mut candidates: Vec<i32> = Vec::new();
        if let Some(baseline) = baseline {
            for (key, count) in &stats.histogram {
                if *key > baseline && *count >= config.header_min_occurrences {
                    candidates.push(*key);
                }
            }
        }
        for size in &config.header_size_allowlist {
            let key = size_key(*size);
            if !candidates.contains(&key) {
                candidates.push(key);
            }
        }
        candidates.retain(|key| {
            if denied.contains(key) {
                log::debug!("heading size {} excluded by denylist", *key as f32 / 2.0);
                false
            } else {
                true
            }
        });

        // Largest size gets level 1
        candidates.sort_unstable_by(|a, b| b.cmp(a));

        let mut levels = HashMap::new();
        for (rank, key) in candidates.iter().enumerate() {
            let level = (rank + 1).min(MAX_HEADING_LEVEL) as u8;
            levels.insert(*key, level);
        }

        log::debug!(
            "heading map: baseline={:?}, {} heading sizes",
            baseline.map(|k| k as f32 / 2.0),
            levels.len()
        );

        Self {
            levels,
            denied,
            use_font_weight: config.header_use_font_weight,
            use_all_caps: config.header_use_all_caps,
        }
    }

    /// Build by scanning pages (honoring `max_scan_pages`).
    pub fn from_pages<P: PageContent>(pages: &[P], config: &LayoutConfig) -> Self {
        let mut stats = FontSizeStats::new();
        let limit = config.max_scan_pages.unwrap_or(pages.len());
        for page in pages.iter().take(limit) {
            stats.record_page(page);
        }
        Self::from_stats(&stats, config)
    }

    /// Heading level for a span: 0 for body text. O(1), never fails.
    pub fn level_for(&self, span: &Span) -> u8 {
        let key = size_key(span.font_size);
        if self.denied.contains(&key) {
            return 0;
        }

        let base = self.levels.get(&key).copied().unwrap_or(0);
        if base == 0 {
            return 0;
        }

        let promote = (self.use_font_weight && span.is_bold)
            || (self.use_all_caps && is_short_all_caps(&span.text));
        if promote {
            base.saturating_sub(1).max(1)
        } else {
            base
        }
    }

    /// Heading level for a bare font size, without promotion.
    pub fn level_for_size(&self, font_size: f32) -> u8 {
        let key = size_key(font_size);
        if self.denied.contains(&key) {
            return 0;
        }
        self.levels.get(&key).copied().unwrap_or(0)
    }

    /// Check if no sizes qualify as headings.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct heading sizes.
    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

/// Short, fully upper-case text (at least one letter, no lower-case ones).
fn is_short_all_caps(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > ALL_CAPS_MAX_CHARS {
        return false;
    }
    let mut saw_letter = false;
    for c in trimmed.chars() {
        if c.is_alphabetic() {
            saw_letter = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    saw_letter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn make_span(size: f32) -> Span {
        Span::new("text", Rect::new(0.0, 0.0, 50.0, size), size)
    }

    fn stats_with(sizes: &[(f32, usize)]) -> FontSizeStats {
        let mut stats = FontSizeStats::new();
        for (size, count) in sizes {
            for _ in 0..*count {
                stats.record(*size);
            }
        }
        stats
    }

    #[test]
    fn test_levels_by_rank() {
        let stats = stats_with(&[(12.0, 100), (18.0, 5), (24.0, 3)]);
        let map = HeadingLevelMap::from_stats(&stats, &LayoutConfig::default());

        assert_eq!(map.level_for(&make_span(24.0)), 1);
        assert_eq!(map.level_for(&make_span(18.0)), 2);
        assert_eq!(map.level_for(&make_span(12.0)), 0);
    }

    #[test]
    fn test_unknown_size_is_body() {
        let stats = stats_with(&[(12.0, 50), (18.0, 5)]);
        let map = HeadingLevelMap::from_stats(&stats, &LayoutConfig::default());
        assert_eq!(map.level_for(&make_span(9.0)), 0);
    }

    #[test]
    fn test_empty_document() {
        let map = HeadingLevelMap::from_stats(&FontSizeStats::new(), &LayoutConfig::default());
        assert!(map.is_empty());
        assert_eq!(map.level_for(&make_span(18.0)), 0);
    }

    #[test]
    fn test_min_occurrences_filters_rare_sizes() {
        let stats = stats_with(&[(12.0, 100), (18.0, 1)]);
        let config = LayoutConfig::default().with_min_occurrences(3);
        let map = HeadingLevelMap::from_stats(&stats, &config);
        assert_eq!(map.level_for(&make_span(18.0)), 0);
    }

    #[test]
    fn test_denylist_always_body() {
        let stats = stats_with(&[(12.0, 100), (18.0, 50)]);
        let config = LayoutConfig::default().with_size_denylist(vec![18.0]);
        let map = HeadingLevelMap::from_stats(&stats, &config);
        assert_eq!(map.level_for(&make_span(18.0)), 0);
    }

    #[test]
    fn test_allowlist_without_occurrences() {
        let stats = stats_with(&[(12.0, 100)]);
        let config = LayoutConfig::default()
            .with_min_occurrences(0)
            .with_size_allowlist(vec![30.0]);
        let map = HeadingLevelMap::from_stats(&stats, &config);
        assert!(map.level_for(&make_span(30.0)) >= 1);
    }

    #[test]
    fn test_allowlist_ranked_with_natural_sizes() {
        let stats = stats_with(&[(12.0, 100), (20.0, 5)]);
        let config = LayoutConfig::default().with_size_allowlist(vec![28.0]);
        let map = HeadingLevelMap::from_stats(&stats, &config);

        // 28 outranks 20
        assert_eq!(map.level_for(&make_span(28.0)), 1);
        assert_eq!(map.level_for(&make_span(20.0)), 2);
    }

    #[test]
    fn test_bold_promotion() {
        let stats = stats_with(&[(12.0, 100), (16.0, 5), (20.0, 5)]);
        let config = LayoutConfig::default().with_font_weight_promotion(true);
        let map = HeadingLevelMap::from_stats(&stats, &config);

        let regular = make_span(16.0);
        assert_eq!(map.level_for(&regular), 2);

        let mut bold = make_span(16.0);
        bold.is_bold = true;
        assert_eq!(map.level_for(&bold), 1);

        // Bold body text stays body text
        let mut bold_body = make_span(12.0);
        bold_body.is_bold = true;
        assert_eq!(map.level_for(&bold_body), 0);
    }

    #[test]
    fn test_all_caps_promotion() {
        let stats = stats_with(&[(12.0, 100), (16.0, 5), (20.0, 5)]);
        let config = LayoutConfig::default().with_all_caps_promotion(true);
        let map = HeadingLevelMap::from_stats(&stats, &config);

        let mut caps = make_span(16.0);
        caps.text = "OVERVIEW".into();
        assert_eq!(map.level_for(&caps), 1);

        let mut mixed = make_span(16.0);
        mixed.text = "Overview".into();
        assert_eq!(map.level_for(&mixed), 2);
    }

    #[test]
    fn test_level_never_below_one_after_promotion() {
        let stats = stats_with(&[(12.0, 100), (20.0, 5)]);
        let config = LayoutConfig::default().with_font_weight_promotion(true);
        let map = HeadingLevelMap::from_stats(&stats, &config);

        let mut bold_top = make_span(20.0);
        bold_top.is_bold = true;
        assert_eq!(map.level_for(&bold_top), 1);
    }

    #[test]
    fn test_level_cap() {
        let mut sizes: Vec<(f32, usize)> = vec![(10.0, 200)];
        for i in 0..9 {
            sizes.push((12.0 + i as f32 * 2.0, 5));
        }
        let stats = stats_with(&sizes);
        let map = HeadingLevelMap::from_stats(&stats, &LayoutConfig::default());

        // The smallest heading size bottoms out at level 6
        assert_eq!(map.level_for(&make_span(12.0)), 6);
        assert_eq!(map.level_for(&make_span(28.0)), 1);
    }

    #[test]
    fn test_is_short_all_caps() {
        assert!(is_short_all_caps("INTRODUCTION"));
        assert!(is_short_all_caps("PART 1"));
        assert!(!is_short_all_caps("Introduction"));
        assert!(!is_short_all_caps("1234"));
        assert!(!is_short_all_caps(""));

        let long: String = "A".repeat(ALL_CAPS_MAX_CHARS + 1);
        assert!(!is_short_all_caps(&long));
    }

    #[test]
    fn test_from_pages_scan_cap() {
        use crate::geometry::Rect;
        use crate::page::{Block, Line, StaticPage};

        let page_with_size = |size: f32| {
            StaticPage::new(Rect::new(0.0, 0.0, 612.0, 792.0)).with_block(Block::from_lines(
                vec![Line::from_spans(vec![Span::new(
                    "text",
                    Rect::new(50.0, 50.0, 150.0, 50.0 + size),
                    size,
                )])],
            ))
        };

        // The 30pt size only appears on the second page
        let pages = vec![page_with_size(12.0), page_with_size(30.0)];

        let config = LayoutConfig::default().with_min_occurrences(0);
        let full = HeadingLevelMap::from_pages(&pages, &config);
        assert!(full.level_for(&make_span(30.0)) >= 1);

        let capped_config = config.with_max_scan_pages(1);
        let capped = HeadingLevelMap::from_pages(&pages, &capped_config);
        assert_eq!(capped.level_for(&make_span(30.0)), 0);
    }

    #[test]
    fn test_percentile_baseline() {
        // 9pt captions dominate by count but the percentile is configurable
        let stats = stats_with(&[(9.0, 40), (12.0, 60)]);
        let config = LayoutConfig::default()
            .with_percentile_threshold(75.0)
            .with_min_occurrences(1);
        let map = HeadingLevelMap::from_stats(&stats, &config);

        // Baseline lands on 12pt, so 12pt is body
        assert_eq!(map.level_for(&make_span(12.0)), 0);
    }
}
