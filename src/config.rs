//! Layout recovery configuration.
//!
//! Every heuristic threshold lives in one validated value struct instead of
//! scattered default arguments. Composers validate at construction time.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options controlling structure recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Percentile of the occurrence-weighted font-size distribution taken
    /// as the body-text baseline, in [0, 100]. With body text dominating,
    /// 50 picks the modal size.
    pub header_percentile_threshold: f32,

    /// Minimum occurrences a size needs before it can become a heading level
    pub header_min_occurrences: usize,

    /// Font sizes forced into the heading map regardless of frequency
    pub header_size_allowlist: Vec<f32>,

    /// Font sizes excluded from the heading map even when they qualify
    pub header_size_denylist: Vec<f32>,

    /// Promote bold spans one heading level relative to regular weight
    pub header_use_font_weight: bool,

    /// Promote short, fully upper-case spans one heading level
    pub header_use_all_caps: bool,

    /// Minimum horizontal gap (points) treated as a column boundary
    pub column_gap_threshold: f32,

    /// Upper bound on detected columns per region
    pub max_columns: usize,

    /// Use centroid clustering for column detection instead of the
    /// gap-histogram heuristic
    pub use_clustering: bool,

    /// Minimum overlap between a link box and a span box, as a percentage
    /// of the span's area, in [0, 100]
    pub link_overlap_threshold: f32,

    /// Minimum row count for a ruling-inferred table candidate
    pub min_table_rows: usize,

    /// Minimum column count for a ruling-inferred table candidate
    pub min_table_cols: usize,

    /// Vertical gap between lines, as a multiple of line height, that
    /// starts a new paragraph
    pub paragraph_gap_factor: f32,

    /// Separator emitted between consecutive pages; `{page_num}` expands to
    /// the 1-based number of the page that follows. Empty = no separator.
    pub page_separator_template: String,

    /// Emit rotated (non-horizontal) spans as a trailing paragraph per page
    /// instead of dropping them
    pub handle_rotated_text: bool,

    /// Cap on the number of pages scanned for font statistics
    /// (None = all pages)
    pub max_scan_pages: Option<usize>,

    /// Render pages in parallel (output order is unaffected)
    pub parallel: bool,
}

impl LayoutConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body-size percentile threshold.
    pub fn with_percentile_threshold(mut self, percentile: f32) -> Self {
        self.header_percentile_threshold = percentile;
        self
    }

    /// Set the minimum occurrences for heading sizes.
    pub fn with_min_occurrences(mut self, count: usize) -> Self {
        self.header_min_occurrences = count;
        self
    }

    /// Set the heading-size allowlist.
    pub fn with_size_allowlist(mut self, sizes: Vec<f32>) -> Self {
        self.header_size_allowlist = sizes;
        self
    }

    /// Set the heading-size denylist.
    pub fn with_size_denylist(mut self, sizes: Vec<f32>) -> Self {
        self.header_size_denylist = sizes;
        self
    }

    /// Enable or disable bold-weight heading promotion.
    pub fn with_font_weight_promotion(mut self, enabled: bool) -> Self {
        self.header_use_font_weight = enabled;
        self
    }

    /// Enable or disable all-caps heading promotion.
    pub fn with_all_caps_promotion(mut self, enabled: bool) -> Self {
        self.header_use_all_caps = enabled;
        self
    }

    /// Set the column gap threshold in points.
    pub fn with_column_gap_threshold(mut self, points: f32) -> Self {
        self.column_gap_threshold = points;
        self
    }

    /// Enable or disable clustering-based column detection.
    pub fn with_clustering(mut self, enabled: bool) -> Self {
        self.use_clustering = enabled;
        self
    }

    /// Set the link overlap threshold as a percentage of span area.
    pub fn with_link_overlap_threshold(mut self, percent: f32) -> Self {
        self.link_overlap_threshold = percent;
        self
    }

    /// Set the page separator template.
    pub fn with_page_separator(mut self, template: impl Into<String>) -> Self {
        self.page_separator_template = template.into();
        self
    }

    /// Enable or disable the rotated-text appendix.
    pub fn with_rotated_text(mut self, enabled: bool) -> Self {
        self.handle_rotated_text = enabled;
        self
    }

    /// Cap the pages scanned for font statistics.
    pub fn with_max_scan_pages(mut self, pages: usize) -> Self {
        self.max_scan_pages = Some(pages);
        self
    }

    /// Disable parallel page rendering.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check every threshold is within its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.header_percentile_threshold) {
            return Err(Error::InvalidConfig(format!(
                "header_percentile_threshold must be within 0..=100, got {}",
                self.header_percentile_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.link_overlap_threshold) {
            return Err(Error::InvalidConfig(format!(
                "link_overlap_threshold must be within 0..=100, got {}",
                self.link_overlap_threshold
            )));
        }
        if !self.column_gap_threshold.is_finite() || self.column_gap_threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "column_gap_threshold must be a positive number, got {}",
                self.column_gap_threshold
            )));
        }
        if self.max_columns == 0 {
            return Err(Error::InvalidConfig(
                "max_columns must be at least 1".into(),
            ));
        }
        if self.min_table_rows == 0 || self.min_table_cols == 0 {
            return Err(Error::InvalidConfig(
                "min_table_rows and min_table_cols must be at least 1".into(),
            ));
        }
        if !self.paragraph_gap_factor.is_finite() || self.paragraph_gap_factor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "paragraph_gap_factor must be a positive number, got {}",
                self.paragraph_gap_factor
            )));
        }
        for size in self
            .header_size_allowlist
            .iter()
            .chain(self.header_size_denylist.iter())
        {
            if !size.is_finite() || *size <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "heading size lists must contain positive sizes, got {}",
                    size
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_percentile_threshold: 50.0,
            header_min_occurrences: 3,
            header_size_allowlist: Vec::new(),
            header_size_denylist: Vec::new(),
            header_use_font_weight: false,
            header_use_all_caps: false,
            column_gap_threshold: 24.0,
            max_columns: 4,
            use_clustering: false,
            link_overlap_threshold: 50.0,
            min_table_rows: 2,
            min_table_cols: 1,
            paragraph_gap_factor: 1.5,
            page_separator_template: String::new(),
            handle_rotated_text: false,
            max_scan_pages: None,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LayoutConfig::new()
            .with_percentile_threshold(60.0)
            .with_min_occurrences(2)
            .with_column_gap_threshold(30.0)
            .with_clustering(true)
            .with_page_separator("--- page {page_num} ---")
            .sequential();

        assert_eq!(config.header_percentile_threshold, 60.0);
        assert_eq!(config.header_min_occurrences, 2);
        assert_eq!(config.column_gap_threshold, 30.0);
        assert!(config.use_clustering);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_percentile_out_of_range() {
        let config = LayoutConfig::new().with_percentile_threshold(101.0);
        assert!(config.validate().is_err());

        let config = LayoutConfig::new().with_percentile_threshold(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_gap_threshold() {
        let config = LayoutConfig::new().with_column_gap_threshold(0.0);
        assert!(config.validate().is_err());

        let config = LayoutConfig::new().with_column_gap_threshold(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_size_lists() {
        let config = LayoutConfig::new().with_size_allowlist(vec![18.0, -2.0]);
        assert!(config.validate().is_err());

        let config = LayoutConfig::new().with_size_denylist(vec![f32::INFINITY]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_columns_rejected() {
        let mut config = LayoutConfig::new();
        config.max_columns = 0;
        assert!(config.validate().is_err());
    }
}
