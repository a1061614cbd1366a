//! Page capability interface.
//!
//! Provides a trait-based interface for page content access, isolating the
//! concrete rendering back-end from the structure-recovery logic. Any
//! back-end that can populate these data shapes can drive this crate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};

/// A text span: a run of text sharing font, size, and writing direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Bounding box
    pub bbox: Rect,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
    /// Writing-direction unit vector; (1, 0) for horizontal text
    pub dir: Point,
}

impl Span {
    /// Create a horizontal span with regular weight.
    pub fn new(text: impl Into<String>, bbox: Rect, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            is_bold: false,
            is_italic: false,
            dir: Point::new(1.0, 0.0),
        }
    }

    /// Whether the span's writing direction is (near-)horizontal.
    ///
    /// Both left-to-right and right-to-left runs count as horizontal; only
    /// a significant vertical component makes a span rotated.
    pub fn is_horizontal(&self) -> bool {
        self.dir.y.abs() < 0.1
    }
}

/// A line of text: ordered spans sharing a baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// The spans in this line, in left-to-right order
    pub spans: Vec<Span>,
    /// Bounding box (union of span boxes)
    pub bbox: Rect,
}

impl Line {
    /// Create a line from spans, deriving the bounding box.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        let bbox = Rect::union_all(spans.iter().map(|s| &s.bbox)).unwrap_or_default();
        Self { spans, bbox }
    }
}

/// A text block: ordered lines forming one layout unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// The lines in this block, top to bottom
    pub lines: Vec<Line>,
    /// Bounding box (union of line boxes)
    pub bbox: Rect,
}

impl Block {
    /// Create a block from lines, deriving the bounding box.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let bbox = Rect::union_all(lines.iter().map(|l| &l.bbox)).unwrap_or_default();
        Self { lines, bbox }
    }
}

/// A vector line-drawing primitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    /// Create a segment between two points.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
        }
    }
}

/// A hyperlink annotation: a clickable region with a target URI.
/// Supplied by the page interface, never constructed or mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkAnnotation {
    /// Clickable region
    pub bbox: Rect,
    /// Target URI
    pub uri: String,
}

impl LinkAnnotation {
    /// Create a link annotation.
    pub fn new(bbox: Rect, uri: impl Into<String>) -> Self {
        Self {
            bbox,
            uri: uri.into(),
        }
    }
}

/// A table reported by the back-end's native table finder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeTable {
    /// Full table region
    pub bbox: Rect,
    /// Header-row region
    pub header_bbox: Rect,
    /// Cell grid, rows of cell texts; the first row is the header row
    pub cells: Vec<Vec<String>>,
}

/// Abstract interface for page content access.
///
/// Implementations expose the positioned primitives of one page. All
/// methods return owned snapshots; the recovery pipeline never mutates
/// page content.
pub trait PageContent {
    /// The page rectangle (content area).
    fn bounds(&self) -> Rect;

    /// Text blocks on the page, in back-end order.
    fn text_blocks(&self) -> Vec<Block>;

    /// Vector line-drawing primitives on the page.
    fn drawings(&self) -> Vec<LineSegment>;

    /// Hyperlink annotations on the page.
    fn link_annotations(&self) -> Vec<LinkAnnotation>;

    /// Native table-finder result; empty when the back-end found none.
    fn find_tables(&self) -> Vec<NativeTable>;
}

/// Validate the dynamically checkable part of the page contract.
///
/// The trait itself makes missing capabilities a compile error; what remains
/// checkable at runtime is the page rectangle being a usable region.
pub fn check_page_contract(page: &dyn PageContent) -> Result<()> {
    let bounds = page.bounds();
    if !bounds.is_finite() {
        return Err(Error::PageContract(
            "page bounds contain non-finite coordinates".into(),
        ));
    }
    if bounds.is_degenerate() {
        return Err(Error::PageContract(format!(
            "page bounds are degenerate: ({}, {}, {}, {})",
            bounds.x0, bounds.y0, bounds.x1, bounds.y1
        )));
    }
    Ok(())
}

/// In-memory [`PageContent`] implementation.
///
/// Useful for driving the pipeline from pre-extracted data and as the test
/// back-end.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    pub bounds: Rect,
    pub blocks: Vec<Block>,
    pub drawings: Vec<LineSegment>,
    pub links: Vec<LinkAnnotation>,
    pub tables: Vec<NativeTable>,
}

impl StaticPage {
    /// Create an empty page with the given bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Add a text block and return self.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add a drawing segment and return self.
    pub fn with_drawing(mut self, segment: LineSegment) -> Self {
        self.drawings.push(segment);
        self
    }

    /// Add a link annotation and return self.
    pub fn with_link(mut self, link: LinkAnnotation) -> Self {
        self.links.push(link);
        self
    }

    /// Add a native table result and return self.
    pub fn with_table(mut self, table: NativeTable) -> Self {
        self.tables.push(table);
        self
    }
}

impl PageContent for StaticPage {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn text_blocks(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    fn drawings(&self) -> Vec<LineSegment> {
        self.drawings.clone()
    }

    fn link_annotations(&self) -> Vec<LinkAnnotation> {
        self.links.clone()
    }

    fn find_tables(&self) -> Vec<NativeTable> {
        self.tables.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bbox_union() {
        let line = Line::from_spans(vec![
            Span::new("Hello", Rect::new(10.0, 100.0, 40.0, 112.0), 12.0),
            Span::new("world", Rect::new(45.0, 100.0, 80.0, 112.0), 12.0),
        ]);
        assert_eq!(line.bbox, Rect::new(10.0, 100.0, 80.0, 112.0));
    }

    #[test]
    fn test_block_bbox_union() {
        let block = Block::from_lines(vec![
            Line::from_spans(vec![Span::new(
                "a",
                Rect::new(10.0, 100.0, 40.0, 112.0),
                12.0,
            )]),
            Line::from_spans(vec![Span::new(
                "b",
                Rect::new(10.0, 115.0, 60.0, 127.0),
                12.0,
            )]),
        ]);
        assert_eq!(block.bbox, Rect::new(10.0, 100.0, 60.0, 127.0));
    }

    #[test]
    fn test_empty_line_bbox() {
        let line = Line::from_spans(vec![]);
        assert_eq!(line.bbox, Rect::default());
    }

    #[test]
    fn test_span_is_horizontal() {
        let mut span = Span::new("x", Rect::new(0.0, 0.0, 10.0, 10.0), 12.0);
        assert!(span.is_horizontal());

        span.dir = Point::new(0.0, 1.0);
        assert!(!span.is_horizontal());

        // Right-to-left is still horizontal
        span.dir = Point::new(-1.0, 0.0);
        assert!(span.is_horizontal());
    }

    #[test]
    fn test_page_contract_valid() {
        let page = StaticPage::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        assert!(check_page_contract(&page).is_ok());
    }

    #[test]
    fn test_page_contract_violations() {
        let degenerate = StaticPage::new(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(matches!(
            check_page_contract(&degenerate),
            Err(Error::PageContract(_))
        ));

        let non_finite = StaticPage::new(Rect::new(0.0, 0.0, f32::NAN, 792.0));
        assert!(matches!(
            check_page_contract(&non_finite),
            Err(Error::PageContract(_))
        ));
    }
}
