//! # relayout
//!
//! Recovers logical document structure from the flat, position-only content
//! a PDF rendering back-end exposes per page.
//!
//! The input is a pile of positioned glyph runs, vector drawings, and link
//! annotations; the output is an ordered sequence of document-tree nodes
//! (headings, paragraphs, tables) that downstream renderers can re-emit as
//! Markdown, HTML, DOCX, and so on.
//!
//! ## Quick Start
//!
//! ```
//! use relayout::{compose_document, LayoutConfig, StaticPage};
//! use relayout::geometry::Rect;
//! use relayout::page::{Block, Line, Span};
//!
//! fn main() -> relayout::Result<()> {
//!     let page = StaticPage::new(Rect::new(0.0, 0.0, 612.0, 792.0)).with_block(
//!         Block::from_lines(vec![Line::from_spans(vec![Span::new(
//!             "Hello world",
//!             Rect::new(50.0, 50.0, 150.0, 62.0),
//!             12.0,
//!         )])]),
//!     );
//!
//!     let nodes = compose_document(&[page], LayoutConfig::default())?;
//!     assert_eq!(nodes.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading recovery**: font-size statistics over the whole document
//!   drive per-line heading levels
//! - **Column detection**: gap-histogram heuristic with an optional
//!   clustering path for jittery layouts
//! - **Table recovery**: native table-finder results trusted first, ruling
//!   lines as the fallback
//! - **Hyperlinks**: annotation rectangles attributed to span substrings
//! - **Hyphenation**: wrapped words merged across line boundaries
//! - **Parallel pages**: Rayon fan-out with stable output order
//!
//! Low-level PDF parsing is out of scope: any back-end implementing
//! [`page::PageContent`] can drive this crate.

pub mod compose;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod page;

// Re-export commonly used types
pub use compose::{DocumentComposer, PageComposer, Region, RegionKind, RegionPlan};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use layout::{
    detect_columns, detect_tables_by_ruling_lines, merge_hyphenated_text, resolve_links,
    FontSizeStats, HeadingLevelMap, TableRegion, TableSource,
};
pub use model::{DocumentBuilder, Inline, Node, TableCell, TableNode, TableRow};
pub use page::{LinkAnnotation, PageContent, StaticPage};

/// Compose a document's node sequence from its pages.
///
/// Builds the heading map, renders every page in index order, and joins
/// page outputs with the configured separator. A zero-page document yields
/// an empty sequence.
pub fn compose_document<P: PageContent + Sync>(
    pages: &[P],
    config: LayoutConfig,
) -> Result<Vec<Node>> {
    DocumentComposer::new(config)?.compose(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::page::{Block, Line, Span};

    #[test]
    fn test_compose_document_empty() {
        let pages: Vec<StaticPage> = Vec::new();
        let nodes = compose_document(&pages, LayoutConfig::default()).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_compose_document_single_paragraph() {
        let page = StaticPage::new(Rect::new(0.0, 0.0, 612.0, 792.0)).with_block(
            Block::from_lines(vec![Line::from_spans(vec![Span::new(
                "Hello world",
                Rect::new(50.0, 50.0, 150.0, 62.0),
                12.0,
            )])]),
        );
        let nodes = compose_document(&[page], LayoutConfig::default()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].plain_text(), "Hello world");
    }

    #[test]
    fn test_compose_document_invalid_config() {
        let pages: Vec<StaticPage> = Vec::new();
        let config = LayoutConfig::default().with_percentile_threshold(-5.0);
        assert!(compose_document(&pages, config).is_err());
    }
}
