//! Whole-document composition.

use rayon::prelude::*;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::HeadingLevelMap;
use crate::model::{DocumentBuilder, Node};
use crate::page::PageContent;

use super::page::PageComposer;

/// Composes an entire document from its pages.
///
/// Builds the heading map once over the whole document, renders every page
/// through [`PageComposer`], and joins the per-page sequences with the
/// configured separator. Page output order always matches page index order,
/// whether rendering runs sequentially or in parallel.
pub struct DocumentComposer {
    config: LayoutConfig,
}

impl DocumentComposer {
    /// Create a document composer. Fails on invalid configuration.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compose the ordered node sequence for a document.
    ///
    /// A document with zero pages (or zero spans) produces empty output,
    /// never an error.
    pub fn compose<P: PageContent + Sync>(&self, pages: &[P]) -> Result<Vec<Node>> {
        let headings = HeadingLevelMap::from_pages(pages, &self.config);
        let composer = PageComposer::new(&self.config, &headings)?;

        let page_nodes: Vec<Vec<Node>> = if self.config.parallel {
            pages
                .par_iter()
                .map(|page| render_one(&composer, page))
                .collect::<Result<Vec<_>>>()?
        } else {
            pages
                .iter()
                .map(|page| render_one(&composer, page))
                .collect::<Result<Vec<_>>>()?
        };

        let mut document = DocumentBuilder::new();
        for (index, nodes) in page_nodes.into_iter().enumerate() {
            if index > 0 {
                if let Some(separator) = self.page_separator(index + 1) {
                    document.push(separator);
                }
            }
            for node in nodes {
                document.push(node);
            }
        }

        log::debug!("composed {} page(s) into {} node(s)", pages.len(), document.len());
        Ok(document.finish())
    }

    /// The separator node preceding the given 1-based page number, if any.
    fn page_separator(&self, page_num: usize) -> Option<Node> {
        let template = &self.config.page_separator_template;
        if template.is_empty() {
            return None;
        }
        Some(Node::paragraph(
            template.replace("{page_num}", &page_num.to_string()),
        ))
    }
}

impl Default for DocumentComposer {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }
}

fn render_one<P: PageContent>(composer: &PageComposer<'_>, page: &P) -> Result<Vec<Node>> {
    let (plan, tables) = composer.plan_regions(page)?;
    let mut builder = DocumentBuilder::new();
    composer.render_page(page, &plan, &tables, &mut builder)?;
    Ok(builder.finish())
}
