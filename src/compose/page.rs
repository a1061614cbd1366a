//! Per-page composition.
//!
//! Splits a page into a non-overlapping plan of text and table regions,
//! then walks each text region through column detection and line assembly
//! into document nodes, splicing table content in place.

use std::cmp::Ordering;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::layout::{
    detect_columns, grid_for_region, merge_hyphenated_text, recover_tables, resolve_links,
    HeadingLevelMap, TableRegion,
};
use crate::model::{DocumentBuilder, Inline, TableNode};
use crate::page::{check_page_contract, Block, Line, LinkAnnotation, PageContent, Span};

/// Inter-span gaps wider than this fraction of the font size get a space.
const SPAN_SPACE_FRACTION: f32 = 0.2;

/// What a region plan entry contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Free-flowing text, subject to column detection
    Text,
    /// A recovered table, by index into the page's table list
    Table(usize),
}

/// One entry of a page's region plan.
#[derive(Debug, Clone)]
pub struct Region {
    pub kind: RegionKind,
    pub bbox: Rect,
}

/// The ordered, non-overlapping partition of a page into text and table
/// regions, top to bottom.
#[derive(Debug, Clone, Default)]
pub struct RegionPlan {
    pub regions: Vec<Region>,
}

impl RegionPlan {
    /// Number of regions in the plan.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if the plan has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Composes the nodes of a single page.
///
/// Holds only shared read-only state; one composer can render many pages,
/// concurrently if the caller wishes.
pub struct PageComposer<'a> {
    config: &'a LayoutConfig,
    headings: &'a HeadingLevelMap,
}

impl<'a> PageComposer<'a> {
    /// Create a page composer. Fails on invalid configuration.
    pub fn new(config: &'a LayoutConfig, headings: &'a HeadingLevelMap) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, headings })
    }

    /// Compute the page's region plan: table regions recovered first, the
    /// remaining content area sliced into text slabs between them.
    pub fn plan_regions(
        &self,
        page: &dyn PageContent,
    ) -> Result<(RegionPlan, Vec<TableRegion>)> {
        check_page_contract(page)?;

        let bounds = page.bounds();
        let tables = recover_tables(page, self.config);

        let mut regions: Vec<Region> = Vec::new();
        let mut cursor = bounds.y0;

        for (index, table) in tables.iter().enumerate() {
            let top = table.bbox.y0.clamp(bounds.y0, bounds.y1);
            let bottom = table.bbox.y1.clamp(bounds.y0, bounds.y1);

            if top > cursor {
                regions.push(Region {
                    kind: RegionKind::Text,
                    bbox: Rect::new(bounds.x0, cursor, bounds.x1, top),
                });
            }
            // Overlapping native tables still get disjoint slabs
            let slab_top = top.max(cursor);
            let slab_bottom = bottom.max(slab_top);
            regions.push(Region {
                kind: RegionKind::Table(index),
                bbox: Rect::new(bounds.x0, slab_top, bounds.x1, slab_bottom),
            });
            cursor = cursor.max(slab_bottom);
        }

        if cursor < bounds.y1 {
            regions.push(Region {
                kind: RegionKind::Text,
                bbox: Rect::new(bounds.x0, cursor, bounds.x1, bounds.y1),
            });
        }

        log::debug!(
            "region plan: {} region(s), {} table(s)",
            regions.len(),
            tables.len()
        );
        Ok((RegionPlan { regions }, tables))
    }

    /// Render a page's nodes into the builder, following the region plan.
    pub fn render_page(
        &self,
        page: &dyn PageContent,
        plan: &RegionPlan,
        tables: &[TableRegion],
        builder: &mut DocumentBuilder,
    ) -> Result<()> {
        let blocks = page.text_blocks();
        let links = page.link_annotations();
        let mut rotated: Vec<String> = Vec::new();
        let mut first_text_region = true;

        for region in &plan.regions {
            match region.kind {
                RegionKind::Table(index) => {
                    if let Some(table) = tables.get(index) {
                        let grid = grid_for_region(table, &blocks);
                        builder.push_table(TableNode::from_grid(grid));
                    }
                }
                RegionKind::Text => {
                    self.render_text_region(
                        region.bbox,
                        &blocks,
                        &links,
                        first_text_region,
                        builder,
                        &mut rotated,
                    );
                    first_text_region = false;
                }
            }
        }

        if !rotated.is_empty() {
            if self.config.handle_rotated_text {
                builder.push_paragraph(vec![Inline::Text(rotated.join(" "))]);
            } else {
                log::debug!("dropped {} rotated span(s)", rotated.len());
            }
        }

        Ok(())
    }

    /// Render one text region: restrict blocks, detect columns, walk lines.
    ///
    /// Blocks with a degenerate bounding box cannot be placed spatially;
    /// they go into the first text region only.
    fn render_text_region(
        &self,
        region: Rect,
        blocks: &[Block],
        links: &[LinkAnnotation],
        include_degenerate: bool,
        builder: &mut DocumentBuilder,
        rotated: &mut Vec<String>,
    ) {
        let region_blocks: Vec<Block> = blocks
            .iter()
            .filter(|b| {
                if b.bbox.is_degenerate() {
                    include_degenerate
                } else {
                    region.contains_point(b.bbox.center_x(), b.bbox.center_y())
                }
            })
            .map(|b| strip_rotated(b, rotated))
            .filter(|b| !b.lines.is_empty())
            .collect();
        if region_blocks.is_empty() {
            return;
        }

        let columns = detect_columns(region_blocks, region, self.config);

        for column in columns {
            let mut lines: Vec<Line> = column.into_iter().flat_map(|b| b.lines).collect();
            lines.sort_by(|a, b| {
                a.bbox
                    .y0
                    .partial_cmp(&b.bbox.y0)
                    .unwrap_or(Ordering::Equal)
            });

            self.render_column(&lines, links, builder);
        }
    }

    /// Walk a column's lines top to bottom, emitting headings and
    /// accumulating paragraphs.
    fn render_column(
        &self,
        lines: &[Line],
        links: &[LinkAnnotation],
        builder: &mut DocumentBuilder,
    ) {
        let mut paragraph: Vec<Inline> = Vec::new();
        let mut prev_bbox: Option<Rect> = None;

        for line in lines {
            let content = self.line_inlines(line, links);
            if content.iter().all(|i| i.text().trim().is_empty()) {
                continue;
            }

            let level = self.classify_line(line);
            if level > 0 {
                flush_paragraph(&mut paragraph, builder);
                builder.push_heading(level, content);
                prev_bbox = None;
                continue;
            }

            if let Some(prev) = prev_bbox {
                let gap = line.bbox.y0 - prev.y1;
                let line_height = prev.height().max(line.bbox.height()).max(1.0);
                if gap > self.config.paragraph_gap_factor * line_height {
                    flush_paragraph(&mut paragraph, builder);
                }
            }

            if paragraph.is_empty() {
                paragraph = content;
            } else {
                join_line(&mut paragraph, content);
            }
            prev_bbox = Some(line.bbox);
        }

        flush_paragraph(&mut paragraph, builder);
    }

    /// Heading level of a line, from its dominant span (longest text,
    /// first on ties).
    fn classify_line(&self, line: &Line) -> u8 {
        let dominant = line
            .spans
            .iter()
            .max_by_key(|s| s.text.chars().count());
        match dominant {
            Some(span) => self.headings.level_for(span),
            None => 0,
        }
    }

    /// Concatenate a line's spans, applying link resolution and gap-based
    /// spacing.
    fn line_inlines(&self, line: &Line, links: &[LinkAnnotation]) -> Vec<Inline> {
        let mut spans: Vec<&Span> = line.spans.iter().collect();
        spans.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(Ordering::Equal)
        });

        let mut parts: Vec<Inline> = Vec::new();
        let mut prev: Option<&Span> = None;

        for span in spans {
            if let Some(prev) = prev {
                let gap = span.bbox.x0 - prev.bbox.x1;
                let needs_space = gap > span.font_size * SPAN_SPACE_FRACTION
                    && !prev.text.ends_with(' ')
                    && !span.text.starts_with(' ');
                if needs_space {
                    push_text(&mut parts, " ");
                }
            }

            match resolve_links(links, span, self.config.link_overlap_threshold) {
                Some(resolved) => {
                    for part in resolved {
                        match part {
                            Inline::Text(t) => push_text(&mut parts, &t),
                            link => parts.push(link),
                        }
                    }
                }
                None => push_text(&mut parts, &span.text),
            }
            prev = Some(span);
        }

        parts
    }
}

/// Copy a block, pulling non-horizontal spans out into the side channel.
fn strip_rotated(block: &Block, rotated: &mut Vec<String>) -> Block {
    let any_rotated = block
        .lines
        .iter()
        .any(|l| l.spans.iter().any(|s| !s.is_horizontal()));
    if !any_rotated {
        return block.clone();
    }

    let lines: Vec<Line> = block
        .lines
        .iter()
        .filter_map(|line| {
            let (kept, dropped): (Vec<Span>, Vec<Span>) = line
                .spans
                .iter()
                .cloned()
                .partition(|s| s.is_horizontal());
            rotated.extend(
                dropped
                    .into_iter()
                    .map(|s| s.text.trim().to_string())
                    .filter(|t| !t.is_empty()),
            );
            if kept.is_empty() {
                None
            } else {
                Some(Line::from_spans(kept))
            }
        })
        .collect();
    Block::from_lines(lines)
}

/// Append text, coalescing with a trailing text inline.
fn push_text(parts: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(existing)) = parts.last_mut() {
        existing.push_str(text);
    } else {
        parts.push(Inline::Text(text.to_string()));
    }
}

/// Join the next line's content onto an open paragraph, merging a wrapped
/// hyphen at the text boundary.
fn join_line(paragraph: &mut Vec<Inline>, next: Vec<Inline>) {
    let mut next = next.into_iter();
    let Some(first) = next.next() else {
        return;
    };

    let merged_into_tail = match (paragraph.last_mut(), &first) {
        (Some(Inline::Text(tail)), Inline::Text(head)) => {
            let (merged, _) = merge_hyphenated_text(tail, head);
            *tail = merged;
            true
        }
        _ => false,
    };

    if !merged_into_tail {
        push_text(paragraph, " ");
        match first {
            Inline::Text(text) => push_text(paragraph, &text),
            link => paragraph.push(link),
        }
    }

    paragraph.extend(next);
}

fn flush_paragraph(paragraph: &mut Vec<Inline>, builder: &mut DocumentBuilder) {
    if !paragraph.is_empty() {
        builder.push_paragraph(std::mem::take(paragraph));
    }
}
