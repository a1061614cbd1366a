//! Table region recovery.
//!
//! The back-end's native table finder is trusted whenever it reports
//! anything. When it comes back empty, table regions are inferred from
//! vector ruling lines: axis-aligned segments are merged into rulings,
//! mutually intersecting rulings are grouped, and a group whose bounding
//! box is fenced on at least three sides becomes a candidate table.

use std::cmp::Ordering;

use crate::config::LayoutConfig;
use crate::geometry::Rect;
use crate::page::{Block, LineSegment, NativeTable, PageContent};

/// Segments within this much of axis-aligned count as rulings.
const AXIS_TOLERANCE: f32 = 2.0;

/// Segments shorter than this are decorative, not rulings.
const MIN_RULING_LENGTH: f32 = 8.0;

/// Distance within which parallel fragments merge into one ruling.
const MERGE_TOLERANCE: f32 = 3.0;

/// Slack allowed when testing whether two rulings intersect.
const INTERSECT_TOLERANCE: f32 = 3.0;

/// A ruling must span this fraction of a bbox edge to fence that side.
const EDGE_COVER_FRACTION: f32 = 0.7;

/// How a table region was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// Reported by the back-end's native table finder
    Native,
    /// Inferred from vector ruling lines
    RulingInferred,
}

/// A recovered table region on a page.
#[derive(Debug, Clone)]
pub struct TableRegion {
    /// Full table region
    pub bbox: Rect,
    /// Header-row region
    pub header_bbox: Rect,
    /// Where the region came from
    pub source: TableSource,
    /// Cell grid, present for native results
    pub grid: Option<Vec<Vec<String>>>,
    /// Horizontal lattice positions (row edges, ruling-inferred only)
    pub row_edges: Vec<f32>,
    /// Vertical lattice positions (column edges, ruling-inferred only)
    pub col_edges: Vec<f32>,
}

/// Recover the table regions of a page.
///
/// Uses the native result when non-empty, otherwise falls back to
/// ruling-line inference. Always returns regions sorted top to bottom;
/// an empty result is normal, never an error.
pub fn recover_tables(page: &dyn PageContent, config: &LayoutConfig) -> Vec<TableRegion> {
    let native = page.find_tables();
    let mut regions: Vec<TableRegion> = if !native.is_empty() {
        log::debug!("native table finder reported {} table(s)", native.len());
        native.into_iter().map(native_region).collect()
    } else {
        ruling_candidates(&page.drawings(), config)
            .into_iter()
            .map(|c| {
                let header_bbox = c.header_bbox();
                TableRegion {
                    bbox: c.bbox,
                    header_bbox,
                    source: TableSource::RulingInferred,
                    grid: None,
                    row_edges: c.row_edges,
                    col_edges: c.col_edges,
                }
            })
            .collect()
    };

    regions.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(Ordering::Equal)
    });
    regions
}

fn native_region(table: NativeTable) -> TableRegion {
    TableRegion {
        bbox: table.bbox,
        header_bbox: table.header_bbox,
        source: TableSource::Native,
        grid: Some(table.cells),
        row_edges: Vec::new(),
        col_edges: Vec::new(),
    }
}

/// Infer table regions from ruling lines.
///
/// Returns two parallel collections: table bounding boxes and inferred
/// header-row bounding boxes. No drawings, or no qualifying candidate,
/// yields two empty collections, never an error.
pub fn detect_tables_by_ruling_lines(
    segments: &[LineSegment],
    config: &LayoutConfig,
) -> (Vec<Rect>, Vec<Rect>) {
    let candidates = ruling_candidates(segments, config);
    let headers = candidates.iter().map(|c| c.header_bbox()).collect();
    let boxes = candidates.into_iter().map(|c| c.bbox).collect();
    (boxes, headers)
}

/// An axis-aligned ruling: fixed position on one axis, an extent on the other.
#[derive(Debug, Clone, Copy)]
struct Ruling {
    /// y for horizontal rulings, x for vertical ones
    pos: f32,
    lo: f32,
    hi: f32,
}

#[derive(Debug, Clone)]
struct Candidate {
    bbox: Rect,
    row_edges: Vec<f32>,
    col_edges: Vec<f32>,
}

impl Candidate {
    /// The band between the first two row edges.
    fn header_bbox(&self) -> Rect {
        if self.row_edges.len() >= 2 {
            Rect::new(self.bbox.x0, self.row_edges[0], self.bbox.x1, self.row_edges[1])
        } else {
            // Native-free degenerate case: take the top fifth of the region
            Rect::new(
                self.bbox.x0,
                self.bbox.y0,
                self.bbox.x1,
                self.bbox.y0 + self.bbox.height() * 0.2,
            )
        }
    }
}

fn ruling_candidates(segments: &[LineSegment], config: &LayoutConfig) -> Vec<Candidate> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut horizontal: Vec<Ruling> = Vec::new();
    let mut vertical: Vec<Ruling> = Vec::new();

    for seg in segments {
        let dx = (seg.end.x - seg.start.x).abs();
        let dy = (seg.end.y - seg.start.y).abs();
        if dy <= AXIS_TOLERANCE && dx >= MIN_RULING_LENGTH {
            horizontal.push(Ruling {
                pos: (seg.start.y + seg.end.y) / 2.0,
                lo: seg.start.x.min(seg.end.x),
                hi: seg.start.x.max(seg.end.x),
            });
        } else if dx <= AXIS_TOLERANCE && dy >= MIN_RULING_LENGTH {
            vertical.push(Ruling {
                pos: (seg.start.x + seg.end.x) / 2.0,
                lo: seg.start.y.min(seg.end.y),
                hi: seg.start.y.max(seg.end.y),
            });
        }
    }

    let horizontal = merge_collinear(horizontal);
    let vertical = merge_collinear(vertical);
    log::debug!(
        "rulings: {} horizontal, {} vertical",
        horizontal.len(),
        vertical.len()
    );

    if horizontal.is_empty() || vertical.is_empty() {
        return Vec::new();
    }

    let components = intersection_components(&horizontal, &vertical);

    let mut candidates: Vec<Candidate> = Vec::new();
    for (h_idx, v_idx) in components {
        let hs: Vec<Ruling> = h_idx.iter().map(|i| horizontal[*i]).collect();
        let vs: Vec<Ruling> = v_idx.iter().map(|i| vertical[*i]).collect();
        if let Some(candidate) = component_to_candidate(&hs, &vs, config) {
            candidates.push(candidate);
        }
    }

    merge_overlapping(candidates)
}

/// Merge fragments lying on the same line into single rulings.
fn merge_collinear(mut rulings: Vec<Ruling>) -> Vec<Ruling> {
    rulings.sort_by(|a, b| {
        a.pos
            .partial_cmp(&b.pos)
            .unwrap_or(Ordering::Equal)
            .then(a.lo.partial_cmp(&b.lo).unwrap_or(Ordering::Equal))
    });

    let mut merged: Vec<Ruling> = Vec::new();
    for ruling in rulings {
        match merged.last_mut() {
            Some(last)
                if (ruling.pos - last.pos).abs() <= MERGE_TOLERANCE
                    && ruling.lo <= last.hi + MERGE_TOLERANCE * 2.0 =>
            {
                last.hi = last.hi.max(ruling.hi);
            }
            _ => merged.push(ruling),
        }
    }
    merged
}

fn rulings_intersect(h: &Ruling, v: &Ruling) -> bool {
    v.pos >= h.lo - INTERSECT_TOLERANCE
        && v.pos <= h.hi + INTERSECT_TOLERANCE
        && h.pos >= v.lo - INTERSECT_TOLERANCE
        && h.pos <= v.hi + INTERSECT_TOLERANCE
}

/// Group rulings into connected components via intersection.
fn intersection_components(
    horizontal: &[Ruling],
    vertical: &[Ruling],
) -> Vec<(Vec<usize>, Vec<usize>)> {
    let h_count = horizontal.len();
    let total = h_count + vertical.len();
    let mut parent: Vec<usize> = (0..total).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        let mut walk = i;
        while parent[walk] != root {
            let next = parent[walk];
            parent[walk] = root;
            walk = next;
        }
        root
    }

    for (hi, h) in horizontal.iter().enumerate() {
        for (vi, v) in vertical.iter().enumerate() {
            if rulings_intersect(h, v) {
                let a = find(&mut parent, hi);
                let b = find(&mut parent, h_count + vi);
                parent[a] = b;
            }
        }
    }

    let mut groups: std::collections::HashMap<usize, (Vec<usize>, Vec<usize>)> =
        std::collections::HashMap::new();
    for i in 0..total {
        let root = find(&mut parent, i);
        let entry = groups.entry(root).or_default();
        if i < h_count {
            entry.0.push(i);
        } else {
            entry.1.push(i - h_count);
        }
    }

    groups
        .into_values()
        .filter(|(h, v)| !h.is_empty() && !v.is_empty())
        .collect()
}

fn component_to_candidate(hs: &[Ruling], vs: &[Ruling], config: &LayoutConfig) -> Option<Candidate> {
    let x0 = hs.iter().map(|r| r.lo).chain(vs.iter().map(|r| r.pos)).fold(f32::INFINITY, f32::min);
    let x1 = hs.iter().map(|r| r.hi).chain(vs.iter().map(|r| r.pos)).fold(f32::NEG_INFINITY, f32::max);
    let y0 = vs.iter().map(|r| r.lo).chain(hs.iter().map(|r| r.pos)).fold(f32::INFINITY, f32::min);
    let y1 = vs.iter().map(|r| r.hi).chain(hs.iter().map(|r| r.pos)).fold(f32::NEG_INFINITY, f32::max);
    let bbox = Rect::new(x0, y0, x1, y1);
    if bbox.is_degenerate() {
        return None;
    }

    let sides = fenced_sides(&bbox, hs, vs);
    if sides < 3 {
        log::debug!("ruling group fenced on {} side(s), skipping", sides);
        return None;
    }

    let rows = hs.len().saturating_sub(1);
    let cols = vs.len().saturating_sub(1);
    if rows < config.min_table_rows || cols < config.min_table_cols {
        log::debug!(
            "ruling group yields {}x{} cells, below minimum {}x{}",
            rows,
            cols,
            config.min_table_rows,
            config.min_table_cols
        );
        return None;
    }

    let mut row_edges: Vec<f32> = hs.iter().map(|r| r.pos).collect();
    row_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mut col_edges: Vec<f32> = vs.iter().map(|r| r.pos).collect();
    col_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Some(Candidate {
        bbox,
        row_edges,
        col_edges,
    })
}

/// Count how many edges of the bbox are fenced by a ruling spanning most
/// of that edge.
fn fenced_sides(bbox: &Rect, hs: &[Ruling], vs: &[Ruling]) -> usize {
    let needed_w = bbox.width() * EDGE_COVER_FRACTION;
    let needed_h = bbox.height() * EDGE_COVER_FRACTION;

    let covers_h = |target: f32| {
        hs.iter().any(|r| {
            (r.pos - target).abs() <= MERGE_TOLERANCE * 2.0 && (r.hi - r.lo) >= needed_w
        })
    };
    let covers_v = |target: f32| {
        vs.iter().any(|r| {
            (r.pos - target).abs() <= MERGE_TOLERANCE * 2.0 && (r.hi - r.lo) >= needed_h
        })
    };

    [
        covers_h(bbox.y0),
        covers_h(bbox.y1),
        covers_v(bbox.x0),
        covers_v(bbox.x1),
    ]
    .iter()
    .filter(|c| **c)
    .count()
}

/// Merge nested and overlapping candidates into one region each.
fn merge_overlapping(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    loop {
        let mut merged_any = false;
        let mut result: Vec<Candidate> = Vec::new();

        'outer: for candidate in candidates {
            for existing in result.iter_mut() {
                if existing.bbox.intersects(&candidate.bbox) {
                    existing.bbox = existing.bbox.union(&candidate.bbox);
                    existing.row_edges = merge_edges(&existing.row_edges, &candidate.row_edges);
                    existing.col_edges = merge_edges(&existing.col_edges, &candidate.col_edges);
                    merged_any = true;
                    continue 'outer;
                }
            }
            result.push(candidate);
        }

        candidates = result;
        if !merged_any {
            return candidates;
        }
    }
}

fn merge_edges(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut edges: Vec<f32> = a.iter().chain(b.iter()).copied().collect();
    edges.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    edges.dedup_by(|x, y| (*x - *y).abs() <= MERGE_TOLERANCE);
    edges
}

/// Build the cell grid for a region.
///
/// Native regions carry their grid; ruling-inferred regions slice the
/// blocks' spans into the ruling lattice, joining multiple spans per cell
/// with spaces.
pub fn grid_for_region(region: &TableRegion, blocks: &[Block]) -> Vec<Vec<String>> {
    if let Some(grid) = &region.grid {
        return grid.clone();
    }
    if region.row_edges.len() < 2 || region.col_edges.len() < 2 {
        return Vec::new();
    }

    let rows = region.row_edges.len() - 1;
    let cols = region.col_edges.len() - 1;
    let mut cells: Vec<Vec<Vec<&str>>> = vec![vec![Vec::new(); cols]; rows];

    for block in blocks {
        for line in &block.lines {
            for span in &line.spans {
                if !region.bbox.intersects(&span.bbox) {
                    continue;
                }
                let cx = span.bbox.center_x();
                let cy = span.bbox.center_y();
                let row = lattice_index(&region.row_edges, cy);
                let col = lattice_index(&region.col_edges, cx);
                if let (Some(row), Some(col)) = (row, col) {
                    cells[row][col].push(span.text.trim());
                }
            }
        }
    }

    cells
        .into_iter()
        .map(|row| row.into_iter().map(|texts| texts.join(" ")).collect())
        .collect()
}

/// Index of the lattice interval containing `value`, if any.
fn lattice_index(edges: &[f32], value: f32) -> Option<usize> {
    if edges.len() < 2 {
        return None;
    }
    for (i, pair) in edges.windows(2).enumerate() {
        if value >= pair[0] && value < pair[1] {
            return Some(i);
        }
    }
    // On or past the final edge still belongs to the last cell
    if value >= edges[edges.len() - 2] && value <= edges[edges.len() - 1] + MERGE_TOLERANCE {
        return Some(edges.len() - 2);
    }
    None
}
