//! Multi-column layout detection.
//!
//! Partitions the text blocks of a page region into left-to-right reading
//! columns. Detection is a total function: anything unclear degrades to a
//! single column containing every input block.

use std::cmp::Ordering;

use crate::config::LayoutConfig;
use crate::geometry::Rect;
use crate::page::Block;

/// Bucket width for matching column-boundary candidates across bands.
const BOUNDARY_BUCKET_PT: f32 = 12.0;

/// A block wider than this fraction of the region cannot share the region
/// with a sibling column.
const FULL_WIDTH_FRACTION: f32 = 0.6;

/// Iterations of the centroid refinement loop.
const CLUSTER_ROUNDS: usize = 16;

/// Partition blocks into reading columns, left to right.
///
/// Invariants: every input block appears in exactly one output column;
/// blocks within a column are non-decreasing in `y0`; degenerate input
/// (0 or 1 blocks, all-degenerate boxes) yields exactly one column. Never
/// panics, never errors.
pub fn detect_columns(blocks: Vec<Block>, region: Rect, config: &LayoutConfig) -> Vec<Vec<Block>> {
    if blocks.len() <= 1 {
        return vec![sorted_by_y(blocks)];
    }

    let widths: Vec<f32> = blocks
        .iter()
        .filter(|b| !b.bbox.is_degenerate())
        .map(|b| b.bbox.width())
        .collect();
    if widths.is_empty() {
        return vec![sorted_by_y(blocks)];
    }

    let region_width = region.width();
    if region_width > 0.0 && median(&widths) > region_width * FULL_WIDTH_FRACTION {
        log::debug!("median block width exceeds {:.0}% of region, single column", FULL_WIDTH_FRACTION * 100.0);
        return vec![sorted_by_y(blocks)];
    }

    let boundaries = if config.use_clustering {
        cluster_boundaries(&blocks, config)
    } else {
        histogram_boundaries(&blocks, config)
    };

    if boundaries.is_empty() {
        return vec![sorted_by_y(blocks)];
    }

    log::debug!("column boundaries at {:?}", boundaries);
    assign_to_columns(blocks, &boundaries)
}

/// Sort blocks by top edge, stably.
fn sorted_by_y(mut blocks: Vec<Block>) -> Vec<Block> {
    blocks.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(Ordering::Equal)
    });
    blocks
}

fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted[sorted.len() / 2]
}

/// Gap-histogram heuristic.
///
/// Blocks are grouped into vertical bands (overlapping y-extents share a
/// band); within each band, horizontal gaps wider than the configured
/// threshold nominate a boundary at the gap midpoint. A boundary that
/// recurs in at least two bands is accepted.
fn histogram_boundaries(blocks: &[Block], config: &LayoutConfig) -> Vec<f32> {
    let bands = vertical_bands(blocks);
    if bands.len() < 2 {
        return Vec::new();
    }

    // bucket -> (bands seen in, midpoint sum)
    let mut candidates: std::collections::HashMap<i32, (usize, f32)> =
        std::collections::HashMap::new();

    for band in &bands {
        let mut sorted: Vec<&Block> = band.iter().copied().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(Ordering::Equal)
        });

        let mut band_buckets: std::collections::HashSet<i32> = std::collections::HashSet::new();
        for pair in sorted.windows(2) {
            let gap = pair[1].bbox.x0 - pair[0].bbox.x1;
            if gap > config.column_gap_threshold {
                let midpoint = pair[0].bbox.x1 + gap / 2.0;
                let bucket = (midpoint / BOUNDARY_BUCKET_PT).round() as i32;
                if band_buckets.insert(bucket) {
                    let entry = candidates.entry(bucket).or_insert((0, 0.0));
                    entry.0 += 1;
                    entry.1 += midpoint;
                }
            }
        }
    }

    let mut recurring: Vec<(usize, f32)> = candidates
        .values()
        .filter(|(count, _)| *count >= 2)
        .map(|(count, sum)| (*count, sum / *count as f32))
        .collect();

    // Strongest boundaries first, capped at max_columns
    recurring.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)));
    recurring.truncate(config.max_columns.saturating_sub(1));

    let mut boundaries: Vec<f32> = recurring.into_iter().map(|(_, mid)| mid).collect();
    boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    boundaries
}

/// Group blocks into bands of overlapping vertical extent.
fn vertical_bands(blocks: &[Block]) -> Vec<Vec<&Block>> {
    let mut sorted: Vec<&Block> = blocks
        .iter()
        .filter(|b| !b.bbox.is_degenerate())
        .collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(Ordering::Equal)
    });

    let mut bands: Vec<Vec<&Block>> = Vec::new();
    let mut band_end = f32::NEG_INFINITY;

    for block in sorted {
        match bands.last_mut() {
            Some(band) if block.bbox.y0 < band_end => {
                band.push(block);
                band_end = band_end.max(block.bbox.y1);
            }
            _ => {
                bands.push(vec![block]);
                band_end = block.bbox.y1;
            }
        }
    }

    bands
}

/// Centroid-clustering path: deterministic 1-D k-means over block centers.
///
/// Tries k = 2..=max_columns and accepts the smallest k whose clusters are
/// tight (spread under half the gap threshold) and genuinely separated.
fn cluster_boundaries(blocks: &[Block], config: &LayoutConfig) -> Vec<f32> {
    if config.max_columns < 2 {
        return Vec::new();
    }
    let centers: Vec<f32> = blocks
        .iter()
        .filter(|b| !b.bbox.is_degenerate())
        .map(|b| b.bbox.center_x())
        .collect();
    if centers.len() < 2 {
        return Vec::new();
    }

    let min = centers.iter().copied().fold(f32::INFINITY, f32::min);
    let max = centers.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max - min < config.column_gap_threshold {
        return Vec::new();
    }

    let spread_limit = config.column_gap_threshold / 2.0;

    for k in 2..=config.max_columns {
        // Evenly spaced initial centroids keep the refinement deterministic
        let mut centroids: Vec<f32> = (0..k)
            .map(|i| min + (max - min) * (i as f32 + 0.5) / k as f32)
            .collect();

        let mut assignment = vec![0usize; centers.len()];
        for _ in 0..CLUSTER_ROUNDS {
            for (i, center) in centers.iter().enumerate() {
                assignment[i] = nearest_centroid(*center, &centroids);
            }
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<f32> = centers
                    .iter()
                    .zip(&assignment)
                    .filter(|(_, a)| **a == cluster)
                    .map(|(c, _)| *c)
                    .collect();
                if !members.is_empty() {
                    *centroid = members.iter().sum::<f32>() / members.len() as f32;
                }
            }
        }

        let mut spreads = vec![0.0f32; k];
        let mut populated = vec![false; k];
        for (center, cluster) in centers.iter().zip(&assignment) {
            spreads[*cluster] = spreads[*cluster].max((center - centroids[*cluster]).abs());
            populated[*cluster] = true;
        }
        if !populated.iter().all(|p| *p) {
            continue;
        }
        if spreads.iter().any(|s| *s > spread_limit) {
            continue;
        }

        let mut sorted_centroids = centroids.clone();
        sorted_centroids.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let separated = sorted_centroids
            .windows(2)
            .all(|pair| pair[1] - pair[0] >= config.column_gap_threshold);
        if !separated {
            continue;
        }

        log::debug!("clustering accepted k={}", k);
        return sorted_centroids
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect();
    }

    Vec::new()
}

fn nearest_centroid(center: f32, centroids: &[f32]) -> usize {
    let mut best = 0usize;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let dist = (center - c).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Assign each block to the column band containing its horizontal center;
/// degenerate boxes land in the first column.
fn assign_to_columns(blocks: Vec<Block>, boundaries: &[f32]) -> Vec<Vec<Block>> {
    let mut columns: Vec<Vec<Block>> = vec![Vec::new(); boundaries.len() + 1];

    for block in blocks {
        let index = if block.bbox.is_degenerate() {
            0
        } else {
            let center = block.bbox.center_x();
            boundaries.iter().filter(|b| center >= **b).count()
        };
        columns[index].push(block);
    }

    columns.retain(|c| !c.is_empty());
    if columns.is_empty() {
        return vec![Vec::new()];
    }

    columns.into_iter().map(sorted_by_y).collect()
}
