//! Hyperlink-to-text attribution.
//!
//! Link annotations carry only a clickable rectangle and a URI; the text
//! they cover is estimated by proportional character mapping over the
//! span's horizontal extent. Not glyph-exact, but stable.

use std::cmp::Ordering;

use crate::model::Inline;
use crate::page::{LinkAnnotation, Span};

/// Attribute link annotations to substrings of a span.
///
/// A link qualifies when its rectangle covers at least `overlap_threshold`
/// percent of the span's area. Qualifying links resolve independently in
/// left-to-right order; text not covered by any link is preserved verbatim
/// between them. Returns `None` when no link qualifies, so the caller keeps
/// its plain text untouched.
pub fn resolve_links(
    links: &[LinkAnnotation],
    span: &Span,
    overlap_threshold: f32,
) -> Option<Vec<Inline>> {
    if span.text.is_empty() {
        return None;
    }

    let mut qualifying: Vec<&LinkAnnotation> = links
        .iter()
        .filter(|link| span.bbox.overlap_ratio(&link.bbox) * 100.0 >= overlap_threshold)
        .collect();
    if qualifying.is_empty() {
        return None;
    }
    qualifying.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(Ordering::Equal)
    });

    let chars: Vec<char> = span.text.chars().collect();
    let char_count = chars.len();
    let span_width = span.bbox.width();

    let mut parts: Vec<Inline> = Vec::new();
    let mut cursor = 0usize;

    for link in qualifying {
        let (start, end) = covered_char_range(span, link, char_count, span_width);
        let start = start.max(cursor);
        if end <= start {
            continue;
        }

        if start > cursor {
            parts.push(Inline::Text(chars[cursor..start].iter().collect()));
        }
        parts.push(Inline::Link {
            text: chars[start..end].iter().collect(),
            url: link.uri.clone(),
        });
        cursor = end;
    }

    if parts.is_empty() {
        return None;
    }
    if cursor < char_count {
        parts.push(Inline::Text(chars[cursor..].iter().collect()));
    }

    log::debug!(
        "span covered by {} link(s)",
        parts.iter().filter(|p| matches!(p, Inline::Link { .. })).count()
    );
    Some(parts)
}

/// Estimate the character range a link covers by linear interpolation of
/// horizontal position within the span.
fn covered_char_range(
    span: &Span,
    link: &LinkAnnotation,
    char_count: usize,
    span_width: f32,
) -> (usize, usize) {
    if span_width <= 0.0 {
        return (0, char_count);
    }

    let start_frac = ((link.bbox.x0 - span.bbox.x0) / span_width).clamp(0.0, 1.0);
    let end_frac = ((link.bbox.x1 - span.bbox.x0) / span_width).clamp(0.0, 1.0);

    let start = (start_frac * char_count as f32).floor() as usize;
    let end = (end_frac * char_count as f32).ceil() as usize;
    (start.min(char_count), end.min(char_count))
}
