//! Overlap resolution and conversion of matches into segments.

use std::ops::Range;

use super::{Match, MatchKind, Segment};

/// True when the two half-open ranges share at least one byte.
pub(super) fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Sort by start offset (markup first on ties) and keep each match that
/// overlaps nothing accepted before it.
pub(super) fn dedupe(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_by_key(|m| (m.start, m.origin));
    let mut accepted: Vec<Match> = Vec::with_capacity(matches.len());
    for candidate in matches {
        let span = candidate.span();
        if accepted.iter().any(|a| overlaps(&a.span(), &span)) {
            log::debug!("Dropping overlapping {:?} match at {:?}", candidate.origin, span);
            continue;
        }
        accepted.push(candidate);
    }
    accepted
}

/// Build the final segment list: accepted matches in order, with trimmed text
/// for every gap that holds more than whitespace.
pub(super) fn materialize(text: &str, matches: Vec<Match>) -> Vec<Segment> {
    let accepted = dedupe(matches);
    let mut segments = Vec::with_capacity(accepted.len() * 2 + 1);
    let mut cursor = 0;
    let mut images = 0;

    for m in accepted {
        segments.extend(text_segment(text, cursor..m.start));
        cursor = m.end();
        let span = m.span();
        segments.push(match m.kind {
            MatchKind::Code { language } => Segment::Code {
                content: m.content,
                language,
                span,
            },
            MatchKind::Image { alt_text } => {
                images += 1;
                Segment::Image {
                    content: m.content,
                    alt_text: alt_text.unwrap_or_else(|| format!("Generated Image {}", images)),
                    span,
                }
            }
        });
    }

    segments.extend(text_segment(text, cursor..text.len()));
    segments
}

fn text_segment(text: &str, span: Range<usize>) -> Option<Segment> {
    let content = text[span.clone()].trim();
    (!content.is_empty()).then(|| Segment::Text {
        content: content.to_string(),
        span,
    })
}
