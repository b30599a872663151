//! Reply segmentation: split a raw model reply into text, code, and image segments.
//!
//! Three passes: markup extraction, a heuristic fallback for replies whose
//! code lost its fences, then a merge that drops overlaps and fills the gaps
//! with text.

mod heuristic;
mod inline;
mod markup;
mod merge;

use std::ops::Range;

use serde::Serialize;

pub use inline::{InlinePiece, join_inline_code, split_inline_code};

/// Minimum trimmed length (in chars) for a heuristic code block.
pub const DEFAULT_MIN_HEURISTIC_LEN: usize = 30;

/// Language used when a code block carries no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

/// A classified, non-overlapping chunk of a reply.
///
/// `span` is the byte range of the input the segment was produced from,
/// including any fence or tag syntax that was stripped from `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text {
        content: String,
        span: Range<usize>,
    },
    Code {
        content: String,
        language: String,
        span: Range<usize>,
    },
    Image {
        /// `data:<mime>;base64,<payload>`
        content: String,
        alt_text: String,
        span: Range<usize>,
    },
}

impl Segment {
    pub fn content(&self) -> &str {
        match self {
            Segment::Text { content, .. }
            | Segment::Code { content, .. }
            | Segment::Image { content, .. } => content,
        }
    }

    pub fn span(&self) -> &Range<usize> {
        match self {
            Segment::Text { span, .. } | Segment::Code { span, .. } | Segment::Image { span, .. } => {
                span
            }
        }
    }

    /// Short lowercase name of the variant, matching the serialized `kind`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Segment::Text { .. } => "text",
            Segment::Code { .. } => "code",
            Segment::Image { .. } => "image",
        }
    }
}

/// Tuning knobs for [`segment_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Heuristic blocks shorter than this (trimmed, in chars) stay text.
    pub min_heuristic_len: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            min_heuristic_len: DEFAULT_MIN_HEURISTIC_LEN,
        }
    }
}

/// Where a match came from. Ordered so markup sorts first on equal offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Origin {
    Markup,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MatchKind {
    Code { language: String },
    Image { alt_text: Option<String> },
}

/// A candidate segment found during scanning, before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    pub start: usize,
    pub len: usize,
    pub kind: MatchKind,
    pub content: String,
    pub origin: Origin,
}

impl Match {
    pub fn new(span: Range<usize>, kind: MatchKind, content: &str, origin: Origin) -> Self {
        Self {
            start: span.start,
            len: span.end - span.start,
            kind,
            content: content.to_string(),
            origin,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, MatchKind::Code { .. })
    }
}

/// Segment `raw` with default options.
pub fn segment(raw: &str) -> Vec<Segment> {
    segment_with(raw, &SegmentOptions::default())
}

/// Segment `raw` into text, code, and image segments in input order.
///
/// Never fails: unmatched or malformed markup stays text. Empty or
/// whitespace-only input yields no segments.
pub fn segment_with(raw: &str, options: &SegmentOptions) -> Vec<Segment> {
    let mut matches = markup::extract(raw);

    if matches.iter().any(Match::is_code) {
        log::debug!("Fenced code present; skipping heuristic code detection");
    } else {
        let detected = heuristic::detect(raw, options.min_heuristic_len, &matches);
        if !detected.is_empty() {
            log::debug!("Heuristic detection found {} code block(s)", detected.len());
        }
        matches.extend(detected);
    }

    merge::materialize(raw, matches)
}

#[cfg(test)]
mod tests;
