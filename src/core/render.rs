//! Printable forms of a segmented reply: JSON or a plain terminal listing.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

use crate::core::segment::{InlinePiece, Segment, split_inline_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Labeled blocks, text wrapped to the terminal width
    #[default]
    Text,
    /// Pretty-printed JSON array of segments
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Pretty JSON for any serializable value (segments, inline pieces, thinking split).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Split text into lines of max width (columns). Uses textwrap for correct UTF-8 handling.
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    textwrap::wrap(s, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Split a message into display lines respecting message newlines, then wrap to `width`.
pub fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.split('\n') {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_text(line, width));
        }
    }
    out
}

/// Payload size of a base64 data URI, in decoded bytes.
fn data_uri_bytes(uri: &str) -> usize {
    let payload = uri.split_once(',').map_or("", |(_, p)| p);
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

fn data_uri_mime(uri: &str) -> &str {
    uri.strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("image")
}

/// Inline `code` spans are shown between guillemets so they stand out
/// from the backticks of plain prose.
fn mark_inline_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in split_inline_code(text) {
        match piece {
            InlinePiece::Plain(s) => out.push_str(s),
            InlinePiece::Code(s) => {
                out.push('‹');
                out.push_str(s);
                out.push('›');
            }
        }
    }
    out
}

/// Render segments as labeled blocks for a terminal. Text is wrapped to
/// `width` with inline spans marked; code is printed verbatim; images are
/// summarized, not dumped.
pub fn render_text(segments: &[Segment], width: usize) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match seg {
            Segment::Text { content, .. } => {
                out.push_str("-- text --\n");
                for line in wrap_message(&mark_inline_code(content), width) {
                    let _ = writeln!(out, "{}", line);
                }
            }
            Segment::Code {
                content, language, ..
            } => {
                let _ = writeln!(out, "-- code ({}) --", language);
                let _ = writeln!(out, "{}", content);
            }
            Segment::Image {
                content, alt_text, ..
            } => {
                let _ = writeln!(out, "-- image: {} --", alt_text);
                let _ = writeln!(
                    out,
                    "{}, {} bytes",
                    data_uri_mime(content),
                    data_uri_bytes(content)
                );
            }
        }
    }
    out
}
