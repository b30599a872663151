//! # reply-segmenter
//!
//! Turns a raw model reply into an ordered list of displayable segments:
//! plain text, code blocks, and inline images. Replies that lost their code
//! fences still get their C/shell code recognized by a line heuristic.
//!
//! Also ships the small helpers a chat front end needs around a reply:
//! thinking-block splitting and PCM-to-WAV wrapping for TTS audio.

pub mod core;

pub use crate::core::segment::{
    InlinePiece, Segment, SegmentOptions, join_inline_code, segment, segment_with,
    split_inline_code,
};
pub use crate::core::thinking::{ThinkingSplit, split_thinking};
pub use crate::core::wav::{PcmFormat, WavError, pcm_to_wav};
