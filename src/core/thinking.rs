//! Splitting thinking-mode replies into reasoning and the visible answer.
//!
//! Reasoning models wrap their scratch work in tags such as `<think>`.
//! Streaming replies may also arrive with the opener already cut off
//! (only `</think>` present) or with the closer not yet received.

use serde::Serialize;

/// Tag pairs that delimit a reasoning block.
const REASONING_TAGS: &[(&str, &str)] = &[
    ("<think>", "</think>"),
    ("<thinking>", "</thinking>"),
    ("<thought>", "</thought>"),
    ("<reasoning>", "</reasoning>"),
];

/// A reply with its reasoning separated out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThinkingSplit {
    /// Reasoning blocks, trimmed and joined by blank lines. `None` if there were none.
    pub thoughts: Option<String>,
    /// Everything outside the reasoning blocks, trimmed.
    pub answer: String,
    /// False when a reasoning block was opened but never closed.
    pub complete: bool,
}

/// Earliest occurrence of any of `tags` in `haystack`: (byte offset, tag pair index).
fn earliest(haystack: &str, tags: impl Iterator<Item = &'static str>) -> Option<(usize, usize)> {
    tags.enumerate()
        .filter_map(|(i, tag)| haystack.find(tag).map(|pos| (pos, i)))
        .min()
}

/// Separate reasoning blocks from the answer in `raw`.
pub fn split_thinking(raw: &str) -> ThinkingSplit {
    let mut thoughts: Vec<&str> = Vec::new();
    let mut answer = String::new();
    let mut complete = true;
    let mut rest = raw;

    // A closer before any opener: the reply started mid-thought.
    let first_open = earliest(rest, REASONING_TAGS.iter().map(|t| t.0));
    let first_close = earliest(rest, REASONING_TAGS.iter().map(|t| t.1));
    if let Some((close_pos, i)) = first_close
        && first_open.is_none_or(|(open_pos, _)| close_pos < open_pos)
    {
        thoughts.push(&rest[..close_pos]);
        rest = &rest[close_pos + REASONING_TAGS[i].1.len()..];
    }

    while let Some((pos, i)) = earliest(rest, REASONING_TAGS.iter().map(|t| t.0)) {
        let (open, close) = REASONING_TAGS[i];
        answer.push_str(&rest[..pos]);
        let inner = &rest[pos + open.len()..];
        match inner.find(close) {
            Some(end) => {
                thoughts.push(&inner[..end]);
                rest = &inner[end + close.len()..];
            }
            None => {
                thoughts.push(inner);
                complete = false;
                rest = "";
                break;
            }
        }
    }
    answer.push_str(rest);

    let thoughts: Vec<&str> = thoughts
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    ThinkingSplit {
        thoughts: (!thoughts.is_empty()).then(|| thoughts.join("\n\n")),
        answer: answer.trim().to_string(),
        complete,
    }
}
