//! Markup matchers: fenced code, malformed double-backtick code, data-URI images.
//!
//! Each matcher scans the whole input on its own; overlaps between them are
//! settled later by the merge pass.

use std::sync::OnceLock;

use regex::Regex;

use super::{DEFAULT_LANGUAGE, Match, MatchKind, Origin};

type Matcher = fn(&str) -> Vec<Match>;

const MATCHERS: &[Matcher] = &[
    fenced_code,
    double_backtick_code,
    markdown_images,
    html_images,
];

/// Run every markup matcher over `text` and collect their matches.
pub(super) fn extract(text: &str) -> Vec<Match> {
    MATCHERS.iter().flat_map(|matcher| matcher(text)).collect()
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("markup pattern is valid"))
}

/// ```lang\n ... ``` (the tag must be followed by a newline, otherwise it is body).
fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?s)```(?:([\w+#.-]+)[ \t]*\r?\n|[ \t]*\r?\n?)(.*?)```",
    )
}

/// Language tag right after a malformed `` opener.
fn tag_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([\w+#.-]+)[ \t]*\r?\n")
}

fn markdown_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"!\[([^\]\n]*)\]\(\s*(data:image/[\w.+-]+;base64,[A-Za-z0-9+/=\s]+?)\s*\)",
    )
}

fn img_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)<img\b[^>]*>")
}

fn img_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r#"(?i)\ssrc\s*=\s*["'](data:image/[\w.+-]+;base64,[A-Za-z0-9+/=\s]+)["']"#,
    )
}

fn img_alt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)\salt\s*=\s*["']([^"']*)["']"#)
}

fn fenced_code(text: &str) -> Vec<Match> {
    fence_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            Some(Match::new(
                whole.range(),
                MatchKind::Code {
                    language: language.to_string(),
                },
                body.trim(),
                Origin::Markup,
            ))
        })
        .collect()
}

/// Models sometimes open a block with two backticks and close it with one.
/// Only an opener of exactly two backticks counts; longer runs are fences.
fn double_backtick_code(text: &str) -> Vec<Match> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(rel) = text[pos..].find("``") {
        let open = pos + rel;
        let run_end = backtick_run_end(bytes, open);
        let preceded = open > 0 && bytes[open - 1] == b'`';
        if preceded || run_end - open != 2 {
            pos = run_end;
            continue;
        }
        match double_backtick_block(text, open) {
            Ok(m) => {
                pos = m.end();
                found.push(m);
            }
            Err(resume) => pos = resume,
        }
    }
    found
}

fn backtick_run_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while bytes.get(end) == Some(&b'`') {
        end += 1;
    }
    end
}

/// On failure returns the offset to resume scanning from. A run of two or
/// more backticks before a single closer means `open` started an inline
/// ``span`` or the body would cross a fence, so scanning resumes past that run.
fn double_backtick_block(text: &str, open: usize) -> Result<Match, usize> {
    let after_open = open + 2;
    let (language, body_start) = match tag_line_re().captures(&text[after_open..]) {
        Some(caps) => {
            let tag = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
            (tag, after_open + caps.get(0).map_or(0, |m| m.end()))
        }
        None => (DEFAULT_LANGUAGE, after_open),
    };

    let Some(close) = text[body_start..].find('`').map(|p| p + body_start) else {
        return Err(text.len());
    };
    let run_end = backtick_run_end(text.as_bytes(), close);
    if run_end - close != 1 {
        return Err(run_end);
    }

    let body = text[body_start..close].trim();
    if body.is_empty() {
        return Err(run_end);
    }
    Ok(Match::new(
        open..close + 1,
        MatchKind::Code {
            language: language.to_string(),
        },
        body,
        Origin::Markup,
    ))
}

fn markdown_images(text: &str) -> Vec<Match> {
    markdown_image_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let alt = caps.get(1).map(|m| m.as_str().trim());
            let uri = compact_data_uri(caps.get(2)?.as_str());
            Some(image_match(whole.range(), alt, &uri))
        })
        .collect()
}

fn html_images(text: &str) -> Vec<Match> {
    img_tag_re()
        .find_iter(text)
        .filter_map(|tag| {
            let src = img_src_re().captures(tag.as_str())?.get(1)?;
            let alt = img_alt_re()
                .captures(tag.as_str())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim());
            let uri = compact_data_uri(src.as_str());
            Some(image_match(tag.range(), alt, &uri))
        })
        .collect()
}

fn image_match(span: std::ops::Range<usize>, alt: Option<&str>, uri: &str) -> Match {
    let alt_text = alt.filter(|a| !a.is_empty()).map(str::to_string);
    Match::new(span, MatchKind::Image { alt_text }, uri, Origin::Markup)
}

/// Long base64 payloads arrive wrapped across lines; drop the whitespace.
fn compact_data_uri(uri: &str) -> String {
    uri.chars().filter(|c| !c.is_whitespace()).collect()
}
