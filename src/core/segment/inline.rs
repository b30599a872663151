//! Inline code spans inside a text segment.

use serde::Serialize;

/// Piece of a text segment: plain text or the inside of a `code` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum InlinePiece<'a> {
    Plain(&'a str),
    Code(&'a str),
}

/// Split `text` on single-backtick spans, preserving order.
/// Empty spans (``) and an unmatched backtick stay in the plain text.
pub fn split_inline_code(text: &str) -> Vec<InlinePiece<'_>> {
    let mut pieces = Vec::new();
    let mut plain_start = 0;
    let mut search_from = 0;
    while let Some(open) = text[search_from..].find('`').map(|p| p + search_from) {
        let Some(close) = text[open + 1..].find('`').map(|p| p + open + 1) else {
            break;
        };
        if close == open + 1 {
            search_from = close + 1;
            continue;
        }
        if open > plain_start {
            pieces.push(InlinePiece::Plain(&text[plain_start..open]));
        }
        pieces.push(InlinePiece::Code(&text[open + 1..close]));
        plain_start = close + 1;
        search_from = plain_start;
    }
    if plain_start < text.len() {
        pieces.push(InlinePiece::Plain(&text[plain_start..]));
    }
    pieces
}

/// Inverse of [`split_inline_code`]: code pieces get their backticks back.
pub fn join_inline_code(pieces: &[InlinePiece<'_>]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            InlinePiece::Plain(s) => out.push_str(s),
            InlinePiece::Code(s) => {
                out.push('`');
                out.push_str(s);
                out.push('`');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_only() {
        assert_eq!(split_inline_code("hello"), [InlinePiece::Plain("hello")]);
    }

    #[test]
    fn split_empty() {
        assert!(split_inline_code("").is_empty());
    }

    #[test]
    fn split_alternates_plain_and_code() {
        assert_eq!(
            split_inline_code("Use `printf` and `puts`."),
            [
                InlinePiece::Plain("Use "),
                InlinePiece::Code("printf"),
                InlinePiece::Plain(" and "),
                InlinePiece::Code("puts"),
                InlinePiece::Plain("."),
            ]
        );
    }

    #[test]
    fn split_leading_code_span() {
        assert_eq!(
            split_inline_code("`x` wins"),
            [InlinePiece::Code("x"), InlinePiece::Plain(" wins")]
        );
    }

    #[test]
    fn split_unmatched_backtick_stays_plain() {
        assert_eq!(
            split_inline_code("a `b` c `d"),
            [
                InlinePiece::Plain("a "),
                InlinePiece::Code("b"),
                InlinePiece::Plain(" c `d"),
            ]
        );
    }

    #[test]
    fn split_empty_span_stays_plain() {
        assert_eq!(
            split_inline_code("a `` b `c`"),
            [InlinePiece::Plain("a `` b "), InlinePiece::Code("c")]
        );
    }

    #[test]
    fn join_reverses_split() {
        for text in [
            "",
            "plain",
            "Use `a` then `b`",
            "`lead` and trail `",
            "``empty`` and `multi\nline`",
            "unicode `ünï` ok",
        ] {
            assert_eq!(join_inline_code(&split_inline_code(text)), text);
        }
    }
}
