//! Fallback code detection for replies whose code lost its fences.
//!
//! Lines are classified against small rule tables. Only C-like sources and
//! shell/build commands are recognized; Python and friends slip through.

use std::ops::Range;
use std::sync::OnceLock;

use regex::RegexSet;

use super::merge::overlaps;
use super::{Match, MatchKind, Origin};

/// A named line-shape predicate, matched against the trimmed line.
struct LineRule {
    name: &'static str,
    pattern: &'static str,
}

/// Lines that on their own start a C-like block.
const TRIGGER_RULES: &[LineRule] = &[
    LineRule {
        name: "preprocessor",
        pattern: r"^#\s*(include|define|undef|ifdef|ifndef|if|elif|else|endif|pragma)\b",
    },
    LineRule {
        name: "function-signature",
        pattern: r"^((static|inline|extern|const|unsigned|signed)\s+)*(void|int|char|short|long|float|double|bool|size_t|struct\s+\w+)[\s*]+\w+\s*\([^;]*\)\s*\{?$",
    },
    LineRule {
        name: "control-flow",
        pattern: r"^(\}\s*)?(if|else\s+if|for|while|switch)\s*\(.*\)\s*\{?$",
    },
    LineRule {
        name: "declaration",
        pattern: r"^((static|const|unsigned|signed)\s+)*(int|char|short|long|float|double|bool|size_t|struct\s+\w+)[\s*]+\w+(\[[^\]]*\])?\s*(=[^;]*)?;$",
    },
    LineRule {
        name: "return",
        pattern: r"^return\b[^;]*;$",
    },
    LineRule {
        name: "jump",
        pattern: r"^(break|continue);$",
    },
    LineRule {
        name: "case-label",
        pattern: r"^(case\s+[^:]+|default)\s*:$",
    },
    LineRule {
        name: "call-statement",
        pattern: r"^[A-Za-z_][\w.]*(->\w+)*\s*\(.*\)\s*;$",
    },
];

/// Lines that keep a block going once it has started.
const CONTINUATION_RULES: &[LineRule] = &[
    LineRule {
        name: "brace",
        pattern: r"^\}",
    },
    LineRule {
        name: "brace-end",
        pattern: r"[{}][;,]?$",
    },
    LineRule {
        name: "statement-end",
        pattern: r";$",
    },
    LineRule {
        name: "comment",
        pattern: r"^(//|/\*|\*)",
    },
    LineRule {
        name: "else",
        pattern: r"^else\b",
    },
];

/// Explanatory prose; ends a block.
const PROSE_RULES: &[LineRule] = &[
    LineRule {
        name: "sentence-opener",
        pattern: r"^(Here|To|This|That|The|These|Note|Now|Then|First|Next|Finally|You|We|It|In|When|Output|Explanation|Example|Compile|Run)\b",
    },
    LineRule {
        name: "label",
        pattern: r"^[A-Z][\w ]*:$",
    },
    LineRule {
        name: "numbered-list",
        pattern: r"^\d+[.)]\s",
    },
    LineRule {
        name: "bullet",
        pattern: r"^[-•]\s",
    },
];

/// Shell prompts and compiler/build invocations.
const SHELL_RULES: &[LineRule] = &[
    LineRule {
        name: "prompt",
        pattern: r"^\$\s+\S",
    },
    LineRule {
        name: "local-binary",
        pattern: r"^\./[\w./-]+",
    },
    LineRule {
        name: "compiler",
        pattern: r"^(gcc|g\+\+|cc|clang|clang\+\+|make|cmake|ninja)(\s|$)",
    },
];

struct RuleTable {
    rules: &'static [LineRule],
    set: RegexSet,
}

impl RuleTable {
    fn compile(rules: &'static [LineRule]) -> Self {
        let set = RegexSet::new(rules.iter().map(|r| r.pattern)).expect("line rules are valid");
        Self { rules, set }
    }

    /// Name of the first rule matching `line`, in table order.
    fn first_match(&self, line: &str) -> Option<&'static str> {
        self.set
            .matches(line)
            .iter()
            .next()
            .map(|i| self.rules[i].name)
    }
}

fn table(cell: &'static OnceLock<RuleTable>, rules: &'static [LineRule]) -> &'static RuleTable {
    cell.get_or_init(|| RuleTable::compile(rules))
}

fn triggers() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    table(&TABLE, TRIGGER_RULES)
}

fn continuations() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    table(&TABLE, CONTINUATION_RULES)
}

fn prose() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    table(&TABLE, PROSE_RULES)
}

fn shell() -> &'static RuleTable {
    static TABLE: OnceLock<RuleTable> = OnceLock::new();
    table(&TABLE, SHELL_RULES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    Trigger(&'static str),
    Continuation,
    Prose,
    Blank,
    Other,
}

impl LineClass {
    fn is_code(self) -> bool {
        matches!(self, LineClass::Trigger(_) | LineClass::Continuation)
    }
}

fn classify(line: &str) -> LineClass {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineClass::Blank
    } else if prose().first_match(trimmed).is_some() {
        LineClass::Prose
    } else if let Some(rule) = triggers().first_match(trimmed) {
        LineClass::Trigger(rule)
    } else if continuations().first_match(trimmed).is_some() {
        LineClass::Continuation
    } else {
        LineClass::Other
    }
}

/// One input line with its byte range, line terminator excluded.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    start: usize,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

fn lines(text: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        out.push(Line { text: line, start });
        start += raw.len();
    }
    out
}

/// Line-index ranges of C-like blocks: each trigger grown over adjacent code lines.
fn c_blocks(classes: &[LineClass]) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < classes.len() {
        let LineClass::Trigger(rule) = classes[i] else {
            i += 1;
            continue;
        };
        let mut first = i;
        while first > 0 && classes[first - 1].is_code() {
            first -= 1;
        }
        let mut last = i;
        while last + 1 < classes.len() && classes[last + 1].is_code() {
            last += 1;
        }
        log::debug!("Code-like line {} ({}) grew to lines {}..={}", i, rule, first, last);
        blocks.push(first..last + 1);
        i = last + 1;
    }
    blocks
}

/// Line-index ranges of consecutive shell/build invocation lines.
fn shell_blocks(lines: &[Line<'_>]) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        let is_shell = shell().first_match(line.text.trim()).is_some();
        match (is_shell, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                blocks.push(start..i);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        blocks.push(start..lines.len());
    }
    blocks
}

/// Find unfenced code in `text`. Candidates shorter than `min_len` chars or
/// overlapping an `existing` match are dropped.
pub(super) fn detect(text: &str, min_len: usize, existing: &[Match]) -> Vec<Match> {
    let lines = lines(text);
    let classes: Vec<LineClass> = lines.iter().map(|l| classify(l.text)).collect();

    let candidates = c_blocks(&classes)
        .into_iter()
        .map(|block| (block, "c"))
        .chain(shell_blocks(&lines).into_iter().map(|block| (block, "bash")));

    let mut found = Vec::new();
    for (block, language) in candidates {
        let span = lines[block.start].start..lines[block.end - 1].end();
        let content = text[span.clone()].trim();
        if content.chars().count() < min_len {
            log::debug!(
                "Dropping {} candidate at {:?}: shorter than {} chars",
                language,
                span,
                min_len
            );
            continue;
        }
        if existing.iter().any(|m| overlaps(&m.span(), &span)) {
            continue;
        }
        found.push(Match::new(
            span,
            MatchKind::Code {
                language: language.to_string(),
            },
            content,
            Origin::Heuristic,
        ));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_c_lines() {
        assert_eq!(
            classify("#include <stdio.h>"),
            LineClass::Trigger("preprocessor")
        );
        assert_eq!(
            classify("int main(void) {"),
            LineClass::Trigger("function-signature")
        );
        assert_eq!(
            classify("    for (i = 0; i < n; i++) {"),
            LineClass::Trigger("control-flow")
        );
        assert_eq!(classify("  case 2:"), LineClass::Trigger("case-label"));
        assert_eq!(classify("break;"), LineClass::Trigger("jump"));
        assert_eq!(classify("}"), LineClass::Continuation);
        assert_eq!(classify("x += 2;"), LineClass::Continuation);
    }

    #[test]
    fn classify_prose_lines() {
        assert_eq!(classify("Here is the program:"), LineClass::Prose);
        assert_eq!(classify("Example:"), LineClass::Prose);
        assert_eq!(classify("1. Compile it first"), LineClass::Prose);
        assert_eq!(classify("   "), LineClass::Blank);
        assert_eq!(classify("Done."), LineClass::Other);
    }

    #[test]
    fn lines_track_offsets_across_crlf() {
        let text = "a\r\nbc\nd";
        let ls = lines(text);
        assert_eq!(ls.len(), 3);
        assert_eq!(ls[1].text, "bc");
        assert_eq!(&text[ls[1].start..ls[1].end()], "bc");
        assert_eq!(&text[ls[2].start..ls[2].end()], "d");
    }

    #[test]
    fn c_block_stops_at_blank_line() {
        let classes = [
            LineClass::Prose,
            LineClass::Trigger("declaration"),
            LineClass::Continuation,
            LineClass::Blank,
            LineClass::Continuation,
        ];
        assert_eq!(c_blocks(&classes), vec![1..3]);
    }

    #[test]
    fn c_block_grows_backward_over_continuations() {
        let classes = [
            LineClass::Continuation,
            LineClass::Continuation,
            LineClass::Trigger("return"),
            LineClass::Other,
        ];
        assert_eq!(c_blocks(&classes), vec![0..3]);
    }

    #[test]
    fn detect_shell_commands_as_bash() {
        let text = "Build it:\ngcc -Wall -o hello hello.c\n./hello --verbose\nThat's all.";
        let found = detect(text, 30, &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "gcc -Wall -o hello hello.c\n./hello --verbose");
        assert_eq!(
            found[0].kind,
            MatchKind::Code {
                language: "bash".to_string()
            }
        );
        assert_eq!(found[0].origin, Origin::Heuristic);
    }

    #[test]
    fn detect_drops_short_candidates() {
        assert!(detect("int x = 1;", 30, &[]).is_empty());
        assert_eq!(detect("int x = 1;", 5, &[]).len(), 1);
    }

    #[test]
    fn detect_skips_candidates_overlapping_existing_matches() {
        let text = "#include <stdio.h>\nint main(void) { return 0; }";
        let existing = [Match::new(
            0..8,
            MatchKind::Image { alt_text: None },
            "data:image/png;base64,AAAA",
            Origin::Markup,
        )];
        assert!(detect(text, 10, &existing).is_empty());
    }
}
