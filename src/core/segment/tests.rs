use super::{Segment, SegmentOptions, segment, segment_with};

fn text(s: &Segment) -> &str {
    match s {
        Segment::Text { content, .. } => content,
        other => panic!("expected Text, got {:?}", other),
    }
}

fn code(s: &Segment) -> (&str, &str) {
    match s {
        Segment::Code {
            content, language, ..
        } => (content, language),
        other => panic!("expected Code, got {:?}", other),
    }
}

/// Spans are ordered and disjoint, and every non-whitespace byte is inside one.
fn assert_partition(input: &str, segs: &[Segment]) {
    let mut cursor = 0;
    for seg in segs {
        let span = seg.span();
        assert!(span.start >= cursor, "overlapping spans in {:?}", segs);
        assert!(
            input[cursor..span.start].trim().is_empty(),
            "unclaimed text {:?}",
            &input[cursor..span.start]
        );
        cursor = span.end;
    }
    assert!(input[cursor..].trim().is_empty());
}

#[test]
fn segment_empty() {
    assert!(segment("").is_empty());
    assert!(segment(" \n\t ").is_empty());
}

#[test]
fn segment_text_only() {
    let input = "Hello there.\nThis answer has no code at all, just words.";
    let segs = segment(input);
    assert_eq!(segs.len(), 1);
    assert_eq!(text(&segs[0]), input);
    assert_eq!(*segs[0].span(), 0..input.len());
}

#[test]
fn segment_text_only_is_trimmed() {
    let segs = segment("\n  Just a sentence.  \n");
    assert_eq!(segs.len(), 1);
    assert_eq!(text(&segs[0]), "Just a sentence.");
}

#[test]
fn segment_fenced_code_between_text() {
    let input = "intro\n```python\nprint(1)\n```\noutro";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(text(&segs[0]), "intro");
    assert_eq!(code(&segs[1]), ("print(1)", "python"));
    assert_eq!(text(&segs[2]), "outro");
    assert_partition(input, &segs);
}

#[test]
fn segment_fence_without_language_defaults_to_text() {
    let segs = segment("```\nls -la\n```");
    assert_eq!(segs.len(), 1);
    assert_eq!(code(&segs[0]), ("ls -la", "text"));
}

#[test]
fn segment_multiple_code_blocks() {
    let segs = segment("```a\n1\n```\n\n```b\n2\n```");
    assert_eq!(segs.len(), 2);
    assert_eq!(code(&segs[0]), ("1", "a"));
    assert_eq!(code(&segs[1]), ("2", "b"));
}

#[test]
fn segment_unclosed_fence_degrades_to_text() {
    let input = "Start\n```rust\nfn main() {";
    let segs = segment(input);
    assert!(segs.iter().all(|s| !matches!(s, Segment::Code { language, .. } if language == "rust")));
    assert_partition(input, &segs);
}

#[test]
fn segment_fence_suppresses_heuristics() {
    let input = "Fixed version:\n```c\nint x = 2;\n```\nThe old one was:\nint main() {\n  printf(\"old\");\n  return 1;\n}";
    let segs = segment(input);
    let code_count = segs
        .iter()
        .filter(|s| matches!(s, Segment::Code { .. }))
        .count();
    assert_eq!(code_count, 1);
    assert_eq!(code(&segs[1]), ("int x = 2;", "c"));
    assert!(text(&segs[2]).contains("int main() {"));
    assert_partition(input, &segs);
}

#[test]
fn segment_heuristic_detects_unfenced_c() {
    let input =
        "Here is code:\n#include <stdio.h>\nint main() {\n  printf(\"hi\");\n  return 0;\n}\nDone.";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(text(&segs[0]), "Here is code:");
    assert_eq!(
        code(&segs[1]),
        (
            "#include <stdio.h>\nint main() {\n  printf(\"hi\");\n  return 0;\n}",
            "c"
        )
    );
    assert_eq!(text(&segs[2]), "Done.");
    assert_partition(input, &segs);
}

#[test]
fn segment_heuristic_switch_statement() {
    let input = "The switch looks like this:\nswitch (op) {\ncase '+':\n  r = a + b;\n  break;\ndefault:\n  r = 0;\n}\nThat covers it.";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    let (body, language) = code(&segs[1]);
    assert_eq!(language, "c");
    assert!(body.starts_with("switch (op) {"));
    assert!(body.ends_with('}'));
}

#[test]
fn segment_heuristic_shell_commands() {
    let input = "Compile and run:\n$ gcc -O2 -o app main.c\n$ ./app input.txt\nYou should see the output.";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(
        code(&segs[1]),
        ("$ gcc -O2 -o app main.c\n$ ./app input.txt", "bash")
    );
    assert_partition(input, &segs);
}

#[test]
fn segment_short_heuristic_candidate_stays_text() {
    let segs = segment("int x = 1;");
    assert_eq!(segs.len(), 1);
    assert_eq!(text(&segs[0]), "int x = 1;");
}

#[test]
fn segment_min_heuristic_len_is_configurable() {
    let options = SegmentOptions {
        min_heuristic_len: 5,
    };
    let segs = segment_with("int x = 1;", &options);
    assert_eq!(segs.len(), 1);
    assert_eq!(code(&segs[0]), ("int x = 1;", "c"));
}

#[test]
fn segment_markdown_image() {
    let input = "Look: ![cat](data:image/png;base64,AAAA) nice";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(text(&segs[0]), "Look:");
    assert_eq!(
        segs[1],
        Segment::Image {
            content: "data:image/png;base64,AAAA".to_string(),
            alt_text: "cat".to_string(),
            span: 6..40,
        }
    );
    assert_eq!(text(&segs[2]), "nice");
    assert_partition(input, &segs);
}

#[test]
fn segment_html_image_without_alt_gets_placeholder() {
    let segs = segment(r#"Result: <img src="data:image/png;base64,iVBO"> end"#);
    assert_eq!(segs.len(), 3);
    match &segs[1] {
        Segment::Image {
            content, alt_text, ..
        } => {
            assert_eq!(content, "data:image/png;base64,iVBO");
            assert_eq!(alt_text, "Generated Image 1");
        }
        other => panic!("expected Image, got {:?}", other),
    }
}

#[test]
fn segment_images_do_not_suppress_heuristics() {
    let input = "![plot](data:image/png;base64,AAAA)\n#include <math.h>\ndouble area(double r) {\n  return 3.14159 * r * r;\n}";
    let segs = segment(input);
    assert!(matches!(segs[0], Segment::Image { .. }));
    assert_eq!(code(&segs[1]).1, "c");
}

#[test]
fn segment_malformed_double_backtick_block() {
    let input = "Try this:\n``js\nconsole.log(\"hi\");\n`\nThanks";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(code(&segs[1]), ("console.log(\"hi\");", "js"));
    assert_eq!(text(&segs[2]), "Thanks");
}

#[test]
fn segment_inline_double_backtick_span_keeps_later_fence() {
    let input = "Use ``x`` here.\n```c\nint a;\n```\nThen `y`.";
    let segs = segment(input);
    assert_eq!(segs.len(), 3);
    assert_eq!(text(&segs[0]), "Use ``x`` here.");
    assert_eq!(code(&segs[1]), ("int a;", "c"));
    assert_eq!(text(&segs[2]), "Then `y`.");
    assert_partition(input, &segs);
}

#[test]
fn segment_double_backtick_prose_span_stays_text() {
    let input = "Wrap it as ``code`` in Markdown, like `this`.";
    let segs = segment(input);
    assert_eq!(segs.len(), 1);
    assert_eq!(text(&segs[0]), input);
}

#[test]
fn segment_keeps_inline_code_in_text() {
    let segs = segment("Call `free(p)` when done with the buffer.");
    assert_eq!(segs.len(), 1);
    assert_eq!(text(&segs[0]), "Call `free(p)` when done with the buffer.");
}

#[test]
fn segment_mixed_reply_partitions_input() {
    let input = "A\n```sh\nmake\n```\nB ![x](data:image/gif;base64,R0lG) C\n<img alt=\"y\" src=\"data:image/png;base64,AA==\">\n```\nraw\n```";
    let segs = segment(input);
    let kinds: Vec<&str> = segs.iter().map(Segment::kind_name).collect();
    assert_eq!(
        kinds,
        ["text", "code", "text", "image", "text", "image", "code"]
    );
    assert_partition(input, &segs);
}

#[test]
fn segment_serializes_with_kind_tag() {
    let segs = segment("```c\nx;\n```");
    let json = serde_json::to_value(&segs).expect("serialize");
    assert_eq!(json[0]["kind"], "code");
    assert_eq!(json[0]["language"], "c");
    assert_eq!(json[0]["span"]["start"], 0);
}
