//! Highlight Markup
//!
//! Code samples are stored as a light HTML-like markup: lines separated by
//! `\n`, highlight spans written as `<span class="keyword">…</span>`.
//!
//! Two consumers exist:
//!
//! - The sequencer walks a line with [`RevealSteps`] to produce the
//!   progressively revealed prefixes shown while "typing".
//! - Surfaces call [`parse_segments`] to turn a (possibly partial) line into
//!   styled runs of plain text.
//!
//! Tag detection is a plain `<` / `>` delimiter tracker. It does not validate
//! nesting or attribute syntax; any `<…>` run is treated as one atomic unit.

/// Separator between lines of a document
pub const LINE_SEPARATOR: char = '\n';

/// Split document markup into raw lines
///
/// Joining the result with [`LINE_SEPARATOR`] reproduces the input exactly.
#[must_use]
pub fn split_lines(markup: &str) -> Vec<&str> {
    markup.split(LINE_SEPARATOR).collect()
}

// =============================================================================
// Reveal Steps
// =============================================================================

/// One observable state of a line being typed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealStep<'a> {
    /// Markup revealed so far (always a prefix of the line)
    pub content: &'a str,

    /// Byte offset just past the last consumed character
    pub offset: usize,

    /// Whether the typing delay applies after this step
    ///
    /// False for steps that complete a tag, so markup is injected at once.
    pub pause: bool,
}

/// Iterator over the visible states of a line while it is typed out
///
/// A step is produced after every plain character (with `pause == true`) and
/// after every closing `>` (with `pause == false`). Characters inside a tag
/// produce no step of their own, so no step ever ends inside a tag. A stray
/// `>` outside a tag counts as a delimiter and does not pause. If the line
/// ends inside an unterminated tag, a final non-pausing step exposes the whole
/// line so the reveal always converges to the source.
#[derive(Clone, Debug)]
pub struct RevealSteps<'a> {
    line: &'a str,
    chars: std::str::CharIndices<'a>,
    in_tag: bool,
    emitted_to: usize,
    finished: bool,
}

impl<'a> RevealSteps<'a> {
    /// Start revealing `line`
    #[must_use]
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            chars: line.char_indices(),
            in_tag: false,
            emitted_to: 0,
            finished: false,
        }
    }

    fn step(&mut self, end: usize, pause: bool) -> RevealStep<'a> {
        self.emitted_to = end;
        RevealStep {
            content: &self.line[..end],
            offset: end,
            pause,
        }
    }
}

impl<'a> Iterator for RevealSteps<'a> {
    type Item = RevealStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for (idx, ch) in self.chars.by_ref() {
            let end = idx + ch.len_utf8();
            match ch {
                '<' => self.in_tag = true,
                '>' => {
                    self.in_tag = false;
                    return Some(self.step(end, false));
                }
                _ if self.in_tag => {}
                _ => return Some(self.step(end, true)),
            }
        }

        self.finished = true;
        if self.emitted_to < self.line.len() {
            let end = self.line.len();
            return Some(self.step(end, false));
        }
        None
    }
}

/// Convenience wrapper around [`RevealSteps::new`]
#[must_use]
pub fn reveal_steps(line: &str) -> RevealSteps<'_> {
    RevealSteps::new(line)
}

// =============================================================================
// Segment Parsing
// =============================================================================

/// A run of plain text sharing one highlight class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Innermost highlight class in effect, if any
    pub class: Option<String>,

    /// Decoded text
    pub text: String,
}

/// Parse a line of markup into styled text runs
///
/// Unclosed spans extend to the end of the input, which is what a partially
/// revealed line looks like. An unterminated `<` is rendered as text. Complete
/// `&lt;`, `&gt;`, `&amp;`, `&quot;` and `&#39;` entities are decoded; partial
/// ones are kept verbatim.
#[must_use]
pub fn parse_segments(line: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut stack: Vec<Option<String>> = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(tag_start) = rest.strip_prefix('<') {
            if let Some(close) = tag_start.find('>') {
                let tag = &tag_start[..close];
                if tag.starts_with('/') {
                    stack.pop();
                } else {
                    let inherited = stack.last().cloned().flatten();
                    stack.push(class_attribute(tag).or(inherited));
                }
                rest = &tag_start[close + 1..];
                continue;
            }
        }

        let first = rest.chars().next().map_or(1, char::len_utf8);
        let text_end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        let class = stack.last().cloned().flatten();
        push_text(&mut segments, class, &decode_entities(&rest[..text_end]));
        rest = &rest[text_end..];
    }

    segments
}

/// Plain text of a line with all markup stripped
#[must_use]
pub fn plain_text(line: &str) -> String {
    parse_segments(line).into_iter().map(|s| s.text).collect()
}

fn push_text(segments: &mut Vec<Segment>, class: Option<String>, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.class == class => last.text.push_str(text),
        _ => segments.push(Segment {
            class,
            text: text.to_string(),
        }),
    }
}

fn class_attribute(tag: &str) -> Option<String> {
    let start = tag.find("class=")? + "class=".len();
    let value = &tag[start..];
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &value[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_string())
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(name, _)| rest.starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                rest = &rest[name.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(line: &str) -> Vec<(&str, bool)> {
        reveal_steps(line).map(|s| (s.content, s.pause)).collect()
    }

    // =========================================================================
    // Reveal Tests
    // =========================================================================

    #[test]
    fn test_reveal_injects_tags_atomically() {
        assert_eq!(
            contents("a<b>c</b>"),
            vec![
                ("a", true),
                ("a<b>", false),
                ("a<b>c", true),
                ("a<b>c</b>", false),
            ]
        );
    }

    #[test]
    fn test_reveal_plain_line() {
        assert_eq!(contents("hey"), vec![("h", true), ("he", true), ("hey", true)]);
    }

    #[test]
    fn test_reveal_empty_line_has_no_steps() {
        assert_eq!(reveal_steps("").count(), 0);
    }

    #[test]
    fn test_reveal_converges_to_source() {
        let lines = [
            "<span class=\"keyword\">def</span> run():",
            "x = <span class=\"a\"><span class=\"b\">1</span></span>",
            "ñandú → <span class=\"string\">\"ok\"</span>",
            "broken <span",
        ];
        for line in lines {
            let last = reveal_steps(line).last().unwrap();
            assert_eq!(last.content, line);
            assert_eq!(last.offset, line.len());
        }
    }

    #[test]
    fn test_reveal_steps_are_growing_prefixes_without_open_tags() {
        let line = "<span class=\"k\">if</span> a <span class=\"n\">10</span>";
        let mut previous = 0;
        for step in reveal_steps(line) {
            assert!(line.starts_with(step.content));
            assert!(step.content.len() > previous);
            previous = step.content.len();

            let opens = step.content.matches('<').count();
            let closes = step.content.matches('>').count();
            assert_eq!(opens, closes, "half-open tag exposed: {}", step.content);
        }
    }

    #[test]
    fn test_reveal_stray_close_delimiter_does_not_pause() {
        assert_eq!(contents("a>b"), vec![("a", true), ("a>", false), ("a>b", true)]);
    }

    #[test]
    fn test_reveal_unterminated_tag_flushes_at_end() {
        assert_eq!(contents("x<y"), vec![("x", true), ("x<y", false)]);
    }

    #[test]
    fn test_reveal_multibyte_characters() {
        let steps: Vec<_> = reveal_steps("é<i>ü</i>").map(|s| s.content).collect();
        assert_eq!(steps, vec!["é", "é<i>", "é<i>ü", "é<i>ü</i>"]);
    }

    // =========================================================================
    // Segment Tests
    // =========================================================================

    #[test]
    fn test_segments_for_highlighted_line() {
        let segments = parse_segments("<span class=\"keyword\">def</span> run");
        assert_eq!(
            segments,
            vec![
                Segment {
                    class: Some("keyword".into()),
                    text: "def".into()
                },
                Segment {
                    class: None,
                    text: " run".into()
                },
            ]
        );
    }

    #[test]
    fn test_segments_partial_span_keeps_class() {
        let segments = parse_segments("x <span class='string'>\"hel");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].class.as_deref(), Some("string"));
        assert_eq!(segments[1].text, "\"hel");
    }

    #[test]
    fn test_segments_nested_spans_inherit() {
        let segments = parse_segments("<span class=\"a\">1<b>2</b>3</span>");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].class.as_deref(), Some("a"));
        assert_eq!(segments[0].text, "123");
    }

    #[test]
    fn test_segments_decode_entities() {
        assert_eq!(plain_text("a &lt;b&gt; &amp; &g"), "a <b> & &g");
    }

    #[test]
    fn test_segments_unterminated_tag_is_text() {
        assert_eq!(plain_text("a<spa"), "a<spa");
    }

    #[test]
    fn test_split_lines_round_trip() {
        let markup = "a<b>c</b>\n\nd\n";
        assert_eq!(split_lines(markup), vec!["a<b>c</b>", "", "d", ""]);
        assert_eq!(split_lines(markup).join("\n"), markup);
    }
}
