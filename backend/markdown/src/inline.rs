//! Inline Span Parser
//!
//! Turns one line of inline markdown into Notion rich-text runs. Each span
//! syntax has its own matcher; at every step the earliest match wins, and
//! ties go to the matcher listed first in [`MATCHERS`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::chunk::chunk;
use crate::converter::Converter;
use crate::ir::{StyleSet, TextRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanKind {
    Equation,
    Bold,
    Italic,
    Code,
    Strikethrough,
    Link,
}

/// A matched span: byte range in the scanned text plus its inner parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpanMatch<'t> {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    pub inner: &'t str,
    pub url: Option<&'t str>,
}

// `regex` has no lookaround. Equation and italic delimiters must not touch a
// doubled delimiter, which `Guard::Isolated` checks around each candidate.
static EQUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$]+?)\$").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*\*(.+?)\*\*|__(.+?)__").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+?)\*|_([^_]+?)_").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)~~(.+?)~~").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

#[derive(Debug, Clone, Copy)]
enum Guard {
    None,
    /// The opening delimiter must not follow, and the closing delimiter must
    /// not precede, another copy of the delimiter character.
    Isolated,
}

struct Matcher {
    kind: SpanKind,
    pattern: &'static Lazy<Regex>,
    guard: Guard,
}

const MATCHER_COUNT: usize = 6;

/// Matchers in precedence order.
static MATCHERS: [Matcher; MATCHER_COUNT] = [
    Matcher {
        kind: SpanKind::Equation,
        pattern: &EQUATION_RE,
        guard: Guard::Isolated,
    },
    Matcher {
        kind: SpanKind::Bold,
        pattern: &BOLD_RE,
        guard: Guard::None,
    },
    Matcher {
        kind: SpanKind::Italic,
        pattern: &ITALIC_RE,
        guard: Guard::Isolated,
    },
    Matcher {
        kind: SpanKind::Code,
        pattern: &CODE_RE,
        guard: Guard::None,
    },
    Matcher {
        kind: SpanKind::Strikethrough,
        pattern: &STRIKE_RE,
        guard: Guard::None,
    },
    Matcher {
        kind: SpanKind::Link,
        pattern: &LINK_RE,
        guard: Guard::None,
    },
];

impl Matcher {
    /// Earliest match starting at or after `from` that satisfies the guard.
    /// Each regex search is counted in `searches`.
    fn find<'t>(&self, text: &'t str, from: usize, searches: &mut usize) -> Option<SpanMatch<'t>> {
        let mut at = from;
        while at < text.len() {
            *searches += 1;
            let caps = self.pattern.captures_at(text, at)?;
            let whole = caps.get(0)?;
            if self.accepts(text, whole.start(), whole.end()) {
                return Some(self.to_span(&caps, whole.start(), whole.end()));
            }
            // Every delimiter is ASCII, so the next byte is a char boundary.
            at = whole.start() + 1;
        }
        None
    }

    fn accepts(&self, text: &str, start: usize, end: usize) -> bool {
        match self.guard {
            Guard::None => true,
            Guard::Isolated => {
                let delimiter = text.as_bytes()[start];
                let before = start.checked_sub(1).map(|i| text.as_bytes()[i]);
                let after = text.as_bytes().get(end).copied();
                before != Some(delimiter) && after != Some(delimiter)
            }
        }
    }

    fn to_span<'t>(&self, caps: &Captures<'t>, start: usize, end: usize) -> SpanMatch<'t> {
        let inner = caps
            .get(1)
            .or_else(|| if self.kind == SpanKind::Link { None } else { caps.get(2) })
            .map(|m| m.as_str())
            .unwrap_or_default();
        let url = match self.kind {
            SpanKind::Link => caps.get(2).map(|m| m.as_str()),
            _ => None,
        };
        SpanMatch {
            kind: self.kind,
            start,
            end,
            inner,
            url,
        }
    }
}

/// Walks the spans of one text, remembering each matcher's next accepted
/// match. A remembered match is reused until the cursor moves past its start,
/// so no candidate is scanned twice and a line is parsed in linear time.
pub(crate) struct SpanScanner<'t> {
    text: &'t str,
    /// Per matcher: `None` when unknown, `Some(None)` when exhausted.
    pending: [Option<Option<SpanMatch<'t>>>; MATCHER_COUNT],
    searches: usize,
}

impl<'t> SpanScanner<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        Self {
            text,
            pending: [None; MATCHER_COUNT],
            searches: 0,
        }
    }

    /// Picks the next span at or after `from`: smallest start, then precedence.
    /// `from` must not decrease between calls.
    pub(crate) fn next_from(&mut self, from: usize) -> Option<SpanMatch<'t>> {
        let mut best: Option<SpanMatch<'t>> = None;
        for (matcher, slot) in MATCHERS.iter().zip(self.pending.iter_mut()) {
            let stale = match slot {
                None => true,
                Some(Some(cached)) => cached.start < from,
                Some(None) => false,
            };
            if stale {
                *slot = Some(matcher.find(self.text, from, &mut self.searches));
            }
            if let Some(Some(found)) = *slot {
                if best.is_none_or(|current| found.start < current.start) {
                    best = Some(found);
                }
            }
        }
        best
    }

    /// Regex searches run so far.
    pub(crate) fn searches(&self) -> usize {
        self.searches
    }
}

/// Next span at or after `from`, without reuse across calls.
pub(crate) fn next_span(text: &str, from: usize) -> Option<SpanMatch<'_>> {
    SpanScanner::new(text).next_from(from)
}

impl Converter {
    /// Parses inline spans in `text`, layering each span's flag on top of
    /// `inherited`. Always returns at least one run.
    pub fn parse_spans(&self, text: &str, inherited: StyleSet) -> Vec<TextRun> {
        self.spans_at_depth(text, inherited, 0)
    }

    fn spans_at_depth(&self, text: &str, style: StyleSet, depth: usize) -> Vec<TextRun> {
        let mut runs = Vec::new();

        if depth >= self.options.max_depth {
            self.push_text(&mut runs, text, style, None);
        } else {
            let mut scanner = SpanScanner::new(text);
            let mut cursor = 0;
            while let Some(span) = scanner.next_from(cursor) {
                self.push_text(&mut runs, &text[cursor..span.start], style, None);
                match span.kind {
                    SpanKind::Equation => {
                        runs.extend(
                            chunk(span.inner, self.options.chunk_limit)
                                .into_iter()
                                .map(TextRun::equation),
                        );
                    }
                    SpanKind::Bold => {
                        runs.extend(self.spans_at_depth(span.inner, style.with_bold(), depth + 1))
                    }
                    SpanKind::Italic => {
                        runs.extend(self.spans_at_depth(span.inner, style.with_italic(), depth + 1))
                    }
                    SpanKind::Strikethrough => runs.extend(self.spans_at_depth(
                        span.inner,
                        style.with_strikethrough(),
                        depth + 1,
                    )),
                    SpanKind::Code => {
                        self.push_text(&mut runs, span.inner, style.with_code(), None)
                    }
                    SpanKind::Link => self.push_text(&mut runs, span.inner, style, span.url),
                }
                cursor = span.end;
            }
            self.push_text(&mut runs, &text[cursor..], style, None);
        }

        if runs.is_empty() {
            // Only reachable for empty input; Notion rejects an empty rich_text here.
            runs.push(TextRun::styled(String::new(), style));
        }
        runs
    }

    fn push_text(&self, runs: &mut Vec<TextRun>, text: &str, style: StyleSet, link: Option<&str>) {
        for piece in chunk(text, self.options.chunk_limit) {
            runs.push(match link {
                Some(url) => TextRun::link(piece, style, url),
                None => TextRun::styled(piece, style),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConvertOptions;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(text: &str) -> Vec<TextRun> {
        Converter::default().parse_spans(text, StyleSet::PLAIN)
    }

    fn bold() -> StyleSet {
        StyleSet::PLAIN.with_bold()
    }

    fn italic() -> StyleSet {
        StyleSet::PLAIN.with_italic()
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(parse("hello world"), vec![TextRun::plain("hello world")]);
    }

    #[test]
    fn empty_text_still_yields_a_run() {
        assert_eq!(parse(""), vec![TextRun::plain("")]);
    }

    #[test]
    fn empty_text_keeps_inherited_style() {
        let runs = Converter::default().parse_spans("", bold());
        assert_eq!(runs, vec![TextRun::styled("", bold())]);
    }

    #[test]
    fn bold_and_italic_between_plain() {
        assert_eq!(
            parse("Some **bold** and *italic*."),
            vec![
                TextRun::plain("Some "),
                TextRun::styled("bold", bold()),
                TextRun::plain(" and "),
                TextRun::styled("italic", italic()),
                TextRun::plain("."),
            ]
        );
    }

    #[rstest]
    #[case("**_x_**")]
    #[case("_**x**_")]
    #[case("__*x*__")]
    #[case("*__x__*")]
    fn nested_emphasis_unions_flags(#[case] input: &str) {
        assert_eq!(parse(input), vec![TextRun::styled("x", bold().with_italic())]);
    }

    #[test]
    fn sibling_spans_do_not_leak_style() {
        let runs = parse("**a** b ~~c~~");
        assert_eq!(
            runs,
            vec![
                TextRun::styled("a", bold()),
                TextRun::plain(" b "),
                TextRun::styled("c", StyleSet::PLAIN.with_strikethrough()),
            ]
        );
    }

    #[test]
    fn inline_equation_is_style_independent() {
        let runs = Converter::default().parse_spans("see $x^2$ now", bold());
        assert_eq!(
            runs,
            vec![
                TextRun::styled("see ", bold()),
                TextRun::equation("x^2"),
                TextRun::styled(" now", bold()),
            ]
        );
    }

    #[test]
    fn double_dollar_is_not_inline_equation() {
        assert_eq!(parse("$$x$$"), vec![TextRun::plain("$$x$$")]);
    }

    #[test]
    fn code_span_is_literal() {
        assert_eq!(
            parse("run `**not bold**` now"),
            vec![
                TextRun::plain("run "),
                TextRun::styled("**not bold**", StyleSet::PLAIN.with_code()),
                TextRun::plain(" now"),
            ]
        );
    }

    #[test]
    fn link_text_is_not_restyled() {
        let runs = Converter::default().parse_spans("[**docs**](https://x.io)", italic());
        assert_eq!(runs, vec![TextRun::link("**docs**", italic(), "https://x.io")]);
    }

    #[test]
    fn link_inside_bold_inherits_bold() {
        assert_eq!(
            parse("**[a](u)**"),
            vec![TextRun::link("a", bold(), "u")]
        );
    }

    #[rstest]
    #[case("**unclosed")]
    #[case("a * b")]
    #[case("snake_case")]
    #[case("[text](")]
    #[case("`tick")]
    #[case("~~half")]
    fn unmatched_delimiters_stay_literal(#[case] input: &str) {
        let runs = parse(input);
        let joined: String = runs.iter().map(TextRun::content).collect();
        assert_eq!(joined, input);
        assert!(runs.iter().all(|r| r.style().is_plain()));
    }

    #[test]
    fn single_star_inside_double_is_not_italic() {
        // `***` never opens an italic span, so the bold span swallows a star.
        assert_eq!(parse("***x***"), vec![TextRun::styled("*x", bold()), TextRun::plain("*")]);
    }

    #[test]
    fn earliest_match_wins_over_precedence() {
        let runs = parse("*a* **b**");
        assert_eq!(
            runs,
            vec![
                TextRun::styled("a", italic()),
                TextRun::plain(" "),
                TextRun::styled("b", bold()),
            ]
        );
    }

    #[test]
    fn long_plain_text_is_chunked() {
        let text = "x".repeat(2500);
        let runs = parse(&text);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].content().len(), 2000);
        assert_eq!(runs[1].content().len(), 500);
    }

    #[test]
    fn chunked_pieces_keep_style_and_link() {
        let converter = Converter::new(ConvertOptions {
            chunk_limit: 3,
            ..ConvertOptions::default()
        });
        let runs = converter.parse_spans("[abcdefg](u)", StyleSet::PLAIN);
        assert_eq!(
            runs,
            vec![
                TextRun::link("abc", StyleSet::PLAIN, "u"),
                TextRun::link("def", StyleSet::PLAIN, "u"),
                TextRun::link("g", StyleSet::PLAIN, "u"),
            ]
        );
    }

    #[test]
    fn long_inline_equation_is_split_into_equation_runs() {
        let converter = Converter::new(ConvertOptions {
            chunk_limit: 4,
            ..ConvertOptions::default()
        });
        let runs = converter.parse_spans("see $a+b=c+d$ here", StyleSet::PLAIN);
        assert_eq!(
            runs,
            vec![
                TextRun::plain("see "),
                TextRun::equation("a+b="),
                TextRun::equation("c+d"),
                TextRun::plain(" here"),
            ]
        );
    }

    #[test]
    fn long_inline_code_keeps_code_flag_on_every_piece() {
        let converter = Converter::new(ConvertOptions {
            chunk_limit: 3,
            ..ConvertOptions::default()
        });
        let code = StyleSet::PLAIN.with_code();
        let runs = converter.parse_spans("**`abcdefg`**", StyleSet::PLAIN);
        assert_eq!(
            runs,
            vec![
                TextRun::styled("abc", code.with_bold()),
                TextRun::styled("def", code.with_bold()),
                TextRun::styled("g", code.with_bold()),
            ]
        );
    }

    #[test]
    fn rejected_candidates_are_scanned_once() {
        let text = "`c`a_b__".repeat(2000);
        let mut scanner = SpanScanner::new(&text);
        let mut cursor = 0;
        let mut spans = 0;
        while let Some(span) = scanner.next_from(cursor) {
            cursor = span.end;
            spans += 1;
        }
        assert!(spans >= 2000);
        assert!(
            scanner.searches() <= text.len(),
            "{} searches for {} bytes",
            scanner.searches(),
            text.len()
        );
    }

    #[test]
    fn scanner_agrees_with_fresh_search() {
        let text = "a _b_ `c` **d** ~~e~~ [f](g) $h$ *i*";
        let mut scanner = SpanScanner::new(text);
        let mut cursor = 0;
        while let Some(span) = scanner.next_from(cursor) {
            assert_eq!(Some(span), next_span(text, cursor));
            cursor = span.end;
        }
        assert_eq!(next_span(text, cursor), None);
    }

    #[test]
    fn large_line_of_rejected_delimiters_parses() {
        let text = "`c`a_b__".repeat(4000);
        let runs = parse(&text);
        let joined: String = runs.iter().map(TextRun::content).collect();
        assert!(joined.len() < text.len());
        assert!(runs.iter().any(|r| r.style().code));
    }

    #[test]
    fn depth_cap_keeps_delimiters_literal() {
        let converter = Converter::new(ConvertOptions {
            max_depth: 1,
            ..ConvertOptions::default()
        });
        let runs = converter.parse_spans("**a *b* c**", StyleSet::PLAIN);
        assert_eq!(runs, vec![TextRun::styled("a *b* c", bold())]);
    }

    #[test]
    fn next_span_prefers_earliest_start() {
        let span = next_span("x `c` **b**", 0).unwrap();
        assert_eq!(span.kind, SpanKind::Code);
        assert_eq!(span.inner, "c");
    }

    #[test]
    fn link_matcher_captures_url() {
        let span = next_span("see [site](https://a.b) ok", 0).unwrap();
        assert_eq!(span.kind, SpanKind::Link);
        assert_eq!(span.inner, "site");
        assert_eq!(span.url, Some("https://a.b"));
    }

    #[test]
    fn underscores_inside_words_can_italicise() {
        assert_eq!(
            parse("under_score_name"),
            vec![
                TextRun::plain("under"),
                TextRun::styled("score", italic()),
                TextRun::plain("name"),
            ]
        );
    }

    #[test]
    fn italic_underscore_requires_isolated_delimiters() {
        assert!(next_span("__", 0).is_none());
        let span = next_span("a _b_ c", 0).unwrap();
        assert_eq!(span.kind, SpanKind::Italic);
        assert_eq!(span.inner, "b");
    }
}
