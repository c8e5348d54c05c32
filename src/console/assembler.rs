use super::span::{Span, Style};

/// Splits arbitrarily chunked writes into spans aligned to line boundaries.
///
/// The assembler remembers how long the currently open line is, so a line
/// that arrives over many writes is continued rather than restarted. Once an
/// open line reaches `max_line_length` characters it is broken before any
/// further text is added.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    max_line_length: usize,
    open_length: usize,
}

impl LineAssembler {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length: max_line_length.max(1),
            open_length: 0,
        }
    }

    pub fn is_line_open(&self) -> bool {
        self.open_length > 0
    }

    /// Forget the open line, so the next text starts a fresh one.
    pub fn reset(&mut self) {
        self.open_length = 0;
    }

    pub fn assemble(&mut self, text: &str, style: Style) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            match rest.find('\n') {
                Some(at) => {
                    self.push_segment(&rest[..at], true, style, &mut spans);
                    rest = &rest[at + 1..];
                }
                None => {
                    self.push_segment(rest, false, style, &mut spans);
                    rest = "";
                }
            }
        }

        spans
    }

    fn push_segment(&mut self, segment: &str, newline: bool, style: Style, spans: &mut Vec<Span>) {
        let mut rest = segment;

        while !rest.is_empty() {
            if self.open_length >= self.max_line_length {
                spans.push(Span::line_break(style));
                self.open_length = 0;
            }

            let room = self.max_line_length - self.open_length;
            let split = rest
                .char_indices()
                .nth(room)
                .map_or(rest.len(), |(at, _)| at);
            let (head, tail) = rest.split_at(split);
            self.open_length += head.chars().count();
            rest = tail;

            let ends_line = newline && rest.is_empty();
            spans.push(Span::new(head, style, ends_line));
            if ends_line {
                self.open_length = 0;
                return;
            }
        }

        if newline {
            spans.push(Span::line_break(style));
            self.open_length = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(text: &str, style: Style, ends_line: bool) -> Span {
        Span::new(text, style, ends_line)
    }

    #[test]
    fn test_splits_on_newlines() {
        let mut assembler = LineAssembler::new(100);
        let spans = assembler.assemble("foo\nbar\nbaz", Style::Stdout);

        assert_eq!(
            vec![
                span("foo", Style::Stdout, true),
                span("bar", Style::Stdout, true),
                span("baz", Style::Stdout, false),
            ],
            spans
        );
        assert!(assembler.is_line_open());
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut assembler = LineAssembler::new(100);
        let spans = assembler.assemble("\n\nx\n", Style::Stderr);

        assert_eq!(
            vec![
                Span::line_break(Style::Stderr),
                Span::line_break(Style::Stderr),
                span("x", Style::Stderr, true),
            ],
            spans
        );
        assert!(!assembler.is_line_open());
    }

    #[test]
    fn test_open_line_continues_across_writes_and_styles() {
        let mut assembler = LineAssembler::new(100);
        let mut spans = assembler.assemble("Exception in ", Style::Stdout);
        spans.extend(assembler.assemble("thread main\n", Style::Stderr));

        assert_eq!(
            vec![
                span("Exception in ", Style::Stdout, false),
                span("thread main", Style::Stderr, true),
            ],
            spans
        );
    }

    #[test]
    fn test_empty_text_produces_nothing() {
        let mut assembler = LineAssembler::new(100);
        assert_eq!(Vec::<Span>::new(), assembler.assemble("", Style::Stdout));
        assert!(!assembler.is_line_open());
    }

    #[test]
    fn test_long_line_is_wrapped_without_losing_characters() {
        let mut assembler = LineAssembler::new(4);
        let spans = assembler.assemble("abcdefghij", Style::Stdout);

        assert_eq!(
            vec![
                span("abcd", Style::Stdout, false),
                Span::line_break(Style::Stdout),
                span("efgh", Style::Stdout, false),
                Span::line_break(Style::Stdout),
                span("ij", Style::Stdout, false),
            ],
            spans
        );
    }

    #[test]
    fn test_wrap_is_lazy_when_a_newline_follows() {
        let mut assembler = LineAssembler::new(3);
        let mut spans = assembler.assemble("abc", Style::Stdout);
        spans.extend(assembler.assemble("\n", Style::Stdout));

        assert_eq!(
            vec![span("abc", Style::Stdout, false), Span::line_break(Style::Stdout)],
            spans
        );
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        let mut assembler = LineAssembler::new(2);
        let spans = assembler.assemble("äöü", Style::Stdout);

        assert_eq!(
            vec![
                span("äö", Style::Stdout, false),
                Span::line_break(Style::Stdout),
                span("ü", Style::Stdout, false),
            ],
            spans
        );
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let mut assembler = LineAssembler::new(0);
        let spans = assembler.assemble("ab", Style::Stdout);
        assert_eq!(3, spans.len());
    }
}
