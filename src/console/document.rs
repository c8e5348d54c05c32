use std::collections::VecDeque;
use std::sync::Arc;

use super::error::ConsoleError;
use super::span::Span;

/// One paragraph of console output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    spans: Vec<Span>,
    len: usize,
    closed: bool,
}

impl Line {
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length in characters, excluding the line terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a terminator has been seen. Only the last line of a
    /// document can be open.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn push(&mut self, span: Span) -> usize {
        let len = span.char_len();
        self.len += len;
        self.closed = span.ends_line;
        if !span.text.is_empty() {
            self.spans.push(span);
        }
        len
    }
}

/// Committed console content, oldest line first.
///
/// Only the flush scheduler mutates a document; readers get a
/// [DocumentSnapshot].
#[derive(Debug, Default)]
pub struct Document {
    lines: VecDeque<Arc<Line>>,
    total_chars: usize,
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn line_lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.lines.iter().map(|l| l.len())
    }

    /// Append drained spans, continuing the open line if there is one.
    pub fn fold(&mut self, spans: Vec<Span>) {
        for span in spans {
            if self.lines.back().map_or(true, |l| l.closed) {
                self.lines.push_back(Arc::new(Line::default()));
            }
            if let Some(line) = self.lines.back_mut() {
                self.total_chars += Arc::make_mut(line).push(span);
            }
        }
        self.revision += 1;
    }

    /// Drop `count` lines from the oldest end, returning the characters freed.
    pub fn evict_front(&mut self, count: usize) -> Result<usize, ConsoleError> {
        if count > self.lines.len() {
            return Err(ConsoleError::EvictBeyondEnd {
                requested: count,
                available: self.lines.len(),
            });
        }

        let evicted: usize = self.lines.drain(..count).map(|l| l.len()).sum();
        self.total_chars = self
            .total_chars
            .checked_sub(evicted)
            .ok_or(ConsoleError::CharCountDrift {
                tracked: self.total_chars,
                evicted,
            })?;
        if count > 0 {
            self.revision += 1;
        }
        Ok(evicted)
    }

    /// Rebuild the cached character count from the lines themselves.
    pub fn recount(&mut self) {
        self.total_chars = self.line_lengths().sum();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total_chars = 0;
        self.revision += 1;
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            lines: Arc::new(self.lines.iter().cloned().collect()),
            total_chars: self.total_chars,
            revision: self.revision,
        }
    }
}

/// Read-only view of a document as of one flush.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    lines: Arc<Vec<Arc<Line>>>,
    total_chars: usize,
    revision: u64,
}

impl DocumentSnapshot {
    pub fn lines(&self) -> &[Arc<Line>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Incremented by every flush that changed the document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text()).collect()
    }

    pub fn viewport(&self, height: u16, scroll: usize) -> &[Arc<Line>] {
        let y1 = scroll.min(self.lines.len());
        let y2 = scroll.saturating_add(height as usize).min(self.lines.len());

        &self.lines[y1..y2]
    }

    /// Scroll offset that shows the last `height` lines.
    pub fn tail_offset(&self, height: u16) -> usize {
        self.lines.len().saturating_sub(height as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::console::span::Style;
    use pretty_assertions::assert_eq;

    fn spans(parts: &[(&str, bool)]) -> Vec<Span> {
        parts
            .iter()
            .map(|(text, ends)| Span::new(*text, Style::Stdout, *ends))
            .collect()
    }

    #[test]
    fn test_fold_continues_open_line() {
        let mut document = Document::new();
        document.fold(spans(&[("foo", false)]));
        assert_eq!(1, document.len());

        document.fold(spans(&[("bar", true), ("baz", false)]));
        assert_eq!(vec!["foobar", "baz"], document.snapshot().texts());
        assert_eq!(9, document.total_chars());
        assert!(document.snapshot().lines()[0].is_closed());
        assert!(!document.snapshot().lines()[1].is_closed());
    }

    #[test]
    fn test_line_keeps_mixed_styles() {
        let mut document = Document::new();
        document.fold(vec![
            Span::new("out ", Style::Stdout, false),
            Span::new("err", Style::Stderr, true),
        ]);

        let snapshot = document.snapshot();
        let styles: Vec<Style> = snapshot.lines()[0].spans().iter().map(|s| s.style).collect();
        assert_eq!(vec![Style::Stdout, Style::Stderr], styles);
    }

    #[test]
    fn test_line_break_creates_empty_line() {
        let mut document = Document::new();
        document.fold(vec![Span::line_break(Style::Stdout), Span::line_break(Style::Stdout)]);

        assert_eq!(vec!["", ""], document.snapshot().texts());
        assert_eq!(0, document.total_chars());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_folds() {
        let mut document = Document::new();
        document.fold(spans(&[("foo", false)]));
        let before = document.snapshot();

        document.fold(spans(&[("bar", true)]));

        assert_eq!(vec!["foo"], before.texts());
        assert_eq!(vec!["foobar"], document.snapshot().texts());
        assert!(document.snapshot().revision() > before.revision());
    }

    #[test]
    fn test_evict_front() -> Result<(), anyhow::Error> {
        let mut document = Document::new();
        document.fold(spans(&[("one", true), ("two", true), ("three", true)]));

        assert_eq!(6, document.evict_front(2)?);
        assert_eq!(vec!["three"], document.snapshot().texts());
        assert_eq!(5, document.total_chars());
        Ok(())
    }

    #[test]
    fn test_evict_beyond_end_fails() {
        let mut document = Document::new();
        document.fold(spans(&[("one", true)]));

        match document.evict_front(2) {
            Err(ConsoleError::EvictBeyondEnd { requested, available }) => {
                assert_eq!((2, 1), (requested, available))
            }
            other => panic!("expected eviction error, got {:?}", other),
        }
        assert_eq!(1, document.len());
    }

    #[test]
    fn test_viewport() {
        let mut document = Document::new();
        document.fold(spans(&[
            ("one", true),
            ("two", true),
            ("three", true),
            ("four", true),
            ("five", true),
        ]));
        let snapshot = document.snapshot();
        let texts = |lines: &[Arc<Line>]| lines.iter().map(|l| l.text()).collect::<Vec<String>>();

        assert_eq!(vec!["one", "two"], texts(snapshot.viewport(2, 0)));
        assert_eq!(vec!["two", "three"], texts(snapshot.viewport(2, 1)));
        assert_eq!(vec!["five"], texts(snapshot.viewport(2, 4)));
        assert_eq!(Vec::<String>::new(), texts(snapshot.viewport(2, 5)));
        assert_eq!(Vec::<String>::new(), texts(snapshot.viewport(2, 6)));
        assert_eq!(3, snapshot.tail_offset(2));
        assert_eq!(0, snapshot.tail_offset(10));
    }
}
